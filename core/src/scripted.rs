//! A host whose state is plain data. Drives the runner's replay mode and
//! the integration tests.

use crate::{
    error::{RecorderError, RecorderResult},
    host::{Container, HostState, Item, SessionPhase},
    types::ItemId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptedHost {
    /// `None` until the bank container has loaded.
    pub bank:         Option<Vec<Item>>,
    pub inventory:    Option<Vec<Item>>,
    pub prices:       HashMap<ItemId, i64>,
    pub player:       Option<String>,
    pub phase:        SessionPhase,
    pub bank_open:    bool,
    pub visible_text: Vec<String>,
}

impl ScriptedHost {
    /// Logged in as `player` with the bank open and empty containers.
    pub fn logged_in(player: &str) -> Self {
        Self {
            player: Some(player.to_string()),
            phase: SessionPhase::LoggedIn,
            bank_open: true,
            ..Self::default()
        }
    }

    pub fn with_bank(mut self, items: Vec<Item>) -> Self {
        self.bank = Some(items);
        self
    }

    pub fn with_inventory(mut self, items: Vec<Item>) -> Self {
        self.inventory = Some(items);
        self
    }

    pub fn with_price(mut self, id: ItemId, price: i64) -> Self {
        self.prices.insert(id, price);
        self
    }
}

impl HostState for ScriptedHost {
    fn items(&self, container: Container) -> Option<Vec<Item>> {
        match container {
            Container::Bank      => self.bank.clone(),
            Container::Inventory => self.inventory.clone(),
        }
    }

    fn item_price(&self, id: ItemId) -> RecorderResult<i64> {
        self.prices
            .get(&id)
            .copied()
            .ok_or_else(|| RecorderError::PriceLookupFailure {
                item_id: id,
                reason:  "no price known".into(),
            })
    }

    fn local_player_name(&self) -> Option<String> {
        self.player.clone()
    }

    fn session_phase(&self) -> SessionPhase {
        self.phase
    }

    fn is_bank_open(&self) -> bool {
        self.bank_open
    }

    fn visible_text(&self) -> Vec<String> {
        self.visible_text.clone()
    }
}
