//! The minimal view of the game client the recorders need.
//!
//! RULE: recorders only read through `HostState`. Nothing here writes
//! back to the host.

use crate::{
    error::RecorderResult,
    types::{ItemId, BANK_CONTAINER_ID, INVENTORY_CONTAINER_ID},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id:       ItemId,
    pub quantity: i32,
}

impl Item {
    pub fn new(id: ItemId, quantity: i32) -> Self {
        Self { id, quantity }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    Inventory,
    Bank,
}

impl Container {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            INVENTORY_CONTAINER_ID => Some(Self::Inventory),
            BANK_CONTAINER_ID      => Some(Self::Bank),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    LoginScreen,
    LoggingIn,
    LoggedIn,
}

impl SessionPhase {
    /// True before the player is in the game world.
    pub fn is_pre_login(&self) -> bool {
        matches!(self, Self::LoginScreen | Self::LoggingIn)
    }
}

/// Notifications the embedding application forwards to a recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEvent {
    Startup,
    WidgetLoaded { group_id: i32 },
    ItemContainerChanged { container_id: i32 },
    SessionPhaseChanged { phase: SessionPhase },
    /// Text shown by the host changed; replaces scanning the widget tree.
    TextChanged { text: String },
}

pub trait HostState {
    /// Items in a container, or `None` when the container is not loaded.
    fn items(&self, container: Container) -> Option<Vec<Item>>;

    /// Grand Exchange unit price of an item.
    fn item_price(&self, id: ItemId) -> RecorderResult<i64>;

    /// Display name of the logged-in player, if any.
    fn local_player_name(&self) -> Option<String>;

    fn session_phase(&self) -> SessionPhase;

    fn is_bank_open(&self) -> bool;

    /// Text fragments currently on screen. Hosts without a way to
    /// enumerate them return nothing and rely on `HostEvent::TextChanged`.
    fn visible_text(&self) -> Vec<String> {
        Vec::new()
    }
}
