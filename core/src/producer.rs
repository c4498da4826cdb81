//! Snapshot producers: pure reads of host state.
//!
//! RULE: producers never mutate host state and never fail as a whole.
//! A missing container counts as empty; a bad entry is skipped.

use crate::{
    error::RecorderError,
    host::{Container, HostState, Item},
    snapshot::BankSnapshot,
    types::COINS_ITEM_ID,
};

/// Result of one bank scan. `bank_loaded` is false while the bank
/// container is absent or empty; such scans must never be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankObservation {
    pub snapshot:    BankSnapshot,
    pub bank_loaded: bool,
}

pub fn produce_bank_snapshot(host: &dyn HostState) -> BankObservation {
    let bank = host.items(Container::Bank).unwrap_or_else(|| {
        log::debug!("{}", RecorderError::HostStateUnavailable { what: "bank container" });
        Vec::new()
    });
    let bank_loaded = !bank.is_empty();

    let mut bank_ge_value: i64 = 0;
    let mut bank_coins: i64 = 0;

    for item in bank.iter().filter(|it| is_valid(it)) {
        let qty = i64::from(item.quantity);
        if item.id == COINS_ITEM_ID {
            bank_coins = bank_coins.saturating_add(qty);
        }
        let price = match host.item_price(item.id) {
            Ok(p) => p,
            Err(e) => {
                log::debug!("bank: skipping item {} in valuation: {e}", item.id);
                continue;
            }
        };
        bank_ge_value = bank_ge_value.saturating_add(price.saturating_mul(qty));
    }

    let inventory_coins = host
        .items(Container::Inventory)
        .unwrap_or_default()
        .iter()
        .filter(|it| it.id == COINS_ITEM_ID && it.quantity > 0)
        .fold(0i64, |acc, it| acc.saturating_add(i64::from(it.quantity)));

    BankObservation {
        snapshot: BankSnapshot { bank_ge_value, bank_coins, inventory_coins },
        bank_loaded,
    }
}

fn is_valid(item: &Item) -> bool {
    item.id > 0 && item.quantity > 0
}
