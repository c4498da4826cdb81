//! Snapshots: the small tuples of observed integers a recorder persists.
//!
//! Field names match the record file keys exactly; the writer flattens a
//! snapshot into each history entry.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub trait Snapshot: Clone + PartialEq + Serialize + DeserializeOwned {
    /// Single value written by the plain-text variant.
    fn primary_value(&self) -> i64;

    /// True when every field is zero, i.e. the source has not populated yet.
    fn is_zero(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BankSnapshot {
    pub bank_ge_value:   i64,
    pub bank_coins:      i64,
    pub inventory_coins: i64,
}

impl BankSnapshot {
    pub fn new(bank_ge_value: i64, bank_coins: i64, inventory_coins: i64) -> Self {
        Self { bank_ge_value, bank_coins, inventory_coins }
    }
}

impl Snapshot for BankSnapshot {
    fn primary_value(&self) -> i64 {
        self.bank_ge_value
    }

    fn is_zero(&self) -> bool {
        self.bank_ge_value == 0 && self.bank_coins == 0 && self.inventory_coins == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipSnapshot {
    pub days: i64,
}

impl Snapshot for MembershipSnapshot {
    fn primary_value(&self) -> i64 {
        self.days
    }

    fn is_zero(&self) -> bool {
        self.days == 0
    }
}
