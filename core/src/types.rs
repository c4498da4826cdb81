//! Shared primitive types used across both recorders.

/// Milliseconds since the Unix epoch, as read from a `Clock`.
pub type Millis = i64;

/// A host item identifier.
pub type ItemId = i32;

/// Sanitized player name that selects the output file.
pub type Identity = String;

/// Item id of coins in the host's item table.
pub const COINS_ITEM_ID: ItemId = 995;

/// Widget group id of the bank interface.
pub const BANK_GROUP_ID: i32 = 12;

/// Container id of the player inventory.
pub const INVENTORY_CONTAINER_ID: i32 = 93;

/// Container id of the bank.
pub const BANK_CONTAINER_ID: i32 = 95;
