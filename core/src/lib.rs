//! wealthlog-core: records bank wealth and membership days observed in a
//! game client to per-player files.
//!
//! Host notifications go in through `engine::RecorderEngine::dispatch`;
//! snapshots are gated by `gate` and persisted by `writer` with an
//! atomic replace.

pub mod atomic;
pub mod bank_wealth;
pub mod clock;
pub mod config;
pub mod days;
pub mod display;
pub mod engine;
pub mod error;
pub mod gate;
pub mod host;
pub mod identity;
pub mod membership_days;
pub mod producer;
pub mod record;
pub mod recorder;
pub mod scripted;
pub mod snapshot;
pub mod types;
pub mod writer;
