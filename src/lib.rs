//! Daytrade Tax - Brazilian day-trade income tax engine
//!
//! Four pure stages: day-trade classification, cost enrichment, monthly
//! apportionment with loss carryforward, and DARF derivation. The loss
//! carryforward is never held by the engine; callers thread it from one
//! month's calculation into the next.

pub mod config;
pub mod error;
pub mod importers;
pub mod models;
pub mod tax;
