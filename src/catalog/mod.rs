//! Ship and CCU catalog.
//!
//! Models for the remote catalog, decoding of its payloads, the joined
//! parallel load, and the id-indexed cache the planner reads from.

pub mod cache;
pub mod loader;
pub mod models;
pub mod payload;

pub use cache::*;
pub use loader::*;
pub use models::*;
pub use payload::{decode_ccus, decode_exchange_rates, decode_ships, decode_warbond_history};
