//! Hangar inventory and owned-upgrade pricing.
//!
//! Holds the user's owned CCU credits, persists them through a key-value
//! store, and resolves owned-upgrade prices for the path cost resolver.

pub mod models;
pub mod provider;
pub mod special;
pub mod store;
pub mod title;

pub use models::*;
pub use provider::*;
pub use special::*;
pub use store::*;
pub use title::*;
