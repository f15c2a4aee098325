//! Plan pricing.
//!
//! Resolves what a path of upgrades costs and converts totals for display.

pub mod currency;
pub mod resolver;

pub use currency::*;
pub use resolver::*;
