//! Upgrade plan graph.
//!
//! Ships placed on the planner canvas and the upgrade edges between them.

pub mod model;
pub mod plan;

pub use model::*;
pub use plan::*;
