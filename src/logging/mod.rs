//! Structured logging with plan context.
//!
//! Provides logging macros and utilities that include the plan id and,
//! where relevant, the edge id in every log message for easy correlation.

pub mod structured;

pub use structured::*;
