//! Structured logging utilities.
//!
//! Every line starts with its scope (a plan, the catalog or the hangar)
//! and, for pricing, the edge id, followed by an upper-snake event token.

use std::fmt;

use log::LevelFilter;

/// Initialize the process logger. Safe to call more than once.
pub fn init_logger(level: LevelFilter) {
    let _ = env_logger::builder()
        .filter_level(level)
        .format_timestamp_millis()
        .try_init();
}

/// What a log line is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogScope {
    /// One plan (canvas), by plan id.
    Plan(String),
    Catalog,
    Hangar,
}

/// Prefix carried by every structured log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    pub scope: LogScope,
    pub edge_id: Option<String>,
}

impl LogContext {
    pub fn new(plan_id: &str) -> Self {
        Self {
            scope: LogScope::Plan(plan_id.to_string()),
            edge_id: None,
        }
    }

    pub fn catalog() -> Self {
        Self {
            scope: LogScope::Catalog,
            edge_id: None,
        }
    }

    pub fn hangar() -> Self {
        Self {
            scope: LogScope::Hangar,
            edge_id: None,
        }
    }

    pub fn with_edge(&self, edge_id: &str) -> Self {
        Self {
            scope: self.scope.clone(),
            edge_id: Some(edge_id.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            LogScope::Plan(id) => write!(f, "[plan={}]", id)?,
            LogScope::Catalog => f.write_str("[catalog]")?,
            LogScope::Hangar => f.write_str("[hangar]")?,
        }
        match &self.edge_id {
            Some(eid) => write!(f, " [edge={}]", eid),
            None => Ok(()),
        }
    }
}

/// Log an info message with context.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::info!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*) $(, $value)*)
        );
    };
}

/// Log a warning message with context.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::warn!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*) $(, $value)*)
        );
    };
}

/// Log a debug message with context.
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::debug!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*) $(, $value)*)
        );
    };
}
