//! Error types for the planner core.
//!
//! Only structural misuse (bad edges, bad paths) and catalog loading surface
//! as errors. Unresolvable ship references and persistence failures degrade
//! instead: the resolver prices them at zero with a warning and the hangar
//! provider falls back to an empty snapshot.

use thiserror::Error;

use crate::graph::model::{EdgeId, NodeId};

/// Rejected `add_edge` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidEdgeError {
    #[error("Node {0} does not exist in the plan")]
    MissingNode(NodeId),
    #[error("Edge from {0} to itself is not allowed")]
    SelfLoop(NodeId),
}

/// A path handed to the resolver that does not describe a walk through the plan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidPathError {
    #[error("Start node {0} does not exist in the plan")]
    UnknownNode(NodeId),
    #[error("Edge {0} does not exist in the plan")]
    UnknownEdge(EdgeId),
    #[error("Edge {edge} starts at {found} but the path is at {expected}")]
    Disconnected {
        edge: EdgeId,
        expected: NodeId,
        found: NodeId,
    },
}

/// Failure reading or writing the durable key-value store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Stored value for key {key} could not be (de)serialized: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to fetch one of the catalog resources.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Fetching {resource} failed: {reason}")]
pub struct FetchError {
    pub resource: String,
    pub reason: String,
}

impl FetchError {
    pub fn new(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}

/// Catalog could not be (re)loaded. The cache keeps its previous contents.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to load data: {}", .failed.join(", "))]
    Unavailable { failed: Vec<String> },
    #[error("Payload for {resource} is malformed: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Invalid configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
}

/// Aggregate error for callers that do not care which layer failed.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    InvalidEdge(#[from] InvalidEdgeError),
    #[error(transparent)]
    InvalidPath(#[from] InvalidPathError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Plan could not be (de)serialized: {0}")]
    PlanFormat(#[from] serde_json::Error),
}
