//! Nodes and edges of an upgrade plan.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::models::{Ship, ShipId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// `ship-{shipId}-{timestampMillis}`
    pub fn for_ship(ship_id: ShipId, timestamp_ms: i64) -> Self {
        NodeId(format!("ship-{}-{}", ship_id, timestamp_ms))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn generate() -> Self {
        EdgeId(format!("edge-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        EdgeId(value.to_string())
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canvas position of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where the upgrade on an edge is bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "official", alias = "官方")]
    Official,
    #[serde(rename = "official-warbond", alias = "官方WB")]
    OfficialWarbond,
    #[serde(rename = "third-party", alias = "第三方")]
    ThirdParty,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Official => "official",
            SourceType::OfficialWarbond => "official-warbond",
            SourceType::ThirdParty => "third-party",
        }
    }

    /// Warbond and third-party purchases are priced by what the user paid.
    pub fn uses_custom_price(&self) -> bool {
        !matches!(self, SourceType::Official)
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "official" | "官方" => Ok(SourceType::Official),
            "official-warbond" | "官方WB" => Ok(SourceType::OfficialWarbond),
            "third-party" | "第三方" => Ok(SourceType::ThirdParty),
            other => Err(format!("unknown source type {:?}", other)),
        }
    }
}

/// A ship placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub id: NodeId,
    pub ship: Ship,
    pub position: Position,
}

/// Directed upgrade from one node's ship to another's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub source_type: SourceType,
    /// Official MSRP delta in cents, fixed when the edge is drawn.
    pub price: i64,
    #[serde(default)]
    pub custom_price: Option<i64>,
    pub source_ship: Ship,
    pub target_ship: Ship,
}

impl PathEdge {
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

/// MSRP delta between two ships, never negative.
pub fn msrp_delta(from: &Ship, to: &Ship) -> i64 {
    (to.msrp - from.msrp).max(0)
}
