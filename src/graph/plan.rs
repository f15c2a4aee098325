//! The path graph of one upgrade plan.
//!
//! Nodes and edges are the only stored state. Incoming and outgoing edge
//! lists are derived through an index rebuilt after every structural edit,
//! so they always equal the set of edges pointing at (or leaving) a node.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::model::{msrp_delta, EdgeId, NodeId, PathEdge, PathNode, Position, SourceType};
use crate::catalog::models::Ship;
use crate::error::InvalidEdgeError;
use crate::logging::structured::LogContext;

/// A walk through the plan: a start node followed by chained edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPath {
    pub start: NodeId,
    pub edges: Vec<EdgeId>,
}

impl PlanPath {
    pub fn new(start: NodeId, edges: Vec<EdgeId>) -> Self {
        Self { start, edges }
    }
}

#[derive(Debug, Default, Clone)]
struct EdgeIndex {
    by_id: HashMap<EdgeId, usize>,
    incoming: HashMap<NodeId, Vec<usize>>,
    outgoing: HashMap<NodeId, Vec<usize>>,
}

impl EdgeIndex {
    fn build(edges: &[PathEdge]) -> Self {
        let mut index = Self::default();
        for (i, edge) in edges.iter().enumerate() {
            index.by_id.insert(edge.id.clone(), i);
            index.incoming.entry(edge.target.clone()).or_default().push(i);
            index.outgoing.entry(edge.source.clone()).or_default().push(i);
        }
        index
    }
}

#[derive(Serialize, Deserialize)]
struct PlanDocument {
    id: String,
    nodes: Vec<PathNode>,
    edges: Vec<PathEdge>,
}

#[derive(Debug, Clone)]
pub struct PathGraph {
    id: String,
    nodes: BTreeMap<NodeId, PathNode>,
    edges: Vec<PathEdge>,
    index: EdgeIndex,
}

impl Default for PathGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl PathGraph {
    pub fn new() -> Self {
        Self::with_id(&format!("plan-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]))
    }

    pub fn with_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            index: EdgeIndex::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.id)
    }

    fn reindex(&mut self) {
        self.index = EdgeIndex::build(&self.edges);
    }

    /// Place a ship on the canvas, stamped with the current time.
    pub fn add_node(&mut self, ship: Ship, position: Position) -> NodeId {
        self.add_node_at(ship, position, Utc::now().timestamp_millis())
    }

    /// Place a ship with an explicit timestamp. The timestamp is bumped
    /// until the generated id is unused.
    pub fn add_node_at(&mut self, ship: Ship, position: Position, timestamp_ms: i64) -> NodeId {
        let mut ts = timestamp_ms;
        let mut id = NodeId::for_ship(ship.id, ts);
        while self.nodes.contains_key(&id) {
            ts += 1;
            id = NodeId::for_ship(ship.id, ts);
        }

        crate::log_debug!(self.log_context(), "NODE_ADDED", node = id.as_str(), ship = ship.name.as_str());

        self.nodes.insert(
            id.clone(),
            PathNode {
                id: id.clone(),
                ship,
                position,
            },
        );
        id
    }

    pub fn add_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        source_type: SourceType,
        custom_price: Option<i64>,
    ) -> Result<EdgeId, InvalidEdgeError> {
        let source_node = self
            .nodes
            .get(source)
            .ok_or_else(|| InvalidEdgeError::MissingNode(source.clone()))?;
        let target_node = self
            .nodes
            .get(target)
            .ok_or_else(|| InvalidEdgeError::MissingNode(target.clone()))?;
        if source == target {
            return Err(InvalidEdgeError::SelfLoop(source.clone()));
        }

        let edge = PathEdge {
            id: EdgeId::generate(),
            source: source.clone(),
            target: target.clone(),
            source_type,
            price: msrp_delta(&source_node.ship, &target_node.ship),
            custom_price,
            source_ship: source_node.ship.clone(),
            target_ship: target_node.ship.clone(),
        };
        let id = edge.id.clone();

        crate::log_debug!(
            self.log_context().with_edge(id.as_str()),
            "EDGE_ADDED",
            source = source.as_str(),
            target = target.as_str(),
            source_type = source_type.as_str(),
        );

        self.edges.push(edge);
        self.reindex();
        Ok(id)
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<PathNode> {
        let node = self.nodes.remove(id)?;
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(id));
        self.reindex();

        crate::log_debug!(
            self.log_context(),
            "NODE_REMOVED",
            node = id.as_str(),
            edges_removed = before - self.edges.len(),
        );
        Some(node)
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<PathEdge> {
        let position = *self.index.by_id.get(id)?;
        let edge = self.edges.remove(position);
        self.reindex();
        Some(edge)
    }

    pub fn move_node(&mut self, id: &NodeId, position: Position) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    fn edge_mut(&mut self, id: &EdgeId) -> Option<&mut PathEdge> {
        let position = *self.index.by_id.get(id)?;
        self.edges.get_mut(position)
    }

    pub fn set_custom_price(&mut self, id: &EdgeId, custom_price: Option<i64>) -> bool {
        match self.edge_mut(id) {
            Some(edge) => {
                edge.custom_price = custom_price;
                true
            }
            None => false,
        }
    }

    pub fn set_source_type(&mut self, id: &EdgeId, source_type: SourceType) -> bool {
        match self.edge_mut(id) {
            Some(edge) => {
                edge.source_type = source_type;
                true
            }
            None => false,
        }
    }

    pub fn node(&self, id: &NodeId) -> Option<&PathNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PathNode> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&PathEdge> {
        self.index.by_id.get(id).map(|&i| &self.edges[i])
    }

    /// Edges in creation order.
    pub fn edges(&self) -> &[PathEdge] {
        &self.edges
    }

    pub fn incoming_edges(&self, node: &NodeId) -> Vec<&PathEdge> {
        self.index
            .incoming
            .get(node)
            .map(|ids| ids.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    pub fn outgoing_edges(&self, node: &NodeId) -> Vec<&PathEdge> {
        self.index
            .outgoing
            .get(node)
            .map(|ids| ids.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    /// Nodes nothing upgrades into; natural starting points.
    pub fn root_nodes(&self) -> Vec<&PathNode> {
        self.nodes
            .values()
            .filter(|n| !self.index.incoming.contains_key(&n.id))
            .collect()
    }

    pub fn terminal_nodes(&self) -> Vec<&PathNode> {
        self.nodes
            .values()
            .filter(|n| !self.index.outgoing.contains_key(&n.id))
            .collect()
    }

    /// Report one directed cycle, as the node sequence around it.
    ///
    /// Cycles are allowed in a plan; this only reports them.
    pub fn find_cycle(&self) -> Option<Vec<NodeId>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Active,
            Done,
        }

        fn visit<'a>(
            graph: &'a PathGraph,
            node: &'a NodeId,
            marks: &mut HashMap<&'a NodeId, Mark>,
            stack: &mut Vec<&'a NodeId>,
        ) -> Option<Vec<NodeId>> {
            marks.insert(node, Mark::Active);
            stack.push(node);

            for edge in graph.outgoing_edges(node) {
                match marks.get(&edge.target) {
                    Some(Mark::Active) => {
                        let start = stack.iter().position(|n| *n == &edge.target)?;
                        return Some(stack[start..].iter().map(|n| (*n).clone()).collect());
                    }
                    Some(Mark::Done) => continue,
                    None => {
                        if let Some(cycle) = visit(graph, &edge.target, marks, stack) {
                            return Some(cycle);
                        }
                    }
                }
            }

            stack.pop();
            marks.insert(node, Mark::Done);
            None
        }

        let mut marks = HashMap::new();
        for id in self.nodes.keys() {
            if marks.contains_key(id) {
                continue;
            }
            let mut stack = Vec::new();
            if let Some(cycle) = visit(self, id, &mut marks, &mut stack) {
                crate::log_warn!(self.log_context(), "CYCLE_DETECTED", nodes = cycle.len());
                return Some(cycle);
            }
        }
        None
    }

    /// Every simple path from `start` to a node where it cannot continue.
    ///
    /// A path ends at a terminal node, or where all remaining edges lead
    /// back to nodes already on the path.
    pub fn enumerate_paths(&self, start: &NodeId) -> Vec<PlanPath> {
        fn walk(
            graph: &PathGraph,
            node: &NodeId,
            on_path: &mut HashSet<NodeId>,
            edges: &mut Vec<EdgeId>,
            start: &NodeId,
            out: &mut Vec<PlanPath>,
        ) {
            let mut extended = false;
            for edge in graph.outgoing_edges(node) {
                if on_path.contains(&edge.target) {
                    continue;
                }
                extended = true;
                on_path.insert(edge.target.clone());
                edges.push(edge.id.clone());
                walk(graph, &edge.target, on_path, edges, start, out);
                edges.pop();
                on_path.remove(&edge.target);
            }
            if !extended {
                out.push(PlanPath::new(start.clone(), edges.clone()));
            }
        }

        let mut out = Vec::new();
        if !self.nodes.contains_key(start) {
            return out;
        }
        let mut on_path = HashSet::from([start.clone()]);
        walk(self, start, &mut on_path, &mut Vec::new(), start, &mut out);
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&PlanDocument {
            id: self.id.clone(),
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.clone(),
        })
    }

    /// Restore a saved plan. Edges whose endpoints are missing are dropped.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let doc: PlanDocument = serde_json::from_str(raw)?;
        let mut graph = Self::with_id(&doc.id);
        graph.nodes = doc.nodes.into_iter().map(|n| (n.id.clone(), n)).collect();

        let total = doc.edges.len();
        let nodes = &graph.nodes;
        graph.edges = doc
            .edges
            .into_iter()
            .filter(|e| nodes.contains_key(&e.source) && nodes.contains_key(&e.target))
            .collect();
        if graph.edges.len() != total {
            crate::log_warn!(
                graph.log_context(),
                "PLAN_DANGLING_EDGES_DROPPED",
                dropped = total - graph.edges.len(),
            );
        }

        graph.reindex();
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship(id: u64, name: &str, msrp: i64) -> Ship {
        Ship::new(id, name, msrp)
    }

    fn chain() -> (PathGraph, NodeId, NodeId, NodeId) {
        let mut graph = PathGraph::with_id("plan-test");
        let a = graph.add_node_at(ship(1, "Mustang Alpha", 3000), Position::default(), 1);
        let b = graph.add_node_at(ship(2, "Aurora LX", 3500), Position::default(), 2);
        let c = graph.add_node_at(ship(3, "Aurora LN", 4000), Position::default(), 3);
        graph.add_edge(&a, &b, SourceType::Official, None).unwrap();
        graph.add_edge(&b, &c, SourceType::Official, None).unwrap();
        (graph, a, b, c)
    }

    #[test]
    fn test_add_node_ids_unique_for_same_ship_and_time() {
        let mut graph = PathGraph::new();
        let first = graph.add_node_at(ship(5, "Cutlass Black", 11000), Position::default(), 100);
        let second = graph.add_node_at(ship(5, "Cutlass Black", 11000), Position::default(), 100);
        assert_eq!(first.as_str(), "ship-5-100");
        assert_eq!(second.as_str(), "ship-5-101");
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_add_edge_rejects_missing_nodes_and_self_loops() {
        let (mut graph, a, _, _) = chain();
        let ghost = NodeId::from("ship-99-0");

        assert_eq!(
            graph.add_edge(&a, &ghost, SourceType::Official, None),
            Err(InvalidEdgeError::MissingNode(ghost.clone()))
        );
        assert_eq!(
            graph.add_edge(&ghost, &a, SourceType::Official, None),
            Err(InvalidEdgeError::MissingNode(ghost))
        );
        assert_eq!(
            graph.add_edge(&a, &a, SourceType::Official, None),
            Err(InvalidEdgeError::SelfLoop(a))
        );
    }

    #[test]
    fn test_edge_price_is_msrp_delta() {
        let (graph, a, _, _) = chain();
        let edge = graph.outgoing_edges(&a)[0];
        assert_eq!(edge.price, 500);
        assert_eq!(edge.source_ship.name, "Mustang Alpha");
        assert_eq!(edge.target_ship.name, "Aurora LX");
    }

    #[test]
    fn test_incoming_edges_follow_structural_edits() {
        let (mut graph, a, b, c) = chain();
        let extra = graph.add_edge(&a, &c, SourceType::ThirdParty, Some(700)).unwrap();
        assert_eq!(graph.incoming_edges(&c).len(), 2);

        graph.remove_edge(&extra).unwrap();
        assert_eq!(graph.incoming_edges(&c).len(), 1);

        graph.remove_node(&b);
        assert!(graph.incoming_edges(&c).is_empty());
        assert!(graph.outgoing_edges(&a).is_empty());
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_roots_and_terminals() {
        let (graph, a, _, c) = chain();
        let roots: Vec<&NodeId> = graph.root_nodes().into_iter().map(|n| &n.id).collect();
        let terminals: Vec<&NodeId> = graph.terminal_nodes().into_iter().map(|n| &n.id).collect();
        assert_eq!(roots, vec![&a]);
        assert_eq!(terminals, vec![&c]);
    }

    #[test]
    fn test_edge_updates() {
        let (mut graph, a, _, _) = chain();
        let id = graph.outgoing_edges(&a)[0].id.clone();

        assert!(graph.set_custom_price(&id, Some(25)));
        assert!(graph.set_source_type(&id, SourceType::ThirdParty));
        let edge = graph.edge(&id).unwrap();
        assert_eq!(edge.custom_price, Some(25));
        assert_eq!(edge.source_type, SourceType::ThirdParty);

        assert!(!graph.set_custom_price(&EdgeId::from("edge-missing"), None));
        assert!(graph.move_node(&a, Position::new(10.0, 20.0)));
        assert_eq!(graph.node(&a).unwrap().position, Position::new(10.0, 20.0));
    }

    #[test]
    fn test_find_cycle() {
        let (mut graph, a, _, c) = chain();
        assert!(graph.find_cycle().is_none());

        graph.add_edge(&c, &a, SourceType::Official, None).unwrap();
        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle.len(), 3);
        assert!(cycle.contains(&a) && cycle.contains(&c));
    }

    #[test]
    fn test_enumerate_paths_branches_and_cycles() {
        let (mut graph, a, b, c) = chain();
        let d = graph.add_node_at(ship(4, "Avenger Titan", 5000), Position::default(), 4);
        graph.add_edge(&b, &d, SourceType::Official, None).unwrap();
        graph.add_edge(&c, &a, SourceType::Official, None).unwrap();

        let paths = graph.enumerate_paths(&a);
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.start == a && p.edges.len() == 2));

        assert!(graph.enumerate_paths(&NodeId::from("ship-0-0")).is_empty());
    }

    #[test]
    fn test_single_node_path() {
        let mut graph = PathGraph::new();
        let a = graph.add_node_at(ship(1, "Mustang Alpha", 3000), Position::default(), 1);
        assert_eq!(graph.enumerate_paths(&a), vec![PlanPath::new(a, vec![])]);
    }

    #[test]
    fn test_json_round_trip_drops_dangling_edges() {
        let (graph, _, b, c) = chain();
        let restored = PathGraph::from_json(&graph.to_json().unwrap()).unwrap();
        assert_eq!(restored.id(), "plan-test");
        assert_eq!(restored.edges(), graph.edges());
        assert_eq!(restored.incoming_edges(&c).len(), 1);

        let mut value: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();
        value["nodes"]
            .as_array_mut()
            .unwrap()
            .retain(|n| n["id"] != serde_json::json!(b.as_str()));
        let restored = PathGraph::from_json(&value.to_string()).unwrap();
        assert!(restored.edges().is_empty());
    }
}
