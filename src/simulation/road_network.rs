//! Road network graph for pathfinding
//!
//! Two-way roads are stored as a pair of directed edges sharing one `RoadId`.
//! Setting the weight of a two-way road updates both directions, so the
//! adjacency stays symmetric. One-way roads only carry their forward edge.

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use super::error::{SimError, SimResult};
use super::types::{IntersectionId, RoadId, Route, SimId, SimRoad, Weight};

/// Edge data for the road network graph
#[derive(Debug, Clone, Copy)]
pub struct RoadEdge {
    pub road_id: RoadId,
    pub weight: Weight,
}

fn validate_weight(weight: Weight) -> SimResult<Weight> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(SimError::InvalidWeight(weight))
    }
}

/// Weighted road network over grid intersections
#[derive(Debug, Default, Clone)]
pub struct SimRoadNetwork {
    /// The underlying petgraph directed graph (one edge per driving direction)
    graph: DiGraph<IntersectionId, RoadEdge>,

    /// Maps intersection IDs to their node indices in the graph
    intersection_to_node: HashMap<IntersectionId, NodeIndex>,

    /// Storage for road data
    roads: HashMap<RoadId, SimRoad>,

    next_road_id: usize,
}

impl SimRoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an intersection to the network graph. Adding it twice is a no-op.
    pub fn add_intersection(&mut self, intersection_id: IntersectionId) {
        if self.intersection_to_node.contains_key(&intersection_id) {
            return;
        }

        let node_index = self.graph.add_node(intersection_id);
        self.intersection_to_node
            .insert(intersection_id, node_index);
    }

    pub fn contains(&self, intersection_id: IntersectionId) -> bool {
        self.intersection_to_node.contains_key(&intersection_id)
    }

    fn node(&self, intersection_id: IntersectionId) -> SimResult<NodeIndex> {
        self.intersection_to_node
            .get(&intersection_id)
            .copied()
            .ok_or(SimError::UnknownNode(intersection_id))
    }

    fn edge(&self, from: IntersectionId, to: IntersectionId) -> SimResult<EdgeIndex> {
        let from_node = self.node(from)?;
        let to_node = self.node(to)?;
        self.graph
            .find_edge(from_node, to_node)
            .ok_or(SimError::UnknownEdge(from, to))
    }

    /// Adds a one-way road from `start` to `end`
    pub fn add_road(
        &mut self,
        start: IntersectionId,
        end: IntersectionId,
        weight: Weight,
    ) -> SimResult<RoadId> {
        self.insert_road(start, end, weight, false)
    }

    /// Adds a road drivable in both directions
    pub fn add_two_way_road(
        &mut self,
        start: IntersectionId,
        end: IntersectionId,
        weight: Weight,
    ) -> SimResult<RoadId> {
        self.insert_road(start, end, weight, true)
    }

    fn insert_road(
        &mut self,
        start: IntersectionId,
        end: IntersectionId,
        weight: Weight,
        is_two_way: bool,
    ) -> SimResult<RoadId> {
        let weight = validate_weight(weight)?;
        let start_node = self.node(start)?;
        let end_node = self.node(end)?;

        if self.graph.find_edge(start_node, end_node).is_some() {
            return Err(SimError::DuplicateRoad(start, end));
        }
        if is_two_way && self.graph.find_edge(end_node, start_node).is_some() {
            return Err(SimError::DuplicateRoad(end, start));
        }

        let road_id = RoadId(SimId(self.next_road_id));
        self.next_road_id += 1;

        self.graph
            .add_edge(start_node, end_node, RoadEdge { road_id, weight });
        if is_two_way && start_node != end_node {
            self.graph
                .add_edge(end_node, start_node, RoadEdge { road_id, weight });
        }

        self.roads
            .insert(road_id, SimRoad::new(road_id, start, end, is_two_way));
        Ok(road_id)
    }

    /// Outgoing roads of an intersection as `(neighbor, weight)` pairs,
    /// in the order the roads were added
    pub fn neighbors(&self, intersection_id: IntersectionId) -> SimResult<Vec<(IntersectionId, Weight)>> {
        let node_index = self.node(intersection_id)?;

        let mut edges: Vec<_> = self.graph.edges(node_index).collect();
        edges.sort_by_key(|edge| edge.id());

        Ok(edges
            .into_iter()
            .map(|edge| (self.graph[edge.target()], edge.weight().weight))
            .collect())
    }

    /// Current weight of the road from `from` to `to`
    pub fn weight(&self, from: IntersectionId, to: IntersectionId) -> SimResult<Weight> {
        let edge = self.edge(from, to)?;
        Ok(self.graph[edge].weight)
    }

    /// Changes the traversal cost of an existing road
    ///
    /// Routes planned earlier keep their node sequence; their recorded cost
    /// is stale until they are replanned.
    pub fn set_weight(
        &mut self,
        from: IntersectionId,
        to: IntersectionId,
        weight: Weight,
    ) -> SimResult<()> {
        let weight = validate_weight(weight)?;
        let edge = self.edge(from, to)?;
        let road_id = self.graph[edge].road_id;
        self.graph[edge].weight = weight;

        let is_two_way = self
            .roads
            .get(&road_id)
            .is_some_and(|road| road.is_two_way);
        if is_two_way {
            if let Ok(reverse) = self.edge(to, from) {
                self.graph[reverse].weight = weight;
            }
        }

        Ok(())
    }

    /// Cost of driving a route under the current road weights
    pub fn route_cost(&self, route: &Route) -> SimResult<Weight> {
        route
            .nodes()
            .windows(2)
            .try_fold(0.0, |total, pair| Ok(total + self.weight(pair[0], pair[1])?))
    }

    /// Gets all intersection IDs in the network, sorted
    pub fn intersections(&self) -> Vec<IntersectionId> {
        let mut intersections: Vec<_> = self.intersection_to_node.keys().copied().collect();
        intersections.sort();
        intersections
    }

    /// Get all roads, ordered by ID
    pub fn roads(&self) -> Vec<&SimRoad> {
        let mut roads: Vec<_> = self.roads.values().collect();
        roads.sort_by_key(|road| road.id);
        roads
    }

    /// Get number of roads
    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    /// Get number of intersections
    pub fn intersection_count(&self) -> usize {
        self.intersection_to_node.len()
    }
}
