//! Core types for the traffic simulation

use std::fmt;

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// Discrete unit of simulated time
pub type Tick = u64;

/// Traversal cost of a road
pub type Weight = f64;

/// An intersection, identified by its grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntersectionId {
    pub x: i32,
    pub y: i32,
}

impl IntersectionId {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Number of grid steps between two intersections
    pub fn manhattan_distance(&self, other: &IntersectionId) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for IntersectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for IntersectionId {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A wrapper type for road IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoadId(pub SimId);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub SimId);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 .0)
    }
}

/// A road segment connecting two intersections
#[derive(Debug, Clone)]
pub struct SimRoad {
    pub id: RoadId,
    pub start_intersection: IntersectionId,
    pub end_intersection: IntersectionId,
    pub is_two_way: bool,
}

impl SimRoad {
    pub fn new(
        id: RoadId,
        start_intersection: IntersectionId,
        end_intersection: IntersectionId,
        is_two_way: bool,
    ) -> Self {
        Self {
            id,
            start_intersection,
            end_intersection,
            is_two_way,
        }
    }
}

/// Ordered sequence of intersections from start to goal, inclusive.
///
/// An empty route means the goal could not be reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    nodes: Vec<IntersectionId>,
    cost: Weight,
}

impl Route {
    /// Route over `nodes` that cost `cost` when planned
    pub fn new(nodes: Vec<IntersectionId>, cost: Weight) -> Self {
        Self { nodes, cost }
    }

    /// The "no path" outcome
    pub fn unreachable() -> Self {
        Self {
            nodes: Vec::new(),
            cost: 0.0,
        }
    }

    /// Intersections from start to goal
    pub fn nodes(&self) -> &[IntersectionId] {
        &self.nodes
    }

    /// Number of intersections, both ends included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for the "no path" outcome
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First intersection, if any
    pub fn start(&self) -> Option<IntersectionId> {
        self.nodes.first().copied()
    }

    /// Last intersection, if any
    pub fn goal(&self) -> Option<IntersectionId> {
        self.nodes.last().copied()
    }

    /// Cost of the route at the time it was planned.
    /// Goes stale when road weights change; see `SimRoadNetwork::route_cost`.
    pub fn planned_cost(&self) -> Weight {
        self.cost
    }

    /// Whether the route passes through `intersection`
    pub fn contains(&self, intersection: IntersectionId) -> bool {
        self.nodes.contains(&intersection)
    }

    /// Intersection at `index` along the route
    pub fn get(&self, index: usize) -> Option<IntersectionId> {
        self.nodes.get(index).copied()
    }
}
