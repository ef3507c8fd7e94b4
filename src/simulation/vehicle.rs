//! Vehicles stepping along precomputed routes

use super::error::{SimError, SimResult};
use super::path_planner::PathPlanner;
use super::road_network::SimRoadNetwork;
use super::types::{IntersectionId, Route, Tick, VehicleId};

/// Where a vehicle is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus {
    /// Still has intersections left to visit
    EnRoute,
    /// Standing on its goal
    Arrived,
    /// No route to the goal; stays where it is until rerouted
    Parked,
}

/// A vehicle in the traffic simulation
#[derive(Debug, Clone)]
pub struct SimVehicle {
    id: VehicleId,
    start: IntersectionId,
    goal: IntersectionId,
    /// Where the current route begins; the start until the first reroute
    origin: IntersectionId,
    route: Route,
    position_index: usize,
    ticks_waiting: u64,
    arrived_at: Option<Tick>,
}

impl SimVehicle {
    pub fn new(id: VehicleId, start: IntersectionId, goal: IntersectionId, route: Route) -> Self {
        Self {
            id,
            start,
            goal,
            origin: start,
            route,
            position_index: 0,
            ticks_waiting: 0,
            arrived_at: None,
        }
    }

    /// Plans a route and builds the vehicle standing at its start
    pub fn planned(
        id: VehicleId,
        start: IntersectionId,
        goal: IntersectionId,
        network: &SimRoadNetwork,
        planner: &PathPlanner,
    ) -> SimResult<Self> {
        let route = planner.plan(network, start, goal)?;
        Ok(Self::new(id, start, goal, route))
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn start(&self) -> IntersectionId {
        self.start
    }

    pub fn goal(&self) -> IntersectionId {
        self.goal
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn position_index(&self) -> usize {
        self.position_index
    }

    pub fn current_position(&self) -> IntersectionId {
        self.route.get(self.position_index).unwrap_or(self.origin)
    }

    /// The intersection this vehicle will enter on its next move
    pub fn next_intersection(&self) -> Option<IntersectionId> {
        self.route.get(self.position_index + 1)
    }

    pub fn is_arrived(&self) -> bool {
        !self.route.is_empty() && self.position_index == self.route.len() - 1
    }

    pub fn is_parked(&self) -> bool {
        self.route.is_empty()
    }

    pub fn status(&self) -> VehicleStatus {
        if self.is_parked() {
            VehicleStatus::Parked
        } else if self.is_arrived() {
            VehicleStatus::Arrived
        } else {
            VehicleStatus::EnRoute
        }
    }

    /// Ticks spent held at a signal
    pub fn ticks_waiting(&self) -> u64 {
        self.ticks_waiting
    }

    /// Tick on which the vehicle reached its goal while being stepped.
    /// Vehicles spawned on their goal never record one.
    pub fn arrived_at(&self) -> Option<Tick> {
        self.arrived_at
    }

    /// Moves one intersection along the route and returns the new position
    pub fn advance(&mut self) -> SimResult<IntersectionId> {
        if self.is_parked() {
            return Err(SimError::NoRoute(self.id));
        }
        if self.is_arrived() {
            return Err(SimError::AlreadyArrived(self.id));
        }
        self.position_index += 1;
        Ok(self.current_position())
    }

    pub(crate) fn record_wait(&mut self) {
        self.ticks_waiting += 1;
    }

    pub(crate) fn record_arrival(&mut self, tick: Tick) {
        self.arrived_at = Some(tick);
    }

    /// Plans a fresh route from where the vehicle stands to its goal
    ///
    /// Returns `false` when the goal is no longer reachable; the vehicle is
    /// then parked at its current position.
    pub fn replan(&mut self, network: &SimRoadNetwork, planner: &PathPlanner) -> SimResult<bool> {
        let position = self.current_position();
        let route = planner.plan(network, position, self.goal)?;
        let reachable = !route.is_empty();

        self.origin = position;
        self.route = route;
        self.position_index = 0;
        Ok(reachable)
    }
}
