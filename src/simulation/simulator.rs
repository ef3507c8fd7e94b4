//! Tick orchestration
//!
//! Each `step` first advances every signal, then walks the vehicles in
//! ascending `VehicleId` order and moves each one whose next intersection
//! admits it. Vehicles do not contend for road capacity, so the order does
//! not change any vehicle's outcome; it is fixed only for reproducibility.

use log::{debug, info, warn};
use std::collections::BTreeMap;

use super::error::{SimError, SimResult};
use super::path_planner::PathPlanner;
use super::road_network::SimRoadNetwork;
use super::signal::SignalController;
use super::stats::SimulationStats;
use super::types::{IntersectionId, SimId, Tick, VehicleId, Weight};
use super::vehicle::{SimVehicle, VehicleStatus};

/// What happens to a vehicle once it reaches its goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrivalPolicy {
    /// Keep arrived vehicles so the host can still query them
    #[default]
    Retain,
    /// Drop arrived vehicles at the end of the tick they arrive in
    Remove,
}

/// Entry rules live on the `SignalController` handed to `Simulator::new`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulatorConfig {
    pub arrival_policy: ArrivalPolicy,
}

/// Outcome of one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub tick: Tick,
    pub advanced: Vec<VehicleId>,
    pub waiting: Vec<VehicleId>,
    pub arrived: Vec<VehicleId>,
}

/// Owns the road network, the signals and every vehicle
#[derive(Debug)]
pub struct Simulator {
    network: SimRoadNetwork,
    signals: SignalController,
    planner: PathPlanner,
    vehicles: BTreeMap<VehicleId, SimVehicle>,
    config: SimulatorConfig,
    next_id: usize,
    vehicles_spawned: u32,
    vehicles_arrived: u32,
    ticks_waiting: u64,
    ticks_run: u64,
}

impl Simulator {
    pub fn new(
        network: SimRoadNetwork,
        signals: SignalController,
        planner: PathPlanner,
        config: SimulatorConfig,
    ) -> Self {
        Self {
            network,
            signals,
            planner,
            vehicles: BTreeMap::new(),
            config,
            next_id: 0,
            vehicles_spawned: 0,
            vehicles_arrived: 0,
            ticks_waiting: 0,
            ticks_run: 0,
        }
    }

    /// Simulator with no signals and a Dijkstra planner
    pub fn with_network(network: SimRoadNetwork) -> Self {
        Self::new(
            network,
            SignalController::default(),
            PathPlanner::default(),
            SimulatorConfig::default(),
        )
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(SimId(self.next_id));
        self.next_id += 1;
        id
    }

    /// Plans a route and adds a vehicle standing at `start`
    ///
    /// An unreachable goal still creates the vehicle, parked at its start.
    pub fn spawn_vehicle(&mut self, start: IntersectionId, goal: IntersectionId) -> SimResult<VehicleId> {
        let route = self.planner.plan(&self.network, start, goal)?;
        let id = self.next_vehicle_id();
        let vehicle = SimVehicle::new(id, start, goal, route);

        match vehicle.status() {
            VehicleStatus::Parked => {
                warn!("Vehicle {} has no route from {} to {}; parked", id, start, goal)
            }
            VehicleStatus::Arrived => {
                info!("Vehicle {} spawned on its goal {}", id, goal);
                self.vehicles_arrived += 1;
            }
            VehicleStatus::EnRoute => info!(
                "Vehicle {} spawned at {} heading to {} ({} intersections, cost {:.1})",
                id,
                start,
                goal,
                vehicle.route().len(),
                vehicle.route().planned_cost()
            ),
        }

        self.vehicles_spawned += 1;
        self.vehicles.insert(id, vehicle);
        Ok(id)
    }

    /// Advances the simulation by one tick
    pub fn step(&mut self, tick: Tick) -> StepReport {
        self.signals.advance(tick);

        let mut report = StepReport {
            tick,
            ..StepReport::default()
        };

        // Signals are only read from here on
        let signals = &self.signals;
        for (id, vehicle) in self.vehicles.iter_mut() {
            let Some(next) = vehicle.next_intersection() else {
                continue;
            };

            if !signals.may_enter(next) {
                vehicle.record_wait();
                self.ticks_waiting += 1;
                report.waiting.push(*id);
                continue;
            }

            match vehicle.advance() {
                Ok(position) => {
                    debug!("Vehicle {} moved to {} at tick {}", id, position, tick);
                    report.advanced.push(*id);
                    if vehicle.is_arrived() {
                        info!("Vehicle {} arrived at {} at tick {}", id, position, tick);
                        vehicle.record_arrival(tick);
                        self.vehicles_arrived += 1;
                        report.arrived.push(*id);
                    }
                }
                Err(err) => warn!("Vehicle {} could not advance: {}", id, err),
            }
        }

        if self.config.arrival_policy == ArrivalPolicy::Remove {
            self.vehicles.retain(|_, vehicle| !vehicle.is_arrived());
        }

        self.ticks_run += 1;
        report
    }

    /// Changes a road's weight; existing routes are not replanned
    pub fn set_road_weight(
        &mut self,
        from: IntersectionId,
        to: IntersectionId,
        weight: Weight,
    ) -> SimResult<()> {
        self.network.set_weight(from, to, weight)
    }

    /// Replans one vehicle from its current position
    ///
    /// Returns whether the goal is still reachable.
    pub fn reroute(&mut self, id: VehicleId) -> SimResult<bool> {
        let vehicle = self
            .vehicles
            .get_mut(&id)
            .ok_or(SimError::UnknownVehicle(id))?;
        let was_arrived = vehicle.is_arrived();
        let reachable = vehicle.replan(&self.network, &self.planner)?;

        if !reachable {
            warn!(
                "Vehicle {} cannot reach {} from {}; parked",
                id,
                vehicle.goal(),
                vehicle.current_position()
            );
        } else if !was_arrived && vehicle.is_arrived() {
            self.vehicles_arrived += 1;
        }
        Ok(reachable)
    }

    /// Replans every vehicle that has not arrived yet, parked ones included.
    /// Returns the vehicles left without a route.
    pub fn reroute_all(&mut self) -> SimResult<Vec<VehicleId>> {
        let ids: Vec<VehicleId> = self
            .vehicles
            .values()
            .filter(|vehicle| !vehicle.is_arrived())
            .map(SimVehicle::id)
            .collect();

        let mut stranded = Vec::new();
        for id in ids {
            if !self.reroute(id)? {
                stranded.push(id);
            }
        }
        Ok(stranded)
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&SimVehicle> {
        self.vehicles.get(&id)
    }

    /// All vehicles in ascending ID order
    pub fn vehicles(&self) -> impl Iterator<Item = &SimVehicle> {
        self.vehicles.values()
    }

    pub fn network(&self) -> &SimRoadNetwork {
        &self.network
    }

    pub fn signals(&self) -> &SignalController {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut SignalController {
        &mut self.signals
    }

    pub fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    pub fn config(&self) -> SimulatorConfig {
        self.config
    }

    /// True once no vehicle has anywhere left to go
    pub fn is_complete(&self) -> bool {
        self.vehicles
            .values()
            .all(|vehicle| vehicle.status() != VehicleStatus::EnRoute)
    }

    pub fn stats(&self) -> SimulationStats {
        let count = |status: VehicleStatus| {
            self.vehicles
                .values()
                .filter(|vehicle| vehicle.status() == status)
                .count() as u32
        };

        SimulationStats {
            total_vehicles_spawned: self.vehicles_spawned,
            total_vehicles_arrived: self.vehicles_arrived,
            parked_vehicles: count(VehicleStatus::Parked),
            active_vehicles: count(VehicleStatus::EnRoute),
            total_ticks_waiting: self.ticks_waiting,
            ticks_run: self.ticks_run,
            total_intersections: self.network.intersection_count() as u32,
            total_roads: self.network.road_count() as u32,
        }
    }
}
