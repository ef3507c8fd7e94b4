//! Routing-and-stepping core of the traffic simulation
//!
//! A weighted road network, an A* planner, per-intersection traffic signals
//! and vehicles that move one intersection per tick, tied together by the
//! `Simulator`. Rendering and process setup live outside this module.

mod error;
mod path_planner;
mod road_network;
mod signal;
mod simulator;
mod stats;
mod types;
mod vehicle;

pub mod town;

pub use error::{SimError, SimResult};
pub use path_planner::{manhattan_heuristic, plan, zero_heuristic, PathPlanner};
pub use road_network::{RoadEdge, SimRoadNetwork};
pub use signal::{EntryPolicy, PhaseDurations, SignalController, SignalPhase, SignalState};
pub use simulator::{ArrivalPolicy, Simulator, SimulatorConfig, StepReport};
pub use stats::SimulationStats;
pub use types::{IntersectionId, RoadId, Route, SimId, SimRoad, Tick, VehicleId, Weight};
pub use vehicle::{SimVehicle, VehicleStatus};
