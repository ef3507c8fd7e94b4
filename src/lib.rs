//! Traffic Simulation Library
//!
//! Vehicles routed with A* across a grid town, stepped tick by tick through
//! signalled intersections.

pub mod simulation;
