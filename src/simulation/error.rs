//! Error taxonomy for the routing-and-stepping core.
//!
//! Every variant is caller misuse and is reported synchronously; the core
//! never retries. An unreachable goal is not an error, it is an empty
//! [`Route`](super::Route).

use thiserror::Error;

use super::types::{IntersectionId, VehicleId, Weight};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("intersection {0} not found in road network")]
    UnknownNode(IntersectionId),

    #[error("no road from {0} to {1}")]
    UnknownEdge(IntersectionId, IntersectionId),

    #[error("invalid road weight {0}: must be finite and non-negative")]
    InvalidWeight(Weight),

    #[error("road from {0} to {1} already exists")]
    DuplicateRoad(IntersectionId, IntersectionId),

    #[error("signal phase durations must be at least one tick")]
    InvalidPhaseDuration,

    #[error("vehicle {0} has already arrived")]
    AlreadyArrived(VehicleId),

    #[error("vehicle {0} has no route")]
    NoRoute(VehicleId),

    #[error("vehicle {0} not found")]
    UnknownVehicle(VehicleId),
}

/// Shorthand result type for the simulation core.
pub type SimResult<T> = Result<T, SimError>;
