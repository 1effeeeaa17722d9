//! Instance validation errors.

use super::types::{ClientId, LocationId};

/// Reasons an instance is rejected at construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceError {
    /// The instance has no candidate locations.
    NoLocations,
    /// Identifiers must run `1..=n` in order.
    NonContiguousId {
        expected: usize,
        found: usize,
    },
    /// A capacity is negative or not finite.
    InvalidCapacity {
        location: LocationId,
        value: f64,
    },
    /// A fixed opening cost is not finite.
    InvalidFixedCost {
        location: LocationId,
        value: f64,
    },
    /// A demand is negative or not finite.
    InvalidDemand {
        client: ClientId,
        value: f64,
    },
    /// The transport matrix is neither empty nor `clients x locations`.
    TransportShape {
        expected: usize,
        found: usize,
    },
    /// A transport cost is not finite.
    InvalidTransportCost {
        client: ClientId,
        location: LocationId,
        value: f64,
    },
    /// Parallel input slices have different lengths.
    LengthMismatch {
        capacities: usize,
        fixed_costs: usize,
    },
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceError::NoLocations => write!(f, "instance has no candidate locations"),
            InstanceError::NonContiguousId { expected, found } => {
                write!(f, "expected identifier {expected}, found {found}")
            }
            InstanceError::InvalidCapacity { location, value } => {
                write!(f, "location {location} has invalid capacity {value}")
            }
            InstanceError::InvalidFixedCost { location, value } => {
                write!(f, "location {location} has invalid fixed cost {value}")
            }
            InstanceError::InvalidDemand { client, value } => {
                write!(f, "client {client} has invalid demand {value}")
            }
            InstanceError::TransportShape { expected, found } => {
                write!(
                    f,
                    "transport matrix must hold {expected} entries (or none), found {found}"
                )
            }
            InstanceError::InvalidTransportCost {
                client,
                location,
                value,
            } => write!(
                f,
                "transport cost from client {client} to location {location} is invalid: {value}"
            ),
            InstanceError::LengthMismatch {
                capacities,
                fixed_costs,
            } => write!(
                f,
                "{capacities} capacities given for {fixed_costs} fixed costs"
            ),
        }
    }
}

impl std::error::Error for InstanceError {}
