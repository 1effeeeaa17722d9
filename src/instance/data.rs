//! Immutable instance container.

use std::collections::BTreeMap;

use super::error::InstanceError;
use super::types::{Client, ClientId, Location, LocationId};

/// Capacities, fixed costs, demands and transport costs of one instance.
///
/// Transport costs are stored client-major: the cost of serving client `i`
/// from location `j` sits at `(i - 1) * n_locations + (j - 1)`, matching
/// the row order of the positional text format. The matrix may be left
/// empty when an oracle keeps its own copy.
///
/// # Examples
///
/// ```
/// use cflp_tabu::instance::InstanceData;
///
/// let data = InstanceData::from_parts(
///     &[10.0, 20.0],
///     &[5.0, 7.0],
///     &[4.0, 6.0, 8.0],
///     Vec::new(),
/// )
/// .unwrap();
/// assert_eq!(data.n_locations(), 2);
/// assert!((data.total_demand() - 18.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceData {
    locations: Vec<Location>,
    clients: Vec<Client>,
    transport_costs: Vec<f64>,
}

impl InstanceData {
    /// Validates and wraps locations, clients and a transport matrix.
    pub fn new(
        locations: Vec<Location>,
        clients: Vec<Client>,
        transport_costs: Vec<f64>,
    ) -> Result<Self, InstanceError> {
        if locations.is_empty() {
            return Err(InstanceError::NoLocations);
        }

        for (idx, loc) in locations.iter().enumerate() {
            if loc.id != idx + 1 {
                return Err(InstanceError::NonContiguousId {
                    expected: idx + 1,
                    found: loc.id,
                });
            }
            if !loc.capacity.is_finite() || loc.capacity < 0.0 {
                return Err(InstanceError::InvalidCapacity {
                    location: loc.id,
                    value: loc.capacity,
                });
            }
            if !loc.fixed_cost.is_finite() {
                return Err(InstanceError::InvalidFixedCost {
                    location: loc.id,
                    value: loc.fixed_cost,
                });
            }
        }

        for (idx, client) in clients.iter().enumerate() {
            if client.id != idx + 1 {
                return Err(InstanceError::NonContiguousId {
                    expected: idx + 1,
                    found: client.id,
                });
            }
            if !client.demand.is_finite() || client.demand < 0.0 {
                return Err(InstanceError::InvalidDemand {
                    client: client.id,
                    value: client.demand,
                });
            }
        }

        let expected = clients.len() * locations.len();
        if !transport_costs.is_empty() && transport_costs.len() != expected {
            return Err(InstanceError::TransportShape {
                expected,
                found: transport_costs.len(),
            });
        }
        if let Some(pos) = transport_costs.iter().position(|c| !c.is_finite()) {
            return Err(InstanceError::InvalidTransportCost {
                client: pos / locations.len() + 1,
                location: pos % locations.len() + 1,
                value: transport_costs[pos],
            });
        }

        Ok(Self {
            locations,
            clients,
            transport_costs,
        })
    }

    /// Builds an instance from parallel slices, assigning 1-based ids in
    /// order.
    pub fn from_parts(
        capacities: &[f64],
        fixed_costs: &[f64],
        demands: &[f64],
        transport_costs: Vec<f64>,
    ) -> Result<Self, InstanceError> {
        if capacities.len() != fixed_costs.len() {
            return Err(InstanceError::LengthMismatch {
                capacities: capacities.len(),
                fixed_costs: fixed_costs.len(),
            });
        }
        let locations = capacities
            .iter()
            .zip(fixed_costs)
            .enumerate()
            .map(|(i, (&cap, &fc))| Location::new(i + 1, cap, fc))
            .collect();
        let clients = demands
            .iter()
            .enumerate()
            .map(|(i, &d)| Client::new(i + 1, d))
            .collect();
        Self::new(locations, clients, transport_costs)
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn n_locations(&self) -> usize {
        self.locations.len()
    }

    pub fn n_clients(&self) -> usize {
        self.clients.len()
    }

    /// Looks up a location by its 1-based identifier.
    pub fn location(&self, id: LocationId) -> Option<&Location> {
        id.checked_sub(1).and_then(|idx| self.locations.get(idx))
    }

    /// All location identifiers in ascending order.
    pub fn location_ids(&self) -> Vec<LocationId> {
        self.locations.iter().map(|l| l.id).collect()
    }

    pub fn total_demand(&self) -> f64 {
        self.clients.iter().map(|c| c.demand).sum()
    }

    pub fn total_capacity(&self) -> f64 {
        self.locations.iter().map(|l| l.capacity).sum()
    }

    /// Capacity of every location keyed by identifier.
    pub fn capacity_map(&self) -> BTreeMap<LocationId, f64> {
        self.locations.iter().map(|l| (l.id, l.capacity)).collect()
    }

    /// Sum of fixed costs over `ids`; unknown ids contribute nothing.
    pub fn fixed_cost_of<'a>(&self, ids: impl IntoIterator<Item = &'a LocationId>) -> f64 {
        ids.into_iter()
            .filter_map(|&id| self.location(id))
            .map(|l| l.fixed_cost)
            .sum()
    }

    /// Whether the transport matrix was supplied.
    pub fn has_transport_costs(&self) -> bool {
        !self.transport_costs.is_empty()
    }

    /// Cost of serving all of `client`'s demand from `location`.
    pub fn transport_cost(&self, client: ClientId, location: LocationId) -> Option<f64> {
        if client == 0 || location == 0 || location > self.locations.len() {
            return None;
        }
        let idx = (client - 1) * self.locations.len() + (location - 1);
        self.transport_costs.get(idx).copied()
    }
}
