//! Value objects of a facility location instance.

/// Identifier of a candidate location (1-based).
pub type LocationId = usize;

/// Identifier of a client (1-based).
pub type ClientId = usize;

/// A candidate facility location.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// 1-based identifier.
    pub id: LocationId,
    /// Maximum demand the facility can serve once opened.
    pub capacity: f64,
    /// Cost paid for opening the facility.
    pub fixed_cost: f64,
}

impl Location {
    pub fn new(id: LocationId, capacity: f64, fixed_cost: f64) -> Self {
        Self {
            id,
            capacity,
            fixed_cost,
        }
    }
}

/// A client with a demand to be served.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Client {
    /// 1-based identifier.
    pub id: ClientId,
    /// Demand to be allocated among open facilities.
    pub demand: f64,
}

impl Client {
    pub fn new(id: ClientId, demand: f64) -> Self {
        Self { id, demand }
    }
}
