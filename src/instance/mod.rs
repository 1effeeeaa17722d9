//! Problem instance data.
//!
//! An [`InstanceData`] is built once per run from candidate
//! [`Location`]s, [`Client`]s and (optionally) the client-major transport
//! cost matrix, validated, and never mutated afterwards. The search engine
//! itself only reads capacities and demands; transport costs are carried
//! for oracle implementations that solve the assignment subproblem.
//!
//! [`OpenSet`] is the decision the engine manipulates: a subset of the
//! instance's location identifiers.

mod data;
mod error;
mod open_set;
mod types;

pub use data::InstanceData;
pub use error::InstanceError;
pub use open_set::OpenSet;
pub use types::{Client, ClientId, Location, LocationId};
