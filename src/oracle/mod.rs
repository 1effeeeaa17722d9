//! The assignment subproblem oracle.
//!
//! Given a fixed set of open facilities, an oracle returns the cost of the
//! cheapest feasible allocation of client demand to those facilities. The
//! search engine never solves this subproblem itself; it only consumes the
//! [`SubproblemOracle`] trait.
//!
//! An oracle session may keep solver state between calls (warm starts), so
//! evaluation takes `&mut self`: one session is never shared by two
//! evaluators at once. Concurrent neighborhood evaluation uses an
//! [`OracleArena`] holding one isolated session per worker.

mod arena;
mod types;

pub use arena::OracleArena;
pub use types::{Assignment, Evaluation, MaybeSend, Refinement, SubproblemOracle};
