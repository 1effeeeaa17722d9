//! Tabu Search for the Capacitated Facility Location Problem (CFLP).
//!
//! The search decides which candidate locations to open. Pricing an
//! open-set (assigning clients to open locations at minimum transport
//! cost) is delegated to a pluggable subproblem oracle, typically an LP
//! solver session:
//!
//! - **Instance**: Locations, clients and transport costs of a CFLP
//!   instance, plus the [`OpenSet`](instance::OpenSet) decision type.
//! - **Oracle**: The [`SubproblemOracle`](oracle::SubproblemOracle) trait
//!   and an arena of independent sessions for batch evaluation.
//! - **Tabu Search (TS)**: Capacity-buffered initial solution, sampled
//!   1-swap neighborhoods, identifier tabu memory with aspiration, and
//!   stagnation-triggered perturbation.
//!
//! # Features
//!
//! - `parallel`: evaluates sampled neighborhoods concurrently with rayon,
//!   one oracle session per worker.
//! - `serde`: serialization of instances, configuration and results.

pub mod instance;
pub mod oracle;
pub mod random;
pub mod tabu;
