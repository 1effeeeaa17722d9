//! Tabu Search (TS) over facility open-sets.
//!
//! A single-solution trajectory metaheuristic that uses short-term memory
//! (the tabu list) to forbid recently touched locations, preventing cycling
//! and encouraging exploration of new open-sets. Candidate open-sets are
//! priced by a [`SubproblemOracle`](crate::oracle::SubproblemOracle).
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod diversify;
mod error;
mod initial;
mod memory;
mod neighborhood;
mod runner;
mod types;

pub use config::TabuConfig;
pub use diversify::{Diversifier, Perturbed};
pub use error::SearchError;
pub use initial::InitialSolutionBuilder;
pub use memory::{AspirationRule, TabuMemory};
pub use neighborhood::{NeighborSample, NeighborhoodSampler};
pub use runner::SearchLoop;
pub use types::{
    ConvergenceHistory, HistoryPoint, IterationOutcome, Move, MoveKind, Perturbation, Phase,
    SearchOutcome, SearchState, StepReport, Termination,
};
