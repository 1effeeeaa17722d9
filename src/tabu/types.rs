//! State and result types of the facility-opening Tabu Search.

use crate::instance::{LocationId, OpenSet};
use crate::oracle::Assignment;

/// A 1-swap: close `closed`, open `opened`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    /// Location taken out of the open-set.
    pub closed: LocationId,
    /// Location added to the open-set.
    pub opened: LocationId,
}

impl Move {
    pub fn new(closed: LocationId, opened: LocationId) -> Self {
        Self { closed, opened }
    }

    /// The move that undoes this one.
    pub fn reverse(self) -> Self {
        Self {
            closed: self.opened,
            opened: self.closed,
        }
    }

    /// Applies the move to `open`, producing the neighbor.
    pub fn apply(&self, open: &OpenSet) -> OpenSet {
        open.swapped(self.closed, self.opened)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "-{} +{}", self.closed, self.opened)
    }
}

/// Why a move was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveKind {
    /// Neither endpoint was tabu.
    Admissible,
    /// Tabu, but its cost beat the best-known cost.
    Aspiration,
    /// Every feasible candidate was tabu; the cheapest was taken anyway.
    Panic,
}

/// Phase of the search state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Searching,
    Perturbing,
    Terminated,
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The iteration budget was used up.
    BudgetExhausted,
    /// No 1-swap exists (nothing open, or nothing closed).
    DegenerateNeighborhood,
    /// No feasible initial solution within the retry bound.
    InitialInfeasible,
    /// The caller finished the search before it terminated on its own.
    Stopped,
}

/// Mutable state of a running search.
///
/// Only the search loop mutates it. `best_cost` never increases.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Open-set the search is currently positioned at.
    pub current: OpenSet,
    /// Oracle cost of `current`.
    pub current_cost: f64,
    /// Best open-set found so far.
    pub best: OpenSet,
    /// Oracle cost of `best`.
    pub best_cost: f64,
    /// Consecutive accepted moves without a new best.
    pub stagnation: usize,
    /// Iterations executed so far.
    pub iteration: usize,
    /// Iteration at which `best_cost` was reached.
    pub best_iteration: usize,
}

impl SearchState {
    /// State seeded with a single evaluated open-set.
    pub fn new(open: OpenSet, cost: f64) -> Self {
        Self {
            current: open.clone(),
            current_cost: cost,
            best: open,
            best_cost: cost,
            stagnation: 0,
            iteration: 0,
            best_iteration: 0,
        }
    }
}

/// One entry of the convergence trace.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryPoint {
    pub iteration: usize,
    /// Best cost known after this iteration.
    pub best_cost: f64,
    /// Relative gap to the oracle's lower bound, when one is known.
    pub gap: Option<f64>,
}

/// Append-only trace of `(iteration, best cost so far)`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceHistory {
    points: Vec<HistoryPoint>,
}

impl ConvergenceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the best cost after `iteration`, deriving the gap from
    /// `lower_bound`.
    ///
    /// Iterations are unique keys: recording the same iteration as the last
    /// point replaces it.
    pub fn record(&mut self, iteration: usize, best_cost: f64, lower_bound: Option<f64>) {
        let gap = lower_bound.and_then(|lb| relative_gap(best_cost, lb));
        let point = HistoryPoint {
            iteration,
            best_cost,
            gap,
        };
        match self.points.last_mut() {
            Some(last) if last.iteration == iteration => *last = point,
            _ => self.points.push(point),
        }
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryPoint> {
        self.points.last()
    }

    /// The best costs in recording order.
    pub fn costs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.best_cost).collect()
    }

    /// Whether the recorded best costs never increase.
    pub fn is_non_increasing(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[1].best_cost <= w[0].best_cost)
    }
}

fn relative_gap(best: f64, lower_bound: f64) -> Option<f64> {
    if best.is_finite() && lower_bound.is_finite() && best.abs() > 0.0 {
        Some(((best - lower_bound) / best.abs()).max(0.0))
    } else {
        None
    }
}

/// What one search iteration did.
#[derive(Debug, Clone, PartialEq)]
pub enum IterationOutcome {
    /// A move was applied.
    Moved {
        mv: Move,
        cost: f64,
        kind: MoveKind,
        /// Whether the move set a new best cost.
        improved: bool,
    },
    /// Every sampled neighbor was infeasible; state is unchanged.
    Skipped,
    /// No 1-swap exists; the search stops.
    Degenerate,
}

/// Details of a diversification step.
#[derive(Debug, Clone, PartialEq)]
pub struct Perturbation {
    /// Requested number of locations to close and to open.
    pub strength: usize,
    /// Locations closed (empty when the search fell back).
    pub closed: Vec<LocationId>,
    /// Locations opened (empty when the search fell back).
    pub opened: Vec<LocationId>,
    /// Cost of the new current open-set.
    pub cost: f64,
    /// Whether every attempt was infeasible and the search fell back to
    /// the best-known open-set.
    pub fell_back: bool,
}

/// Report of one call to [`SearchLoop::step`](super::SearchLoop::step).
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// 1-based index of the iteration just executed.
    pub iteration: usize,
    /// What the iteration did.
    pub outcome: IterationOutcome,
    /// Set when the iteration's stagnation triggered a perturbation.
    pub perturbation: Option<Perturbation>,
}

/// Final result of a search run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOutcome {
    /// Best open-set found (empty on failure).
    pub best_open_set: OpenSet,
    /// Cost of `best_open_set`: the refined value when refinement
    /// succeeded, the search value otherwise (`+inf` on failure).
    pub best_cost: f64,
    /// Cost of `best_open_set` as seen during the search.
    pub search_cost: f64,
    /// Iterations actually executed.
    pub iterations_run: usize,
    /// Iteration at which the best search cost was reached.
    pub best_iteration: usize,
    /// Number of perturbations performed.
    pub perturbations: usize,
    /// Why the search stopped.
    pub termination: Termination,
    /// Best cost per iteration at which it was recorded.
    pub history: ConvergenceHistory,
    /// Client allocations reported by the final refinement.
    pub assignments: Vec<Assignment>,
}

impl SearchOutcome {
    /// The designated failure result.
    pub fn failed(history: ConvergenceHistory) -> Self {
        Self {
            best_open_set: OpenSet::new(),
            best_cost: f64::INFINITY,
            search_cost: f64::INFINITY,
            iterations_run: 0,
            best_iteration: 0,
            perturbations: 0,
            termination: Termination::InitialInfeasible,
            history,
            assignments: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.termination != Termination::InitialInfeasible
    }
}
