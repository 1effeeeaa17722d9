//! Oracle interface and evaluation outcomes.

use std::collections::BTreeMap;

use crate::instance::{ClientId, LocationId, OpenSet};

/// Outcome of evaluating one open-set.
///
/// Distinguishes "no feasible assignment exists" from "the solver itself
/// failed". The engine treats both as infinite cost but logs them
/// differently.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Evaluation {
    /// Total fixed plus transport cost of the best assignment found.
    Cost(f64),
    /// The open facilities cannot serve all demand.
    Infeasible,
    /// The solver failed (time limit, numerical trouble, crash, ...).
    SolverError(String),
}

impl Evaluation {
    /// Rewrites malformed costs: `+inf` becomes [`Evaluation::Infeasible`],
    /// NaN, negative and `-inf` values become [`Evaluation::SolverError`].
    pub fn normalized(self) -> Self {
        match self {
            Evaluation::Cost(v) if v == f64::INFINITY => Evaluation::Infeasible,
            Evaluation::Cost(v) if v.is_nan() => {
                Evaluation::SolverError("oracle returned NaN cost".into())
            }
            Evaluation::Cost(v) if !v.is_finite() || v < 0.0 => {
                Evaluation::SolverError(format!("oracle returned invalid cost {v}"))
            }
            other => other,
        }
    }

    /// The cost used for comparisons: the value for a valid
    /// [`Evaluation::Cost`], `+inf` for everything else.
    pub fn cost(&self) -> f64 {
        match *self {
            Evaluation::Cost(v) if v.is_finite() && v >= 0.0 => v,
            _ => f64::INFINITY,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.cost().is_finite()
    }
}

/// One client-to-location flow of a final assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    /// Client being served.
    pub client: ClientId,
    /// Open location serving it.
    pub location: LocationId,
    /// Fraction of the client's demand served by `location`; `1.0` when
    /// every client is single-sourced.
    pub share: f64,
}

/// Result of the high-precision evaluation run once after the search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Refinement {
    /// Cost of the refined assignment, or why it failed.
    pub evaluation: Evaluation,
    /// Client allocations, if the oracle reports them.
    pub assignments: Vec<Assignment>,
}

impl From<Evaluation> for Refinement {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            evaluation,
            assignments: Vec::new(),
        }
    }
}

/// Evaluates candidate open-sets for the search engine.
///
/// # Contract
///
/// - [`evaluate`](SubproblemOracle::evaluate) never panics for a subset of
///   the instance's locations; failures are reported as
///   [`Evaluation::SolverError`], insufficient capacity as
///   [`Evaluation::Infeasible`].
/// - The returned cost may be approximate (gap-bounded) during the search.
///   The engine treats it as authoritative for comparisons and calls
///   [`refine`](SubproblemOracle::refine) once on the final best open-set.
/// - [`total_demand`](SubproblemOracle::total_demand) and
///   [`capacity_map`](SubproblemOracle::capacity_map) are read once, when
///   the search is initialized.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use cflp_tabu::instance::{LocationId, OpenSet};
/// use cflp_tabu::oracle::{Evaluation, SubproblemOracle};
///
/// /// Pays 1 per open facility; needs at least two of them.
/// struct CountingOracle;
///
/// impl SubproblemOracle for CountingOracle {
///     fn evaluate(&mut self, open: &OpenSet) -> Evaluation {
///         if open.len() < 2 {
///             Evaluation::Infeasible
///         } else {
///             Evaluation::Cost(open.len() as f64)
///         }
///     }
///     fn total_demand(&self) -> f64 { 2.0 }
///     fn capacity_map(&self) -> BTreeMap<LocationId, f64> {
///         (1..=4).map(|id| (id, 1.0)).collect()
///     }
/// }
///
/// let mut oracle = CountingOracle;
/// let open: OpenSet = [1, 2].into_iter().collect();
/// assert_eq!(oracle.evaluate(&open).cost(), 2.0);
/// ```
pub trait SubproblemOracle {
    /// Cost of the best assignment for the given open facilities.
    fn evaluate(&mut self, open: &OpenSet) -> Evaluation;

    /// Total demand of all clients.
    fn total_demand(&self) -> f64;

    /// Capacity of every candidate location.
    fn capacity_map(&self) -> BTreeMap<LocationId, f64>;

    /// A lower bound on the optimum (e.g. from the LP relaxation), used
    /// only for gap reporting.
    fn relaxed_lower_bound(&mut self) -> Option<f64> {
        None
    }

    /// High-precision evaluation of the final best open-set.
    fn refine(&mut self, open: &OpenSet) -> Refinement {
        Refinement::from(self.evaluate(open))
    }
}

/// Thread-safety required of oracle sessions.
///
/// With the `parallel` feature sessions are moved onto rayon workers and
/// must be `Send`; otherwise any type qualifies, including sessions that
/// wrap thread-bound solver handles.
#[cfg(feature = "parallel")]
pub trait MaybeSend: Send {}

#[cfg(feature = "parallel")]
impl<T: Send + ?Sized> MaybeSend for T {}

/// Thread-safety required of oracle sessions.
///
/// With the `parallel` feature sessions are moved onto rayon workers and
/// must be `Send`; otherwise any type qualifies, including sessions that
/// wrap thread-bound solver handles.
#[cfg(not(feature = "parallel"))]
pub trait MaybeSend {}

#[cfg(not(feature = "parallel"))]
impl<T: ?Sized> MaybeSend for T {}

impl<O: SubproblemOracle + ?Sized> SubproblemOracle for Box<O> {
    fn evaluate(&mut self, open: &OpenSet) -> Evaluation {
        (**self).evaluate(open)
    }

    fn total_demand(&self) -> f64 {
        (**self).total_demand()
    }

    fn capacity_map(&self) -> BTreeMap<LocationId, f64> {
        (**self).capacity_map()
    }

    fn relaxed_lower_bound(&mut self) -> Option<f64> {
        (**self).relaxed_lower_bound()
    }

    fn refine(&mut self, open: &OpenSet) -> Refinement {
        (**self).refine(open)
    }
}
