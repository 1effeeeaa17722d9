//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Build a capacity-feasible initial open-set and evaluate it (retried
//!    up to `initial_retries` times; failure ends the run)
//! 2. At each iteration:
//!    a. Sample `neighborhood_sample_size` random 1-swap neighbors
//!    b. Evaluate them with the oracle
//!    c. Select the cheapest admissible neighbor (not tabu, or tabu but
//!    beating the best-known cost); if none, the cheapest tabu one
//!    d. Apply the move, record both touched locations as tabu
//!    e. Update the best-known solution, or count a stagnant move
//!    f. After `stagnation_threshold` stagnant moves, perturb the best
//!    open-set, clear the tabu memory and continue from there
//! 3. Terminate when the iteration budget is used up or no swap exists,
//!    then refine the best open-set once with the oracle
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.

use std::collections::BTreeMap;

use rand::rngs::StdRng;

use crate::instance::{LocationId, OpenSet};
use crate::oracle::{Evaluation, MaybeSend, OracleArena, SubproblemOracle};
use crate::random::{create_rng, DEFAULT_SEED};

use super::config::TabuConfig;
use super::diversify::Diversifier;
use super::error::SearchError;
use super::initial::InitialSolutionBuilder;
use super::memory::{AspirationRule, TabuMemory};
use super::neighborhood::NeighborhoodSampler;
use super::types::{
    ConvergenceHistory, IterationOutcome, Move, MoveKind, Perturbation, Phase, SearchOutcome,
    SearchState, StepReport, Termination,
};

/// Facility-opening Tabu Search over a [`SubproblemOracle`].
///
/// The loop is a state machine (`Init -> Searching <-> Perturbing ->
/// Terminated`). [`run`](SearchLoop::run) drives it to completion;
/// [`initialize`](SearchLoop::initialize) and [`step`](SearchLoop::step)
/// expose it one iteration at a time.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use cflp_tabu::instance::{LocationId, OpenSet};
/// use cflp_tabu::oracle::{Evaluation, SubproblemOracle};
/// use cflp_tabu::tabu::{SearchLoop, TabuConfig};
///
/// /// Every location costs its id to open and holds 10 units.
/// struct IdCost;
///
/// impl SubproblemOracle for IdCost {
///     fn evaluate(&mut self, open: &OpenSet) -> Evaluation {
///         if open.len() * 10 < 30 {
///             return Evaluation::Infeasible;
///         }
///         Evaluation::Cost(open.iter().sum::<usize>() as f64)
///     }
///     fn total_demand(&self) -> f64 { 30.0 }
///     fn capacity_map(&self) -> BTreeMap<LocationId, f64> {
///         (1..=8).map(|id| (id, 10.0)).collect()
///     }
/// }
///
/// let config = TabuConfig::default().with_max_iterations(200).with_seed(7);
/// let outcome = SearchLoop::new(IdCost, config).unwrap().run();
/// assert!(outcome.is_success());
/// assert!(outcome.best_cost.is_finite());
/// assert!(outcome.history.is_non_increasing());
/// ```
pub struct SearchLoop<O> {
    config: TabuConfig,
    arena: OracleArena<O>,
    rng: StdRng,
    all_locations: Vec<LocationId>,
    capacities: BTreeMap<LocationId, f64>,
    total_demand: f64,
    builder: InitialSolutionBuilder,
    sampler: NeighborhoodSampler,
    diversifier: Diversifier,
    aspiration: AspirationRule,
    memory: TabuMemory,
    state: SearchState,
    history: ConvergenceHistory,
    lower_bound: Option<f64>,
    phase: Phase,
    termination: Option<Termination>,
    perturbations: usize,
}

impl<O: SubproblemOracle + MaybeSend> SearchLoop<O> {
    /// Creates a search over a single oracle session.
    pub fn new(oracle: O, config: TabuConfig) -> Result<Self, SearchError> {
        Self::with_sessions(vec![oracle], config)
    }

    /// Creates a search over independent oracle sessions.
    ///
    /// Neighborhoods are split across the sessions; with
    /// [`TabuConfig::parallel`] and the `parallel` feature the sessions are
    /// driven concurrently. Session 0 serves every other call.
    pub fn with_sessions(sessions: Vec<O>, config: TabuConfig) -> Result<Self, SearchError> {
        config.validate().map_err(SearchError::InvalidConfig)?;
        let arena = OracleArena::from_sessions(sessions).ok_or(SearchError::NoSessions)?;

        let capacities = arena.primary().capacity_map();
        if capacities.is_empty() {
            return Err(SearchError::EmptyInstance);
        }
        let total_demand = arena.primary().total_demand();
        let all_locations: Vec<LocationId> = capacities.keys().copied().collect();

        let rng = create_rng(config.seed.unwrap_or(DEFAULT_SEED));

        Ok(Self {
            builder: InitialSolutionBuilder::from_config(&config),
            sampler: NeighborhoodSampler::new(config.neighborhood_sample_size),
            diversifier: Diversifier::from_config(&config),
            aspiration: AspirationRule::new(config.improvement_epsilon),
            memory: TabuMemory::new(config.tabu_tenure),
            state: SearchState::new(OpenSet::new(), f64::INFINITY),
            history: ConvergenceHistory::new(),
            lower_bound: None,
            phase: Phase::Init,
            termination: None,
            perturbations: 0,
            config,
            arena,
            rng,
            all_locations,
            capacities,
            total_demand,
        })
    }

    pub fn config(&self) -> &TabuConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current search state (empty with infinite costs before
    /// initialization).
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn memory(&self) -> &TabuMemory {
        &self.memory
    }

    pub fn history(&self) -> &ConvergenceHistory {
        &self.history
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Lower bound reported by the oracle at initialization.
    pub fn lower_bound(&self) -> Option<f64> {
        self.lower_bound
    }

    pub fn all_locations(&self) -> &[LocationId] {
        &self.all_locations
    }

    /// Builds and evaluates the initial open-set.
    ///
    /// Moves to `Searching` on success, or to `Terminated` with
    /// [`Termination::InitialInfeasible`] once every attempt was
    /// infeasible. Does nothing outside the `Init` phase.
    pub fn initialize(&mut self) {
        if self.phase != Phase::Init {
            return;
        }
        self.query_lower_bound();
        self.build_initial();
    }

    /// Starts the search from a caller-supplied open-set.
    ///
    /// Falls back to [`initialize`](SearchLoop::initialize) when `open`
    /// names unknown locations or the oracle cannot price it.
    pub fn initialize_from(&mut self, open: OpenSet) {
        if self.phase != Phase::Init {
            return;
        }
        self.query_lower_bound();

        if !open.is_empty() && open.is_subset_of(&self.all_locations) {
            let evaluation = self.arena.evaluate(&open);
            log_failure(&evaluation, &open);
            let cost = evaluation.cost();
            if cost.is_finite() {
                tracing::info!(open = open.len(), cost, "warm start");
                self.start(open, cost);
                return;
            }
        }
        tracing::warn!(%open, "warm start rejected, building an initial solution");
        self.build_initial();
    }

    fn query_lower_bound(&mut self) {
        self.lower_bound = self
            .arena
            .primary_mut()
            .relaxed_lower_bound()
            .filter(|lb| lb.is_finite());

        tracing::info!(
            locations = self.all_locations.len(),
            total_demand = self.total_demand,
            lower_bound = ?self.lower_bound,
            sessions = self.arena.len(),
            "starting tabu search"
        );
    }

    fn build_initial(&mut self) {
        for attempt in 1..=self.config.initial_retries {
            let open = self
                .builder
                .build(&self.capacities, self.total_demand, &mut self.rng);
            let evaluation = self.arena.evaluate(&open);
            log_failure(&evaluation, &open);

            let cost = evaluation.cost();
            if cost.is_finite() {
                tracing::info!(attempt, open = open.len(), cost, "initial solution");
                self.start(open, cost);
                return;
            }
            tracing::warn!(attempt, open = open.len(), "initial solution infeasible");
        }

        tracing::error!(
            retries = self.config.initial_retries,
            "no feasible initial solution, giving up"
        );
        self.terminate(Termination::InitialInfeasible);
    }

    fn start(&mut self, open: OpenSet, cost: f64) {
        self.state = SearchState::new(open, cost);
        self.history.record(0, cost, self.lower_bound);
        self.phase = Phase::Searching;
    }

    /// Executes one search iteration (initializing first if needed).
    ///
    /// Returns `None` once the search has terminated.
    pub fn step(&mut self) -> Option<StepReport> {
        if self.phase == Phase::Init {
            self.initialize();
        }
        if self.phase != Phase::Searching {
            return None;
        }
        if self.state.iteration >= self.config.max_iterations {
            self.terminate(Termination::BudgetExhausted);
            return None;
        }

        let iteration = self.state.iteration + 1;
        let best_cost = self.state.best_cost;

        let sample = self
            .sampler
            .sample(&self.state.current, &self.all_locations, &mut self.rng);
        let degenerate = sample.is_degenerate();
        let (mut candidates, moves): (Vec<OpenSet>, Vec<Move>) = sample.unzip();
        if degenerate {
            tracing::info!(
                iteration,
                open = self.state.current.len(),
                "no swap available, stopping"
            );
            self.terminate(Termination::DegenerateNeighborhood);
            return Some(StepReport {
                iteration: self.state.iteration,
                outcome: IterationOutcome::Degenerate,
                perturbation: None,
            });
        }

        let evaluations = self
            .arena
            .evaluate_batch(&candidates, self.config.parallel);
        for (evaluation, open) in evaluations.iter().zip(&candidates) {
            log_failure(evaluation, open);
        }

        self.state.iteration = iteration;
        let outcome = match self.select(&moves, &evaluations, best_cost) {
            None => {
                tracing::debug!(iteration, "every sampled neighbor infeasible, skipping");
                IterationOutcome::Skipped
            }
            Some((idx, cost, kind)) => {
                let mv = moves[idx];
                self.state.current = candidates.swap_remove(idx);
                self.state.current_cost = cost;
                self.memory.record_move(mv);

                let improved = self.config.improves(cost, self.state.best_cost);
                if improved {
                    self.state.best = self.state.current.clone();
                    self.state.best_cost = cost;
                    self.state.best_iteration = iteration;
                    self.state.stagnation = 0;
                    tracing::info!(iteration, cost, %mv, ?kind, "new best");
                } else {
                    self.state.stagnation += 1;
                    tracing::debug!(
                        iteration,
                        cost,
                        best = self.state.best_cost,
                        stagnation = self.state.stagnation,
                        %mv,
                        ?kind,
                        "moved"
                    );
                }
                self.history
                    .record(iteration, self.state.best_cost, self.lower_bound);

                IterationOutcome::Moved {
                    mv,
                    cost,
                    kind,
                    improved,
                }
            }
        };

        let perturbation = if self.state.stagnation >= self.config.stagnation_threshold {
            Some(self.perturb())
        } else {
            None
        };

        if iteration >= self.config.max_iterations {
            self.terminate(Termination::BudgetExhausted);
        }

        Some(StepReport {
            iteration,
            outcome,
            perturbation,
        })
    }

    /// Runs the search to termination and returns its outcome.
    pub fn run(mut self) -> SearchOutcome {
        while self.step().is_some() {}
        self.finish()
    }

    /// Stops the search and refines the best open-set.
    ///
    /// Can be called at any point; an unfinished search reports
    /// [`Termination::Stopped`].
    pub fn finish(mut self) -> SearchOutcome {
        if self.phase == Phase::Init {
            self.initialize();
        }
        let termination = match self.termination {
            Some(Termination::InitialInfeasible) => {
                return SearchOutcome::failed(self.history);
            }
            Some(t) => t,
            None => Termination::Stopped,
        };

        let refinement = self.arena.primary_mut().refine(&self.state.best);
        let (best_cost, assignments) = match refinement.evaluation.normalized() {
            Evaluation::Cost(cost) => (cost, refinement.assignments),
            other => {
                tracing::warn!(
                    outcome = ?other,
                    "refinement of the best open-set failed, keeping the search cost"
                );
                (self.state.best_cost, Vec::new())
            }
        };

        tracing::info!(
            iterations = self.state.iteration,
            best_cost,
            search_cost = self.state.best_cost,
            open = self.state.best.len(),
            perturbations = self.perturbations,
            ?termination,
            "tabu search finished"
        );

        SearchOutcome {
            best_open_set: self.state.best,
            best_cost,
            search_cost: self.state.best_cost,
            iterations_run: self.state.iteration,
            best_iteration: self.state.best_iteration,
            perturbations: self.perturbations,
            termination,
            history: self.history,
            assignments,
        }
    }

    /// Picks the move to apply: the cheapest admissible candidate, else the
    /// cheapest tabu-rejected one. Infeasible candidates never qualify and
    /// ties go to the earliest draw.
    fn select(
        &self,
        moves: &[Move],
        evaluations: &[Evaluation],
        best_cost: f64,
    ) -> Option<(usize, f64, MoveKind)> {
        let mut admissible: Option<(usize, f64, MoveKind)> = None;
        let mut rejected: Option<(usize, f64)> = None;

        for (idx, (&mv, evaluation)) in moves.iter().zip(evaluations).enumerate() {
            let cost = evaluation.cost();
            if !cost.is_finite() {
                continue;
            }
            match self.aspiration.classify(&self.memory, mv, cost, best_cost) {
                Some(kind) => {
                    if admissible.map_or(true, |(_, c, _)| cost < c) {
                        admissible = Some((idx, cost, kind));
                    }
                }
                None => {
                    tracing::trace!(%mv, cost, "tabu-rejected");
                    if rejected.map_or(true, |(_, c)| cost < c) {
                        rejected = Some((idx, cost));
                    }
                }
            }
        }

        admissible.or_else(|| {
            rejected.map(|(idx, cost)| {
                tracing::debug!(mv = %moves[idx], cost, "all candidates tabu, taking panic move");
                (idx, cost, MoveKind::Panic)
            })
        })
    }

    /// Diversifies from the best-known open-set after stagnation.
    fn perturb(&mut self) -> Perturbation {
        self.phase = Phase::Perturbing;
        self.memory.clear();
        self.state.stagnation = 0;
        self.perturbations += 1;

        let mut strength = 0;
        for attempt in 1..=self.config.initial_retries {
            let perturbed =
                self.diversifier
                    .perturb(&self.state.best, &self.all_locations, &mut self.rng);
            strength = perturbed.strength;

            let evaluation = self.arena.evaluate(&perturbed.open);
            log_failure(&evaluation, &perturbed.open);
            let cost = evaluation.cost();
            if !cost.is_finite() {
                tracing::debug!(attempt, "perturbed open-set infeasible");
                continue;
            }

            tracing::info!(
                iteration = self.state.iteration,
                strength,
                cost,
                best = self.state.best_cost,
                "perturbed best solution"
            );
            self.state.current = perturbed.open;
            self.state.current_cost = cost;
            if self.config.improves(cost, self.state.best_cost) {
                self.state.best = self.state.current.clone();
                self.state.best_cost = cost;
                self.state.best_iteration = self.state.iteration;
                self.history
                    .record(self.state.iteration, cost, self.lower_bound);
            }
            self.phase = Phase::Searching;

            return Perturbation {
                strength,
                closed: perturbed.closed,
                opened: perturbed.opened,
                cost,
                fell_back: false,
            };
        }

        tracing::warn!(
            retries = self.config.initial_retries,
            "every perturbation was infeasible, resuming from the best solution"
        );
        self.state.current = self.state.best.clone();
        self.state.current_cost = self.state.best_cost;
        self.phase = Phase::Searching;

        Perturbation {
            strength,
            closed: Vec::new(),
            opened: Vec::new(),
            cost: self.state.best_cost,
            fell_back: true,
        }
    }

    fn terminate(&mut self, termination: Termination) {
        self.phase = Phase::Terminated;
        self.termination = Some(termination);
    }
}

fn log_failure(evaluation: &Evaluation, open: &OpenSet) {
    if let Evaluation::SolverError(detail) = evaluation {
        tracing::warn!(
            open = open.len(),
            %detail,
            "oracle failed, treating the open-set as infeasible"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Uniform locations; cost = sum of fixed costs, infeasible below the
    /// demand.
    struct FixedCostOracle {
        fixed: Vec<f64>,
        capacity: f64,
        demand: f64,
    }

    impl FixedCostOracle {
        fn new(fixed: Vec<f64>, capacity: f64, demand: f64) -> Self {
            Self {
                fixed,
                capacity,
                demand,
            }
        }
    }

    impl SubproblemOracle for FixedCostOracle {
        fn evaluate(&mut self, open: &OpenSet) -> Evaluation {
            if open.len() as f64 * self.capacity < self.demand {
                return Evaluation::Infeasible;
            }
            Evaluation::Cost(open.iter().map(|id| self.fixed[id - 1]).sum())
        }

        fn total_demand(&self) -> f64 {
            self.demand
        }

        fn capacity_map(&self) -> BTreeMap<LocationId, f64> {
            (1..=self.fixed.len()).map(|id| (id, self.capacity)).collect()
        }
    }

    struct AlwaysInfeasible;

    impl SubproblemOracle for AlwaysInfeasible {
        fn evaluate(&mut self, _open: &OpenSet) -> Evaluation {
            Evaluation::Infeasible
        }
        fn total_demand(&self) -> f64 {
            1.0
        }
        fn capacity_map(&self) -> BTreeMap<LocationId, f64> {
            (1..=4).map(|id| (id, 1.0)).collect()
        }
    }

    /// Constant cost for the first `limit` calls, infeasible afterwards.
    struct FeasibleCalls {
        limit: usize,
        calls: usize,
    }

    impl FeasibleCalls {
        fn new(limit: usize) -> Self {
            Self { limit, calls: 0 }
        }
    }

    impl SubproblemOracle for FeasibleCalls {
        fn evaluate(&mut self, _open: &OpenSet) -> Evaluation {
            self.calls += 1;
            if self.calls <= self.limit {
                Evaluation::Cost(5.0)
            } else {
                Evaluation::Infeasible
            }
        }
        fn total_demand(&self) -> f64 {
            20.0
        }
        fn capacity_map(&self) -> BTreeMap<LocationId, f64> {
            (1..=6).map(|id| (id, 10.0)).collect()
        }
    }

    fn ramp(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64 * 10.0).collect()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let oracle = FixedCostOracle::new(ramp(5), 10.0, 20.0);
        let result = SearchLoop::new(oracle, TabuConfig::default().with_tabu_tenure(0));
        assert!(matches!(result, Err(SearchError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_empty_instance() {
        let oracle = FixedCostOracle::new(Vec::new(), 10.0, 20.0);
        let result = SearchLoop::new(oracle, TabuConfig::default());
        assert!(matches!(result, Err(SearchError::EmptyInstance)));
    }

    #[test]
    fn test_rejects_no_sessions() {
        let result =
            SearchLoop::<FixedCostOracle>::with_sessions(Vec::new(), TabuConfig::default());
        assert!(matches!(result, Err(SearchError::NoSessions)));
    }

    #[test]
    fn test_finds_cheapest_locations() {
        // three of twelve locations are needed; the cheapest three are 1, 2, 3
        let oracle = FixedCostOracle::new(ramp(12), 10.0, 25.0);
        let config = TabuConfig::default()
            .with_max_iterations(300)
            .with_neighborhood_sample_size(30)
            .with_tabu_tenure(2)
            .with_seed(42);

        let outcome = SearchLoop::new(oracle, config).unwrap().run();

        assert!(outcome.is_success());
        assert_eq!(outcome.termination, Termination::BudgetExhausted);
        assert_eq!(outcome.iterations_run, 300);
        assert!(
            outcome.best_cost <= 60.0 + 1e-9,
            "expected the three cheapest locations, got {} ({})",
            outcome.best_cost,
            outcome.best_open_set
        );
        assert!(outcome.history.is_non_increasing());
    }

    #[test]
    fn test_initial_infeasible_is_failure_result() {
        let outcome = SearchLoop::new(AlwaysInfeasible, TabuConfig::default())
            .unwrap()
            .run();
        assert_eq!(outcome.termination, Termination::InitialInfeasible);
        assert_eq!(outcome.best_cost, f64::INFINITY);
        assert!(outcome.best_open_set.is_empty());
        assert_eq!(outcome.iterations_run, 0);
        assert!(outcome.history.is_empty());
    }

    #[test]
    fn test_step_after_termination_returns_none() {
        let oracle = FixedCostOracle::new(ramp(6), 10.0, 20.0);
        let config = TabuConfig::default().with_max_iterations(3).with_seed(1);
        let mut search = SearchLoop::new(oracle, config).unwrap();

        let mut steps = 0;
        while search.step().is_some() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(search.phase(), Phase::Terminated);
        assert_eq!(search.termination(), Some(Termination::BudgetExhausted));
        assert!(search.step().is_none());
    }

    #[test]
    fn test_degenerate_when_everything_open() {
        // every location is needed, so the complement is empty
        let oracle = FixedCostOracle::new(ramp(4), 10.0, 40.0);
        let outcome = SearchLoop::new(oracle, TabuConfig::default().with_seed(3))
            .unwrap()
            .run();
        assert_eq!(outcome.termination, Termination::DegenerateNeighborhood);
        assert_eq!(outcome.iterations_run, 0);
        assert_eq!(outcome.best_open_set.len(), 4);
        assert!((outcome.best_cost - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_warm_start() {
        let oracle = FixedCostOracle::new(ramp(8), 10.0, 20.0);
        let mut search = SearchLoop::new(oracle, TabuConfig::default()).unwrap();
        search.initialize_from([6, 7, 8].into_iter().collect());
        assert_eq!(search.phase(), Phase::Searching);
        assert_eq!(search.state().best.to_vec(), vec![6, 7, 8]);
        assert!((search.state().best_cost - 210.0).abs() < 1e-9);
    }

    #[test]
    fn test_warm_start_with_unknown_location_falls_back() {
        let oracle = FixedCostOracle::new(ramp(8), 10.0, 20.0);
        let mut search = SearchLoop::new(oracle, TabuConfig::default()).unwrap();
        search.initialize_from([1, 42].into_iter().collect());
        assert_eq!(search.phase(), Phase::Searching);
        assert!(search.state().best.is_subset_of(search.all_locations()));
        assert!(search.state().best_cost.is_finite());
    }

    #[test]
    fn test_moves_record_tabu_and_aspiration_is_sound() {
        let oracle = FixedCostOracle::new(ramp(15), 10.0, 35.0);
        let config = TabuConfig::default()
            .with_max_iterations(100)
            .with_tabu_tenure(3)
            .with_seed(9);
        let mut search = SearchLoop::new(oracle, config).unwrap();
        search.initialize();

        loop {
            let best_before = search.state().best_cost;
            let Some(report) = search.step() else { break };
            if let IterationOutcome::Moved { mv, cost, kind, .. } = report.outcome {
                if kind == MoveKind::Aspiration {
                    assert!(cost < best_before);
                }
                if report.perturbation.is_none() {
                    assert!(search.memory().is_tabu(mv.closed));
                    assert!(search.memory().is_tabu(mv.opened));
                }
            }
        }
    }

    #[test]
    fn test_finish_before_termination_reports_stopped() {
        let oracle = FixedCostOracle::new(ramp(10), 10.0, 30.0);
        let config = TabuConfig::default().with_max_iterations(50).with_seed(4);
        let mut search = SearchLoop::new(oracle, config).unwrap();
        search.step();
        search.step();
        let outcome = search.finish();
        assert_eq!(outcome.termination, Termination::Stopped);
        assert_eq!(outcome.iterations_run, 2);
        assert!(outcome.best_cost.is_finite());
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let run = |seed| {
            let oracle = FixedCostOracle::new(ramp(20), 10.0, 55.0);
            let config = TabuConfig::default()
                .with_max_iterations(60)
                .with_stagnation_threshold(5)
                .with_seed(seed);
            SearchLoop::new(oracle, config).unwrap().run()
        };
        let a = run(21);
        let b = run(21);
        assert_eq!(a.best_open_set, b.best_open_set);
        assert_eq!(a.history, b.history);
        assert_eq!(a.perturbations, b.perturbations);
    }

    #[test]
    fn test_all_tabu_takes_panic_move() {
        // one of three locations is open; every later swap must close the
        // location opened by the previous move
        let oracle = FixedCostOracle::new(vec![1.0; 3], 10.0, 5.0);
        let config = TabuConfig::default()
            .with_tabu_tenure(2)
            .with_max_iterations(6)
            .with_seed(0);
        let mut search = SearchLoop::new(oracle, config).unwrap();
        search.initialize();
        assert_eq!(search.state().current.len(), 1);

        let mut kinds = Vec::new();
        loop {
            let before = search.state().current.clone();
            let Some(report) = search.step() else { break };
            match report.outcome {
                IterationOutcome::Moved { mv, kind, .. } => {
                    assert_ne!(search.state().current, before);
                    assert!(search.state().current.contains(mv.opened));
                    kinds.push(kind);
                }
                other => panic!("unexpected outcome {other:?}"),
            }
        }

        assert_eq!(kinds.len(), 6);
        assert_eq!(kinds[0], MoveKind::Admissible);
        assert!(kinds[1..].iter().all(|&k| k == MoveKind::Panic));
    }

    #[test]
    fn test_all_infeasible_neighbors_skip_the_iteration() {
        let mut search = SearchLoop::new(FeasibleCalls::new(1), TabuConfig::default()).unwrap();
        search.initialize();
        let start = search.state().clone();

        let report = search.step().unwrap();
        assert_eq!(report.outcome, IterationOutcome::Skipped);
        assert!(report.perturbation.is_none());

        let state = search.state();
        assert_eq!(state.iteration, 1);
        assert_eq!(state.stagnation, 0);
        assert_eq!(state.current, start.current);
        assert_eq!(state.current_cost, start.current_cost);
        assert_eq!(state.best_cost, start.best_cost);
        assert!(search.memory().is_empty());
        assert_eq!(search.history().len(), 1);
    }

    #[test]
    fn test_infeasible_perturbation_falls_back_to_best() {
        // initial evaluation plus one neighborhood of four, then nothing is
        // feasible
        let config = TabuConfig::default()
            .with_neighborhood_sample_size(4)
            .with_stagnation_threshold(1)
            .with_seed(6);
        let mut search = SearchLoop::new(FeasibleCalls::new(5), config).unwrap();
        search.initialize();
        let start = search.state().best.clone();

        let report = search.step().unwrap();
        let mv = match report.outcome {
            IterationOutcome::Moved { mv, improved, .. } => {
                assert!(!improved);
                mv
            }
            other => panic!("unexpected outcome {other:?}"),
        };
        let perturbation = report.perturbation.expect("stagnation of one perturbs");
        assert!(perturbation.fell_back);
        assert!(perturbation.closed.is_empty() && perturbation.opened.is_empty());
        assert_eq!(perturbation.cost, 5.0);

        let state = search.state();
        assert_eq!(state.best, start);
        assert_eq!(state.current, state.best);
        assert_eq!(state.current_cost, state.best_cost);
        assert!(!state.current.contains(mv.opened));
        assert_eq!(state.stagnation, 0);
        assert!(search.memory().is_empty());
        assert_eq!(search.phase(), Phase::Searching);

        assert_eq!(search.finish().perturbations, 1);
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn test_sessions_need_not_be_send() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct SharedCounter {
            calls: Rc<Cell<usize>>,
        }

        impl SubproblemOracle for SharedCounter {
            fn evaluate(&mut self, open: &OpenSet) -> Evaluation {
                self.calls.set(self.calls.get() + 1);
                Evaluation::Cost(open.iter().sum::<usize>() as f64)
            }
            fn total_demand(&self) -> f64 {
                20.0
            }
            fn capacity_map(&self) -> BTreeMap<LocationId, f64> {
                (1..=8).map(|id| (id, 10.0)).collect()
            }
        }

        let calls = Rc::new(Cell::new(0));
        let oracle = SharedCounter {
            calls: Rc::clone(&calls),
        };
        let config = TabuConfig::default().with_max_iterations(5).with_seed(2);
        let outcome = SearchLoop::new(oracle, config).unwrap().run();

        assert!(outcome.is_success());
        // initial + 5 neighborhoods of 20 + refinement
        assert_eq!(calls.get(), 1 + 5 * 20 + 1);
    }
}
