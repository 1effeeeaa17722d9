//! Tabu Search configuration.

/// Configuration parameters for the facility-opening Tabu Search.
///
/// The configuration is an immutable value handed to
/// [`SearchLoop::new`](super::SearchLoop::new); nothing in the engine reads
/// process-wide tunables.
///
/// # Examples
///
/// ```
/// use cflp_tabu::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_max_iterations(1000)
///     .with_tabu_tenure(7)
///     .with_neighborhood_sample_size(30)
///     .with_seed(11);
/// assert_eq!(config.max_iterations, 1000);
/// assert_eq!(config.tabu_tenure, 7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TabuConfig {
    /// Number of search iterations (the only termination budget).
    pub max_iterations: usize,

    /// Number of accepted moves an identifier stays tabu. The memory holds
    /// `2 * tabu_tenure` identifiers since each move touches two.
    pub tabu_tenure: usize,

    /// Number of random 1-swap neighbors drawn and evaluated per iteration.
    pub neighborhood_sample_size: usize,

    /// Initial open capacity must reach `total_demand * capacity_buffer`.
    pub capacity_buffer: f64,

    /// Consecutive non-improving moves that trigger a perturbation.
    pub stagnation_threshold: usize,

    /// Perturbation strength as a fraction of the best open-set size.
    pub perturbation_strength_ratio: f64,

    /// Lower bound on the perturbation strength.
    pub min_perturbation_strength: usize,

    /// Attempts at building a feasible initial solution (and at finding a
    /// feasible perturbation) before giving up.
    pub initial_retries: usize,

    /// Smallest fraction of the initial selection dropped for diversity.
    pub removal_ratio_min: f64,

    /// Largest fraction of the initial selection dropped for diversity.
    pub removal_ratio_max: f64,

    /// A cost `a` improves on `b` iff `a < b - improvement_epsilon`.
    ///
    /// The default 0.0 gives strict `<` comparisons.
    pub improvement_epsilon: f64,

    /// Whether to evaluate neighborhoods concurrently across oracle
    /// sessions (requires the `parallel` feature).
    pub parallel: bool,

    /// Random seed (None uses a fixed default seed).
    pub seed: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tabu_tenure: 7,
            neighborhood_sample_size: 20,
            capacity_buffer: 1.10,
            stagnation_threshold: 15,
            perturbation_strength_ratio: 0.10,
            min_perturbation_strength: 3,
            initial_retries: 10,
            removal_ratio_min: 0.20,
            removal_ratio_max: 0.30,
            improvement_epsilon: 0.0,
            parallel: false,
            seed: None,
        }
    }
}

impl TabuConfig {
    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the tabu tenure (accepted moves an identifier remains tabu).
    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    /// Sets the number of neighbors sampled per iteration.
    pub fn with_neighborhood_sample_size(mut self, n: usize) -> Self {
        self.neighborhood_sample_size = n;
        self
    }

    /// Sets the capacity safety margin of the initial solution.
    pub fn with_capacity_buffer(mut self, buffer: f64) -> Self {
        self.capacity_buffer = buffer;
        self
    }

    /// Sets the stagnation threshold that triggers perturbation.
    pub fn with_stagnation_threshold(mut self, n: usize) -> Self {
        self.stagnation_threshold = n;
        self
    }

    /// Sets the perturbation strength ratio.
    pub fn with_perturbation_strength_ratio(mut self, ratio: f64) -> Self {
        self.perturbation_strength_ratio = ratio;
        self
    }

    /// Sets the minimum perturbation strength.
    pub fn with_min_perturbation_strength(mut self, n: usize) -> Self {
        self.min_perturbation_strength = n;
        self
    }

    /// Sets the number of initial-solution attempts.
    pub fn with_initial_retries(mut self, n: usize) -> Self {
        self.initial_retries = n;
        self
    }

    /// Sets the diversity removal range of the initial builder.
    pub fn with_removal_ratio(mut self, min: f64, max: f64) -> Self {
        self.removal_ratio_min = min;
        self.removal_ratio_max = max;
        self
    }

    /// Sets the comparison tolerance.
    pub fn with_improvement_epsilon(mut self, eps: f64) -> Self {
        self.improvement_epsilon = eps.max(0.0);
        self
    }

    /// Enables or disables concurrent neighborhood evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether `candidate` counts as strictly better than `incumbent`.
    pub fn improves(&self, candidate: f64, incumbent: f64) -> bool {
        candidate < incumbent - self.improvement_epsilon
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` describing the first invalid parameter.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.tabu_tenure == 0 {
            return Err("tabu_tenure must be at least 1".into());
        }
        if self.neighborhood_sample_size == 0 {
            return Err("neighborhood_sample_size must be at least 1".into());
        }
        if !self.capacity_buffer.is_finite() || self.capacity_buffer < 1.0 {
            return Err(format!(
                "capacity_buffer must be >= 1.0, got {}",
                self.capacity_buffer
            ));
        }
        if self.stagnation_threshold == 0 {
            return Err("stagnation_threshold must be at least 1".into());
        }
        if !(self.perturbation_strength_ratio > 0.0 && self.perturbation_strength_ratio < 1.0) {
            return Err(format!(
                "perturbation_strength_ratio must be in (0, 1), got {}",
                self.perturbation_strength_ratio
            ));
        }
        if self.min_perturbation_strength == 0 {
            return Err("min_perturbation_strength must be at least 1".into());
        }
        if self.initial_retries == 0 {
            return Err("initial_retries must be at least 1".into());
        }
        if !(0.0..1.0).contains(&self.removal_ratio_min)
            || !(0.0..1.0).contains(&self.removal_ratio_max)
            || self.removal_ratio_min > self.removal_ratio_max
        {
            return Err(format!(
                "removal ratios must satisfy 0 <= min <= max < 1, got [{}, {}]",
                self.removal_ratio_min, self.removal_ratio_max
            ));
        }
        if !self.improvement_epsilon.is_finite() || self.improvement_epsilon < 0.0 {
            return Err("improvement_epsilon must be finite and non-negative".into());
        }
        Ok(())
    }
}
