//! Capacity-driven construction of the starting open-set.

use std::collections::BTreeMap;

use rand::Rng;

use crate::instance::{LocationId, OpenSet};
use crate::random::shuffle;

use super::config::TabuConfig;

/// Builds a randomized open-set whose capacity covers the buffered demand.
///
/// 1. Shuffle all locations and open them in that order until the open
///    capacity reaches `total_demand * capacity_buffer`.
/// 2. Close a random 20-30% of the chosen locations (keeping at least two)
///    so repeated builds start from different regions.
/// 3. If that drops capacity below the target, open random unused
///    locations (never-chosen ones first) until it is met again.
///
/// The result is only capacity-sum feasible; the oracle has the final say.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use cflp_tabu::random::create_rng;
/// use cflp_tabu::tabu::InitialSolutionBuilder;
///
/// let capacities: BTreeMap<usize, f64> = (1..=5).map(|id| (id, 10.0)).collect();
/// let builder = InitialSolutionBuilder::new(1.10);
/// let open = builder.build(&capacities, 40.0, &mut create_rng(42));
/// assert_eq!(open.to_vec(), vec![1, 2, 3, 4, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct InitialSolutionBuilder {
    capacity_buffer: f64,
    removal_ratio_min: f64,
    removal_ratio_max: f64,
}

impl InitialSolutionBuilder {
    pub fn new(capacity_buffer: f64) -> Self {
        Self {
            capacity_buffer,
            removal_ratio_min: 0.20,
            removal_ratio_max: 0.30,
        }
    }

    pub fn from_config(config: &TabuConfig) -> Self {
        Self::new(config.capacity_buffer)
            .with_removal_ratio(config.removal_ratio_min, config.removal_ratio_max)
    }

    /// Sets the fraction range of chosen locations dropped for diversity.
    pub fn with_removal_ratio(mut self, min: f64, max: f64) -> Self {
        self.removal_ratio_min = min.clamp(0.0, 1.0);
        self.removal_ratio_max = max.clamp(self.removal_ratio_min, 1.0);
        self
    }

    /// Capacity the built open-set aims for.
    pub fn target(&self, total_demand: f64) -> f64 {
        total_demand * self.capacity_buffer
    }

    /// Builds one open-set. Deterministic for a given RNG state.
    pub fn build<R: Rng>(
        &self,
        capacities: &BTreeMap<LocationId, f64>,
        total_demand: f64,
        rng: &mut R,
    ) -> OpenSet {
        let target = self.target(total_demand);
        let mut order: Vec<(LocationId, f64)> =
            capacities.iter().map(|(&id, &cap)| (id, cap)).collect();
        shuffle(&mut order, rng);

        let mut chosen = Vec::new();
        let mut acc = 0.0;
        let mut next = 0;
        while (acc < target || chosen.is_empty()) && next < order.len() {
            chosen.push(order[next]);
            acc += order[next].1;
            next += 1;
        }
        let untouched = order.split_off(next);

        if acc < target {
            tracing::warn!(
                capacity = acc,
                target,
                "total capacity is below the buffered demand, opening every location"
            );
            return chosen.into_iter().map(|(id, _)| id).collect();
        }

        let ratio = if self.removal_ratio_max > self.removal_ratio_min {
            rng.random_range(self.removal_ratio_min..=self.removal_ratio_max)
        } else {
            self.removal_ratio_min
        };
        let n_remove = ((chosen.len() as f64 * ratio).floor() as usize)
            .min(chosen.len().saturating_sub(2));
        shuffle(&mut chosen, rng);
        let removed = chosen.split_off(chosen.len() - n_remove);
        acc = chosen.iter().map(|&(_, cap)| cap).sum();

        for (id, cap) in untouched.into_iter().chain(removed) {
            if acc >= target {
                break;
            }
            chosen.push((id, cap));
            acc += cap;
        }

        tracing::debug!(
            open = chosen.len(),
            capacity = acc,
            target,
            removed = n_remove,
            "built initial open-set"
        );
        chosen.into_iter().map(|(id, _)| id).collect()
    }
}
