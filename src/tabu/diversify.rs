//! Perturbation of the best-known open-set.

use rand::Rng;

use crate::instance::{LocationId, OpenSet};
use crate::random::sample_distinct;

use super::config::TabuConfig;

/// A perturbed open-set together with the changes that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Perturbed {
    /// The perturbed open-set.
    pub open: OpenSet,
    /// Locations closed, in draw order.
    pub closed: Vec<LocationId>,
    /// Locations opened, in draw order.
    pub opened: Vec<LocationId>,
    /// Requested number of changes per side; fewer are made when a side
    /// runs short of candidates.
    pub strength: usize,
}

/// Escapes stagnation by closing `strength` random open locations and
/// opening `strength` random closed ones.
///
/// `strength` is `perturbation_strength_ratio * |open|`, rounded, and at
/// least `min_perturbation_strength`. Fewer changes are made when a side
/// has too few candidates; at least one location always stays open.
#[derive(Debug, Clone, Copy)]
pub struct Diversifier {
    strength_ratio: f64,
    min_strength: usize,
}

impl Diversifier {
    pub fn new(strength_ratio: f64, min_strength: usize) -> Self {
        Self {
            strength_ratio,
            min_strength,
        }
    }

    pub fn from_config(config: &TabuConfig) -> Self {
        Self::new(
            config.perturbation_strength_ratio,
            config.min_perturbation_strength,
        )
    }

    /// Strength used for an open-set of `open_size` locations.
    pub fn strength(&self, open_size: usize) -> usize {
        ((self.strength_ratio * open_size as f64).round() as usize).max(self.min_strength)
    }

    pub fn perturb<R: Rng>(&self, base: &OpenSet, all_locations: &[LocationId], rng: &mut R) -> Perturbed {
        let strength = self.strength(base.len());

        let opened = sample_distinct(&base.closed_among(all_locations), strength, rng);
        let max_close = (base.len() + opened.len()).saturating_sub(1).min(base.len());
        let closed = sample_distinct(&base.to_vec(), strength.min(max_close), rng);

        let mut open = base.clone();
        for &id in &closed {
            open.remove(id);
        }
        for &id in &opened {
            open.insert(id);
        }

        Perturbed {
            open,
            closed,
            opened,
            strength,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_strength_floor_and_ratio() {
        let d = Diversifier::new(0.1, 3);
        assert_eq!(d.strength(5), 3);
        assert_eq!(d.strength(50), 5);
        assert_eq!(d.strength(200), 20);
    }

    #[test]
    fn test_symmetric_difference_is_twice_strength() {
        let all: Vec<LocationId> = (1..=100).collect();
        let base: OpenSet = (1..=40).collect();
        let d = Diversifier::new(0.1, 3);
        let p = d.perturb(&base, &all, &mut create_rng(8));

        assert_eq!(p.strength, 4);
        assert_eq!(p.closed.len(), 4);
        assert_eq!(p.opened.len(), 4);
        assert_eq!(p.open.symmetric_difference_len(&base), 2 * p.strength);
        assert_eq!(p.open.len(), base.len());
        assert!(p.closed.iter().all(|id| base.contains(*id) && !p.open.contains(*id)));
        assert!(p.opened.iter().all(|id| !base.contains(*id) && p.open.contains(*id)));
    }

    #[test]
    fn test_limited_by_available_candidates() {
        let all: Vec<LocationId> = (1..=6).collect();
        let base: OpenSet = (1..=5).collect();
        let d = Diversifier::new(0.5, 3);
        let p = d.perturb(&base, &all, &mut create_rng(1));

        assert_eq!(p.opened, vec![6]);
        assert_eq!(p.closed.len(), 3);
        assert_eq!(p.open.symmetric_difference_len(&base), 4);
    }

    #[test]
    fn test_keeps_one_location_open() {
        let all: Vec<LocationId> = (1..=2).collect();
        let base: OpenSet = (1..=2).collect();
        let d = Diversifier::new(0.5, 3);
        let p = d.perturb(&base, &all, &mut create_rng(1));
        assert!(p.opened.is_empty());
        assert_eq!(p.open.len(), 1);
    }
}
