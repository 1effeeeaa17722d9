//! Random 1-swap neighborhood sampling.

use rand::Rng;

use crate::instance::{LocationId, OpenSet};

use super::types::Move;

/// Draws a bounded random sample of 1-swap neighbors.
///
/// Enumerating every swap costs `|open| * |closed|` oracle calls, which is
/// out of reach for instances with thousands of locations. Sampling caps
/// the oracle calls per iteration at `sample_size`.
#[derive(Debug, Clone, Copy)]
pub struct NeighborhoodSampler {
    sample_size: usize,
}

impl NeighborhoodSampler {
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size }
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// A lazy sequence of at most `sample_size` `(neighbor, move)` pairs.
    ///
    /// Each draw picks the location to close uniformly among the open ones
    /// and the location to open uniformly among the closed ones (draws are
    /// independent, so a move may repeat). The sequence is empty when
    /// `open` or its complement in `all_locations` is empty.
    pub fn sample<'a, R: Rng>(
        &self,
        open: &'a OpenSet,
        all_locations: &[LocationId],
        rng: &'a mut R,
    ) -> NeighborSample<'a, R> {
        NeighborSample {
            base: open,
            open: open.to_vec(),
            closed: open.closed_among(all_locations),
            remaining: self.sample_size,
            rng,
        }
    }
}

/// Iterator returned by [`NeighborhoodSampler::sample`].
pub struct NeighborSample<'a, R> {
    base: &'a OpenSet,
    open: Vec<LocationId>,
    closed: Vec<LocationId>,
    remaining: usize,
    rng: &'a mut R,
}

impl<R: Rng> NeighborSample<'_, R> {
    /// Whether no swap exists at all.
    pub fn is_degenerate(&self) -> bool {
        self.open.is_empty() || self.closed.is_empty()
    }
}

impl<R: Rng> Iterator for NeighborSample<'_, R> {
    type Item = (OpenSet, Move);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.is_degenerate() {
            return None;
        }
        self.remaining -= 1;

        let closed = self.open[self.rng.random_range(0..self.open.len())];
        let opened = self.closed[self.rng.random_range(0..self.closed.len())];
        let mv = Move::new(closed, opened);
        Some((mv.apply(self.base), mv))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.is_degenerate() {
            0
        } else {
            self.remaining
        };
        (n, Some(n))
    }
}
