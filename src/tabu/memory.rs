//! Short-term memory and the aspiration override.

use std::collections::{HashMap, VecDeque};

use crate::instance::LocationId;

use super::types::{Move, MoveKind};

/// Bounded FIFO of recently touched location identifiers.
///
/// A move is tabu when either endpoint is remembered, which blocks cycling
/// on both sides of a swap rather than only its literal reverse. Every
/// accepted move records two identifiers, so the memory holds
/// `2 * tenure` entries and an identifier stays tabu for at most `tenure`
/// further accepted moves.
#[derive(Debug, Clone)]
pub struct TabuMemory {
    queue: VecDeque<LocationId>,
    // multiplicity of each id in `queue`
    counts: HashMap<LocationId, usize>,
    capacity: usize,
}

impl TabuMemory {
    /// Memory for the given tenure (at least 1).
    pub fn new(tenure: usize) -> Self {
        let capacity = 2 * tenure.max(1);
        Self {
            queue: VecDeque::with_capacity(capacity),
            counts: HashMap::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_tabu(&self, id: LocationId) -> bool {
        self.counts.contains_key(&id)
    }

    /// Whether either endpoint of `mv` is tabu.
    pub fn is_move_tabu(&self, mv: Move) -> bool {
        self.is_tabu(mv.closed) || self.is_tabu(mv.opened)
    }

    /// Pushes `id`, evicting the oldest entry when full.
    pub fn record(&mut self, id: LocationId) {
        if self.queue.len() >= self.capacity {
            if let Some(old) = self.queue.pop_front() {
                self.forget(old);
            }
        }
        self.queue.push_back(id);
        *self.counts.entry(id).or_insert(0) += 1;
    }

    /// Records both endpoints of an accepted move.
    pub fn record_move(&mut self, mv: Move) {
        self.record(mv.closed);
        self.record(mv.opened);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.counts.clear();
    }

    /// Remembered identifiers, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.queue.iter().copied()
    }

    fn forget(&mut self, id: LocationId) {
        if let Some(n) = self.counts.get_mut(&id) {
            *n -= 1;
            if *n == 0 {
                self.counts.remove(&id);
            }
        }
    }
}

/// Lets a tabu move through when it beats the best-known cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct AspirationRule {
    epsilon: f64,
}

impl AspirationRule {
    /// Rule with comparison tolerance `epsilon` (0.0 for strict `<`).
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.max(0.0),
        }
    }

    /// Whether `candidate_cost` overrides the tabu status.
    pub fn is_met(&self, candidate_cost: f64, best_cost: f64) -> bool {
        candidate_cost < best_cost - self.epsilon
    }

    /// Classifies a candidate: `Some` kind if it may be selected, `None`
    /// if it is tabu-rejected.
    pub fn classify(
        &self,
        memory: &TabuMemory,
        mv: Move,
        candidate_cost: f64,
        best_cost: f64,
    ) -> Option<MoveKind> {
        if !memory.is_move_tabu(mv) {
            Some(MoveKind::Admissible)
        } else if self.is_met(candidate_cost, best_cost) {
            Some(MoveKind::Aspiration)
        } else {
            None
        }
    }
}
