//! One isolated oracle session per evaluator.

use crate::instance::OpenSet;

use super::types::{Evaluation, MaybeSend, SubproblemOracle};

/// Owns the oracle sessions used by a search.
///
/// Session 0 is the primary session: it serves every call outside
/// neighborhood evaluation (initial solution, perturbation, lower bound,
/// final refinement). A neighborhood batch is split into contiguous
/// chunks, one per session, so no session is ever driven by two workers.
#[derive(Debug)]
pub struct OracleArena<O> {
    sessions: Vec<O>,
}

impl<O: SubproblemOracle + MaybeSend> OracleArena<O> {
    /// An arena with a single session; batches are evaluated in order.
    pub fn new(primary: O) -> Self {
        Self {
            sessions: vec![primary],
        }
    }

    /// An arena over independent sessions. Returns `None` if `sessions` is
    /// empty.
    pub fn from_sessions(sessions: Vec<O>) -> Option<Self> {
        if sessions.is_empty() {
            None
        } else {
            Some(Self { sessions })
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn primary(&self) -> &O {
        &self.sessions[0]
    }

    pub fn primary_mut(&mut self) -> &mut O {
        &mut self.sessions[0]
    }

    /// Evaluates one open-set on the primary session.
    pub fn evaluate(&mut self, open: &OpenSet) -> Evaluation {
        self.sessions[0].evaluate(open).normalized()
    }

    /// Evaluates every candidate, returning results in candidate order.
    ///
    /// With `parallel` set (and the `parallel` feature enabled) the chunks
    /// run concurrently on rayon's pool; otherwise sequentially. Both
    /// paths assign the same candidates to the same sessions.
    pub fn evaluate_batch(&mut self, candidates: &[OpenSet], parallel: bool) -> Vec<Evaluation> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let chunk = candidates.len().div_ceil(self.sessions.len());

        #[cfg(feature = "parallel")]
        {
            if parallel && self.sessions.len() > 1 {
                use rayon::prelude::*;

                let per_session: Vec<Vec<Evaluation>> = self
                    .sessions
                    .par_iter_mut()
                    .zip(candidates.par_chunks(chunk))
                    .map(|(session, batch)| {
                        batch
                            .iter()
                            .map(|open| session.evaluate(open).normalized())
                            .collect()
                    })
                    .collect();
                return per_session.into_iter().flatten().collect();
            }
        }
        #[cfg(not(feature = "parallel"))]
        let _ = parallel;

        let mut results = Vec::with_capacity(candidates.len());
        for (session, batch) in self.sessions.iter_mut().zip(candidates.chunks(chunk)) {
            for open in batch {
                results.push(session.evaluate(open).normalized());
            }
        }
        results
    }

    /// Releases the sessions.
    pub fn into_sessions(self) -> Vec<O> {
        self.sessions
    }
}
