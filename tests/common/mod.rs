//! Stub oracles shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use cflp_tabu::instance::{InstanceData, LocationId, OpenSet};
use cflp_tabu::oracle::{Assignment, Evaluation, Refinement, SubproblemOracle};
use rand::Rng;

/// Prices an open-set by filling clients, largest demand first, from their
/// cheapest open locations with remaining capacity. Demand may be split.
/// Without a transport matrix only fixed costs are charged.
#[derive(Clone)]
pub struct GreedyOracle {
    data: InstanceData,
    pub calls: usize,
}

impl GreedyOracle {
    pub fn new(data: InstanceData) -> Self {
        Self { data, calls: 0 }
    }

    pub fn data(&self) -> &InstanceData {
        &self.data
    }

    fn assign(&self, open: &OpenSet) -> Option<(f64, Vec<Assignment>)> {
        let mut remaining: BTreeMap<LocationId, f64> = open
            .iter()
            .filter_map(|id| self.data.location(id).map(|l| (id, l.capacity)))
            .collect();
        if remaining.values().sum::<f64>() < self.data.total_demand() {
            return None;
        }

        if !self.data.has_transport_costs() {
            return Some((self.data.fixed_cost_of(open), Vec::new()));
        }

        let mut clients = self.data.clients().to_vec();
        clients.sort_by(|a, b| b.demand.total_cmp(&a.demand));

        let mut cost = self.data.fixed_cost_of(open);
        let mut assignments = Vec::new();
        for client in clients {
            let mut ranked: Vec<(LocationId, f64)> = open
                .iter()
                .filter_map(|id| self.data.transport_cost(client.id, id).map(|c| (id, c)))
                .collect();
            ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

            let mut left = client.demand;
            for (id, unit_cost) in ranked {
                if left <= 1e-12 {
                    break;
                }
                let cap = remaining.entry(id).or_insert(0.0);
                let served = left.min(*cap);
                if served <= 0.0 {
                    continue;
                }
                *cap -= served;
                left -= served;
                let share = served / client.demand;
                cost += share * unit_cost;
                assignments.push(Assignment {
                    client: client.id,
                    location: id,
                    share,
                });
            }
            if left > 1e-9 {
                return None;
            }
        }
        Some((cost, assignments))
    }
}

impl SubproblemOracle for GreedyOracle {
    fn evaluate(&mut self, open: &OpenSet) -> Evaluation {
        self.calls += 1;
        match self.assign(open) {
            Some((cost, _)) => Evaluation::Cost(cost),
            None => Evaluation::Infeasible,
        }
    }

    fn total_demand(&self) -> f64 {
        self.data.total_demand()
    }

    fn capacity_map(&self) -> BTreeMap<LocationId, f64> {
        self.data.capacity_map()
    }

    fn relaxed_lower_bound(&mut self) -> Option<f64> {
        if !self.data.has_transport_costs() {
            return None;
        }
        let bound = self
            .data
            .clients()
            .iter()
            .map(|c| {
                self.data
                    .location_ids()
                    .into_iter()
                    .filter_map(|id| self.data.transport_cost(c.id, id))
                    .fold(f64::INFINITY, f64::min)
            })
            .sum();
        Some(bound)
    }

    fn refine(&mut self, open: &OpenSet) -> Refinement {
        match self.assign(open) {
            Some((cost, assignments)) => Refinement {
                evaluation: Evaluation::Cost(cost),
                assignments,
            },
            None => Evaluation::Infeasible.into(),
        }
    }
}

/// A random instance with total capacity about three times the demand.
pub fn random_instance<R: Rng>(n_locations: usize, n_clients: usize, rng: &mut R) -> InstanceData {
    let demands: Vec<f64> = (0..n_clients)
        .map(|_| rng.random_range(5.0..35.0_f64).round())
        .collect();
    let total: f64 = demands.iter().sum();
    let mean_cap = 3.0 * total / n_locations as f64;
    let capacities: Vec<f64> = (0..n_locations)
        .map(|_| (mean_cap * rng.random_range(0.7..1.3)).round().max(1.0))
        .collect();
    let fixed: Vec<f64> = (0..n_locations)
        .map(|_| rng.random_range(500.0..1500.0_f64).round())
        .collect();
    let transport: Vec<f64> = (0..n_locations * n_clients)
        .map(|_| rng.random_range(10.0..200.0_f64).round())
        .collect();
    InstanceData::from_parts(&capacities, &fixed, &demands, transport)
        .expect("generated instance is valid")
}

/// Every feasible open-set costs the same.
pub struct ConstantOracle {
    pub n_locations: usize,
    pub capacity: f64,
    pub demand: f64,
    pub cost: f64,
}

impl SubproblemOracle for ConstantOracle {
    fn evaluate(&mut self, open: &OpenSet) -> Evaluation {
        if open.len() as f64 * self.capacity < self.demand {
            Evaluation::Infeasible
        } else {
            Evaluation::Cost(self.cost)
        }
    }

    fn total_demand(&self) -> f64 {
        self.demand
    }

    fn capacity_map(&self) -> BTreeMap<LocationId, f64> {
        (1..=self.n_locations).map(|id| (id, self.capacity)).collect()
    }
}

/// Infeasible unless `required` is open; feasible open-sets cost the sum of
/// their identifiers. The first call (the starting open-set) is priced at
/// `start_cost` whatever it contains.
pub struct RequiresLocation {
    pub n_locations: usize,
    pub required: LocationId,
    pub start_cost: f64,
    calls: usize,
}

impl RequiresLocation {
    pub fn new(n_locations: usize, required: LocationId, start_cost: f64) -> Self {
        Self {
            n_locations,
            required,
            start_cost,
            calls: 0,
        }
    }
}

impl SubproblemOracle for RequiresLocation {
    fn evaluate(&mut self, open: &OpenSet) -> Evaluation {
        self.calls += 1;
        if self.calls == 1 {
            Evaluation::Cost(self.start_cost)
        } else if open.contains(self.required) {
            Evaluation::Cost(open.iter().sum::<usize>() as f64)
        } else {
            Evaluation::Infeasible
        }
    }

    fn total_demand(&self) -> f64 {
        15.0
    }

    fn capacity_map(&self) -> BTreeMap<LocationId, f64> {
        (1..=self.n_locations).map(|id| (id, 10.0)).collect()
    }
}

/// Wraps an oracle and fails the solver on every `period`-th call.
pub struct Flaky<O> {
    pub inner: O,
    pub period: usize,
    calls: usize,
}

impl<O> Flaky<O> {
    pub fn new(inner: O, period: usize) -> Self {
        Self {
            inner,
            period,
            calls: 0,
        }
    }
}

impl<O: SubproblemOracle> SubproblemOracle for Flaky<O> {
    fn evaluate(&mut self, open: &OpenSet) -> Evaluation {
        self.calls += 1;
        if self.calls % self.period == 0 {
            return Evaluation::SolverError("simulated solver crash".into());
        }
        self.inner.evaluate(open)
    }

    fn total_demand(&self) -> f64 {
        self.inner.total_demand()
    }

    fn capacity_map(&self) -> BTreeMap<LocationId, f64> {
        self.inner.capacity_map()
    }
}
