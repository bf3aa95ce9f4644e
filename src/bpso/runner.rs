//! Binary PSO execution loop.

use log::{debug, info};
use rand::rngs::StdRng;

use super::config::BpsoConfig;
use crate::convergence::{argmin, ConvergenceCurve};
use crate::error::{OptError, Result};
use crate::objective::{evaluate, Callback, CostFunction, Progress};
use crate::random::{random_bits, rng_from_seed};

/// Snapshot of a binary PSO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpsoResult {
    /// Best particle position found.
    pub best: Vec<u8>,
    /// Cost of `best`.
    pub best_cost: f64,
    /// Iterations executed.
    pub iterations: usize,
    /// Total cost evaluations, including the initial swarm.
    pub evaluations: usize,
    /// Best cost at the end of each iteration.
    pub convergence: Vec<f64>,
}

/// Binary Particle Swarm Optimizer.
///
/// Velocities start at zero, so with the V-shaped transfer the first move of
/// every particle is driven only by the attraction terms.
///
/// ```
/// use u_pixelopt::bpso::{BpsoConfig, BpsoRunner};
///
/// let target = [1u8, 0, 1, 1, 0, 0, 1, 0];
/// let cost = |s: &[u8]| s.iter().zip(&target).filter(|(a, b)| a != b).count() as f64;
/// let config = BpsoConfig::new(8).with_max_iterations(40).with_seed(5);
/// let mut bpso = BpsoRunner::new(cost, config).unwrap();
/// bpso.run().unwrap();
/// assert!(bpso.best_cost() <= 2.0);
/// ```
pub struct BpsoRunner<'a, C> {
    cost_fn: C,
    config: BpsoConfig,
    rng: StdRng,
    positions: Vec<Vec<u8>>,
    velocities: Vec<Vec<f64>>,
    costs: Vec<f64>,
    personal_best: Vec<Vec<u8>>,
    personal_best_costs: Vec<f64>,
    best: Vec<u8>,
    best_cost: f64,
    iterations: usize,
    evaluations: usize,
    curve: ConvergenceCurve,
    callback: Option<Callback<'a, Progress>>,
}

impl<'a, C: CostFunction<u8>> BpsoRunner<'a, C> {
    /// Validates the configuration and evaluates a random initial swarm.
    pub fn new(mut cost_fn: C, config: BpsoConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = rng_from_seed(config.seed);
        let len = config.solution_length;
        let n = config.population_size;

        let positions: Vec<Vec<u8>> = (0..n).map(|_| random_bits(len, &mut rng)).collect();
        let mut costs = Vec::with_capacity(n);
        for x in &positions {
            costs.push(evaluate(&mut cost_fn, x)?);
        }

        let best_idx = argmin(&costs);
        let best = positions[best_idx].clone();
        let best_cost = costs[best_idx];
        debug!("bpso: initial best cost {best_cost:.6e} ({n} particles, {len} bits)");

        Ok(Self {
            cost_fn,
            evaluations: n,
            curve: ConvergenceCurve::with_capacity(config.max_iterations),
            config,
            rng,
            velocities: vec![vec![0.0; len]; n],
            personal_best: positions.clone(),
            personal_best_costs: costs.clone(),
            positions,
            costs,
            best,
            best_cost,
            iterations: 0,
            callback: None,
        })
    }

    /// Installs a callback invoked at the end of every iteration.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Progress) + 'a,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Runs the remaining iterations of the budget.
    pub fn run(&mut self) -> Result<()> {
        let max = self.config.max_iterations;
        if max > 0 && self.iterations >= max {
            return Err(OptError::BudgetExhausted {
                max_iterations: max,
            });
        }

        while self.iterations < max {
            self.step()?;
        }

        info!(
            "bpso: finished {} iterations, {} evaluations, best cost {:.6e}",
            self.iterations, self.evaluations, self.best_cost
        );
        Ok(())
    }

    /// Moves every particle once.
    ///
    /// Returns [`OptError::BudgetExhausted`] once the budget is spent. That
    /// includes a zero budget, for which [`run`](Self::run) is a no-op.
    pub fn step(&mut self) -> Result<()> {
        let max = self.config.max_iterations;
        if self.iterations >= max {
            return Err(OptError::BudgetExhausted {
                max_iterations: max,
            });
        }

        let swarm = self.config.swarm;
        let transfer = self.config.transfer;
        let len = self.config.solution_length;

        for i in 0..self.positions.len() {
            let r = swarm.ratios(&mut self.rng);
            let mut velocity = Vec::with_capacity(len);
            let mut position = Vec::with_capacity(len);

            for d in 0..len {
                let bit = self.positions[i][d];
                let v = swarm.velocity(
                    self.velocities[i][d],
                    f64::from(bit),
                    f64::from(self.personal_best[i][d]),
                    f64::from(self.best[d]),
                    r,
                );
                position.push(transfer.apply(bit, v, &mut self.rng));
                velocity.push(v);
            }

            let cost = evaluate(&mut self.cost_fn, &position)?;
            self.evaluations += 1;

            if cost <= self.personal_best_costs[i] {
                self.personal_best[i].clone_from(&position);
                self.personal_best_costs[i] = cost;
            }
            if cost <= self.best_cost {
                self.best.clone_from(&position);
                self.best_cost = cost;
            }
            self.positions[i] = position;
            self.velocities[i] = velocity;
            self.costs[i] = cost;
        }

        self.iterations += 1;
        self.curve.record(self.best_cost);
        debug!(
            "bpso: iteration {}/{max} best cost {:.6e}",
            self.iterations, self.best_cost
        );

        if let Some(cb) = self.callback.as_mut() {
            cb(&Progress {
                iteration: self.iterations,
                evaluations: self.evaluations,
                best_cost: self.best_cost,
            });
        }
        Ok(())
    }

    pub fn best_solution(&self) -> &[u8] {
        &self.best
    }

    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    /// Current particle positions.
    pub fn positions(&self) -> &[Vec<u8>] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec<f64>] {
        &self.velocities
    }

    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    pub fn personal_best_costs(&self) -> &[f64] {
        &self.personal_best_costs
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn convergence(&self) -> &ConvergenceCurve {
        &self.curve
    }

    pub fn config(&self) -> &BpsoConfig {
        &self.config
    }

    pub fn into_cost_function(self) -> C {
        self.cost_fn
    }

    pub fn result(&self) -> BpsoResult {
        BpsoResult {
            best: self.best.clone(),
            best_cost: self.best_cost,
            iterations: self.iterations,
            evaluations: self.evaluations,
            convergence: self.curve.values().to_vec(),
        }
    }
}
