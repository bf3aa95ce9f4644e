//! Binary bat execution loop.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

use super::config::BatConfig;
use crate::binary::flip;
use crate::convergence::{argmin, ConvergenceCurve};
use crate::error::{OptError, Result};
use crate::objective::{evaluate, Callback, CostFunction, Progress};
use crate::random::{random_bits, rng_from_seed};
use crate::transfer::v_shaped;

/// Snapshot of a bat run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatResult {
    /// Best bat position found.
    pub best: Vec<u8>,
    /// Cost of `best`.
    pub best_cost: f64,
    /// Iterations executed.
    pub iterations: usize,
    /// Total cost evaluations, including the initial colony.
    pub evaluations: usize,
    /// Best cost at the end of each iteration.
    pub convergence: Vec<f64>,
}

/// Binary Bat Algorithm runner.
///
/// ```
/// use u_pixelopt::bat::{BatConfig, BatRunner};
///
/// let ones = |s: &[u8]| s.iter().filter(|&&b| b == 1).count() as f64;
/// let config = BatConfig::new(10).with_max_iterations(50).with_seed(3);
/// let mut bat = BatRunner::new(ones, config).unwrap();
/// bat.run().unwrap();
/// assert!(bat.convergence().is_non_increasing());
/// ```
pub struct BatRunner<'a, C> {
    cost_fn: C,
    config: BatConfig,
    rng: StdRng,
    positions: Vec<Vec<u8>>,
    velocities: Vec<Vec<f64>>,
    costs: Vec<f64>,
    best: Vec<u8>,
    best_cost: f64,
    iterations: usize,
    evaluations: usize,
    accepted: usize,
    curve: ConvergenceCurve,
    callback: Option<Callback<'a, Progress>>,
}

impl<'a, C: CostFunction<u8>> BatRunner<'a, C> {
    /// Validates the configuration and evaluates a random initial colony.
    pub fn new(mut cost_fn: C, config: BatConfig) -> Result<Self> {
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
        debug!("bat: initial best cost {best_cost:.6e} ({n} bats, {len} bits)");

        Ok(Self {
            cost_fn,
            evaluations: n,
            curve: ConvergenceCurve::with_capacity(config.max_iterations),
            config,
            rng,
            velocities: vec![vec![0.0; len]; n],
            positions,
            costs,
            best,
            best_cost,
            iterations: 0,
            accepted: 0,
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
            "bat: finished {} iterations, {} evaluations ({} accepted), best cost {:.6e}",
            self.iterations, self.evaluations, self.accepted, self.best_cost
        );
        Ok(())
    }

    /// Flies every bat once.
    ///
    /// Velocities are updated in place before the trial is evaluated, so a
    /// failed evaluation leaves the failing bat's velocity advanced.
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

        let BatConfig {
            loudness,
            pulse_rate,
            q_min,
            q_max,
            ..
        } = self.config;

        for i in 0..self.positions.len() {
            let mut trial = self.positions[i].clone();

            for (d, bit) in trial.iter_mut().enumerate() {
                let q = q_min + (q_max - q_min) * self.rng.random_range(0.0..1.0);
                let v = &mut self.velocities[i][d];
                *v += (f64::from(*bit) - f64::from(self.best[d])) * q;

                if self.rng.random_range(0.0..1.0) < v_shaped(*v) {
                    *bit = flip(*bit);
                }
                if self.rng.random_range(0.0..1.0) > pulse_rate {
                    *bit = self.best[d];
                }
            }

            let cost = evaluate(&mut self.cost_fn, &trial)?;
            self.evaluations += 1;

            let loud = self.rng.random_range(0.0..1.0) < loudness;
            if cost <= self.best_cost {
                self.best.clone_from(&trial);
                self.best_cost = cost;
            }
            if loud && cost <= self.costs[i] {
                self.positions[i] = trial;
                self.costs[i] = cost;
                self.accepted += 1;
            }
        }

        self.iterations += 1;
        self.curve.record(self.best_cost);
        debug!(
            "bat: iteration {}/{max} best cost {:.6e}",
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

    /// Current bat positions.
    pub fn positions(&self) -> &[Vec<u8>] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec<f64>] {
        &self.velocities
    }

    /// Costs of the current positions.
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Number of trials that passed the loudness gate and replaced a bat.
    pub fn accepted_moves(&self) -> usize {
        self.accepted
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

    pub fn config(&self) -> &BatConfig {
        &self.config
    }

    pub fn into_cost_function(self) -> C {
        self.cost_fn
    }

    pub fn result(&self) -> BatResult {
        BatResult {
            best: self.best.clone(),
            best_cost: self.best_cost,
            iterations: self.iterations,
            evaluations: self.evaluations,
            convergence: self.curve.values().to_vec(),
        }
    }
}
