//! DBS execution engine.
//!
//! # Algorithm
//!
//! 1. Evaluate the starting solution (given or random)
//! 2. For each sweep:
//!    a. Reset the undisturbed set to every position, in random order
//!    b. Pop one position, flip that bit in a copy, evaluate the copy
//!    c. Keep the copy if its cost is less than or equal to the current cost
//!    d. Repeat until every position has been tried once
//! 3. Stop after `max_iterations` sweeps
//!
//! Accepting equal costs lets the search drift across plateaus, which is
//! common when a field solver reports the same figure of merit for many
//! pixel maps.

use log::{debug, info, trace};
use rand::rngs::StdRng;

use super::config::DbsConfig;
use crate::binary;
use crate::convergence::ConvergenceCurve;
use crate::error::{OptError, Result};
use crate::objective::{evaluate, Callback, CostFunction};
use crate::random::{random_bits, rng_from_seed, shuffle};

/// Per-evaluation snapshot passed to the DBS callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbsProgress {
    /// Zero-based index of the sweep in progress.
    pub iteration: usize,
    /// Position that was flipped for this evaluation.
    pub position: usize,
    /// Positions still undisturbed in this sweep after this evaluation.
    pub remaining: usize,
    /// Cost of the trial solution.
    pub cost: f64,
    /// Whether the trial replaced the current solution.
    pub accepted: bool,
    /// Best cost after this evaluation.
    pub best_cost: f64,
    /// Evaluations performed so far, including the initial one.
    pub evaluations: usize,
}

/// Snapshot of a DBS run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DbsResult {
    /// Best solution found.
    pub best: Vec<u8>,
    /// Cost of the best solution.
    pub best_cost: f64,
    /// Completed sweeps.
    pub iterations: usize,
    /// Total cost evaluations, including the initial one.
    pub evaluations: usize,
    /// Number of accepted bit flips.
    pub accepted_moves: usize,
    /// Best cost after every evaluation of `run()`.
    pub convergence: Vec<f64>,
}

/// Direct Binary Search over a 0/1 pixel vector.
///
/// The runner evaluates its starting point on construction; [`run`](Self::run)
/// then spends the configured sweep budget.
///
/// ```
/// use u_pixelopt::dbs::{DbsConfig, DbsRunner};
///
/// // Minimize the number of zero pixels.
/// let cost = |s: &[u8]| s.iter().filter(|&&b| b == 0).count() as f64;
/// let config = DbsConfig::new(8).with_max_iterations(1).with_seed(3);
/// let mut dbs = DbsRunner::new(cost, config).unwrap();
/// dbs.run().unwrap();
/// assert_eq!(dbs.best_cost(), 0.0);
/// assert_eq!(dbs.best_solution(), &[1u8; 8]);
/// ```
pub struct DbsRunner<'a, C> {
    cost_fn: C,
    config: DbsConfig,
    rng: StdRng,
    // The current point is always the best point: a flip is kept only when
    // it does not make the cost worse.
    best: Vec<u8>,
    best_cost: f64,
    undisturbed: Vec<usize>,
    in_sweep: bool,
    iterations: usize,
    evaluations: usize,
    accepted_moves: usize,
    curve: ConvergenceCurve,
    callback: Option<Callback<'a, DbsProgress>>,
}

impl<'a, C: CostFunction<u8>> DbsRunner<'a, C> {
    /// Validates `config` and evaluates the starting solution.
    pub fn new(mut cost_fn: C, config: DbsConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = rng_from_seed(config.seed);
        let length = config.solution_length;
        let start = match &config.initial_solution {
            Some(initial) => initial.clone(),
            None => random_bits(length, &mut rng),
        };
        let start_cost = evaluate(&mut cost_fn, &start)?;
        debug!("dbs: initial cost {start_cost:.6e} over {length} pixels");

        Ok(Self {
            cost_fn,
            curve: ConvergenceCurve::with_capacity(config.max_iterations * length),
            config,
            rng,
            best: start,
            best_cost: start_cost,
            undisturbed: (0..length).collect(),
            in_sweep: false,
            iterations: 0,
            evaluations: 1,
            accepted_moves: 0,
            callback: None,
        })
    }

    /// Installs a callback invoked after every single-flip evaluation.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&DbsProgress) + 'a,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Performs the remaining sweeps of the budget.
    ///
    /// If the cost function fails, the error is returned immediately and the
    /// runner keeps the state reached so far; calling `run()` again resumes
    /// with the positions left in the interrupted sweep.
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
            "dbs: finished {} sweeps, {} evaluations, {} accepted flips, best cost {:.6e}",
            self.iterations, self.evaluations, self.accepted_moves, self.best_cost
        );
        Ok(())
    }

    /// Performs one sweep (or finishes an interrupted one).
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

        if !self.in_sweep {
            self.undisturbed.clear();
            self.undisturbed.extend(0..self.config.solution_length);
            shuffle(&mut self.undisturbed, &mut self.rng);
            self.in_sweep = true;
        }

        while let Some(&position) = self.undisturbed.last() {
            let mut trial = self.best.clone();
            trial[position] = binary::flip(trial[position]);
            let cost = evaluate(&mut self.cost_fn, &trial)?;
            self.undisturbed.pop();
            self.evaluations += 1;

            let accepted = cost <= self.best_cost;
            if accepted {
                self.best = trial;
                self.best_cost = cost;
                self.accepted_moves += 1;
            }
            trace!("dbs: flip {position} cost {cost:.6e} accepted={accepted}");

            self.curve.record(self.best_cost);

            if let Some(cb) = self.callback.as_mut() {
                cb(&DbsProgress {
                    iteration: self.iterations,
                    position,
                    remaining: self.undisturbed.len(),
                    cost,
                    accepted,
                    best_cost: self.best_cost,
                    evaluations: self.evaluations,
                });
            }
        }

        self.in_sweep = false;
        self.iterations += 1;
        debug!(
            "dbs: sweep {}/{max} best cost {:.6e}",
            self.iterations, self.best_cost
        );
        Ok(())
    }

    /// Best solution found so far.
    pub fn best_solution(&self) -> &[u8] {
        &self.best
    }

    /// Cost of [`best_solution`](Self::best_solution).
    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    /// Positions not yet flipped in the current sweep.
    ///
    /// Holds every position before the first sweep and is empty once a sweep
    /// completes; it is refilled when the next sweep starts.
    pub fn remaining(&self) -> &[usize] {
        &self.undisturbed
    }

    /// Number of positions not yet flipped in the current sweep.
    pub fn remaining_len(&self) -> usize {
        self.undisturbed.len()
    }

    /// Completed sweeps.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Cost evaluations so far, including the initial one.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Best cost after every evaluation, indexed `sweep * L + step`.
    pub fn convergence(&self) -> &ConvergenceCurve {
        &self.curve
    }

    pub fn config(&self) -> &DbsConfig {
        &self.config
    }

    /// Returns the cost function, e.g. to inspect state it accumulated.
    pub fn into_cost_function(self) -> C {
        self.cost_fn
    }

    /// Copies the current state into a [`DbsResult`].
    pub fn result(&self) -> DbsResult {
        DbsResult {
            best: self.best.clone(),
            best_cost: self.best_cost,
            iterations: self.iterations,
            evaluations: self.evaluations,
            accepted_moves: self.accepted_moves,
            convergence: self.curve.values().to_vec(),
        }
    }
}
