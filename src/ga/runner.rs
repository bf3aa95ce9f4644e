//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the evolutionary process:
//! initialization → evaluation → selection → crossover → mutation →
//! evaluation → elitism → repeat.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

use super::config::GaConfig;
use super::operators::{flip_mutation, single_point_crossover};
use super::selection::{select_parent, selection_weights};
use crate::convergence::{argmax, argmin, ConvergenceCurve};
use crate::error::{OptError, Result};
use crate::objective::{evaluate, Callback, CostFunction, Progress};
use crate::random::{random_bits, rng_from_seed};

/// Snapshot of a GA run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaResult {
    /// The best individual found during the entire run.
    pub best: Vec<u8>,

    /// Cost of `best`.
    pub best_cost: f64,

    /// Generations executed.
    pub iterations: usize,

    /// Total cost evaluations, including the initial population.
    pub evaluations: usize,

    /// Best cost at the end of each generation.
    pub convergence: Vec<f64>,
}

/// Binary Genetic Algorithm.
///
/// The initial population is drawn and evaluated on construction.
///
/// ```
/// use u_pixelopt::ga::{GaConfig, GaRunner};
///
/// let cost = |s: &[u8]| s.iter().filter(|&&b| b == 0).count() as f64;
/// let config = GaConfig::new(10)
///     .with_population_size(16)
///     .with_max_iterations(30)
///     .with_seed(42);
/// let mut ga = GaRunner::new(cost, config).unwrap();
/// ga.run().unwrap();
/// assert!(ga.best_cost() <= 3.0);
/// ```
pub struct GaRunner<'a, C> {
    cost_fn: C,
    config: GaConfig,
    rng: StdRng,
    population: Vec<Vec<u8>>,
    costs: Vec<f64>,
    best: Vec<u8>,
    best_cost: f64,
    iterations: usize,
    evaluations: usize,
    curve: ConvergenceCurve,
    callback: Option<Callback<'a, Progress>>,
}

impl<'a, C: CostFunction<u8>> GaRunner<'a, C> {
    /// Validates `config`, then draws and evaluates the initial population.
    pub fn new(mut cost_fn: C, config: GaConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = rng_from_seed(config.seed);

        // 1. Initialize population
        let population: Vec<Vec<u8>> = (0..config.population_size)
            .map(|_| random_bits(config.solution_length, &mut rng))
            .collect();

        // 2. Evaluate initial population, one individual at a time
        let mut costs = Vec::with_capacity(population.len());
        for ind in &population {
            costs.push(evaluate(&mut cost_fn, ind)?);
        }

        // 3. Track best
        let best_idx = argmin(&costs);
        let best = population[best_idx].clone();
        let best_cost = costs[best_idx];
        debug!(
            "ga: initial best cost {best_cost:.6e} (population {})",
            population.len()
        );

        Ok(Self {
            cost_fn,
            evaluations: population.len(),
            curve: ConvergenceCurve::with_capacity(config.max_iterations),
            config,
            rng,
            population,
            costs,
            best,
            best_cost,
            iterations: 0,
            callback: None,
        })
    }

    /// Installs a callback invoked at the end of every generation.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Progress) + 'a,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Runs the remaining generations of the budget.
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
            "ga: finished {} generations, {} evaluations, best cost {:.6e}",
            self.iterations, self.evaluations, self.best_cost
        );
        Ok(())
    }

    /// Runs one generation.
    ///
    /// If an evaluation fails, the previous population is kept unchanged.
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

        let size = self.config.population_size;
        let weights = selection_weights(&self.costs);

        // Generate offspring, two per parent pair
        let mut next_gen: Vec<Vec<u8>> = Vec::with_capacity(size);
        while next_gen.len() < size {
            let p1 = select_parent(&weights, &mut self.rng);
            let p2 = select_parent(&weights, &mut self.rng);

            let (c1, c2) = if self.rng.random_bool(self.config.crossover_rate) {
                single_point_crossover(&self.population[p1], &self.population[p2], &mut self.rng)
            } else {
                (self.population[p1].clone(), self.population[p2].clone())
            };

            for mut child in [c1, c2] {
                if next_gen.len() >= size {
                    break;
                }
                if self.rng.random_bool(self.config.mutation_rate) {
                    flip_mutation(&mut child, &mut self.rng);
                }
                next_gen.push(child);
            }
        }

        // Evaluate every offspring
        let mut next_costs = Vec::with_capacity(size);
        for ind in &next_gen {
            next_costs.push(evaluate(&mut self.cost_fn, ind)?);
            self.evaluations += 1;
        }

        // Update best (strict improvement only)
        let gen_best = argmin(&next_costs);
        if next_costs[gen_best] < self.best_cost {
            self.best = next_gen[gen_best].clone();
            self.best_cost = next_costs[gen_best];
        }

        // Elitism: the worst offspring is replaced by the best-ever individual
        let worst = argmax(&next_costs);
        next_gen[worst] = self.best.clone();
        next_costs[worst] = self.best_cost;

        self.population = next_gen;
        self.costs = next_costs;
        self.iterations += 1;
        self.curve.record(self.best_cost);

        debug!(
            "ga: generation {}/{max} best cost {:.6e}",
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

    /// Best individual found so far.
    pub fn best_solution(&self) -> &[u8] {
        &self.best
    }

    /// Cost of [`best_solution`](Self::best_solution).
    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    /// The current population, `population_size` rows of `solution_length` bits.
    pub fn population(&self) -> &[Vec<u8>] {
        &self.population
    }

    /// Costs of the current population, parallel to [`population`](Self::population).
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Generations completed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Cost evaluations so far, including the initial population.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Best cost at the end of each generation.
    pub fn convergence(&self) -> &ConvergenceCurve {
        &self.curve
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Returns the cost function, e.g. to inspect state it accumulated.
    pub fn into_cost_function(self) -> C {
        self.cost_fn
    }

    /// Copies the current state into a [`GaResult`].
    pub fn result(&self) -> GaResult {
        GaResult {
            best: self.best.clone(),
            best_cost: self.best_cost,
            iterations: self.iterations,
            evaluations: self.evaluations,
            convergence: self.curve.values().to_vec(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::objective::fallible;
    use std::cell::RefCell;
    use std::rc::Rc;

    // ---- OneMax: minimize the number of zero bits ----

    fn count_zeros(s: &[u8]) -> f64 {
        s.iter().filter(|&&b| b == 0).count() as f64
    }

    #[test]
    fn test_onemax_convergence() {
        let config = GaConfig::new(20)
            .with_population_size(40)
            .with_max_iterations(150)
            .with_mutation_rate(0.3)
            .with_seed(42);

        let mut ga = GaRunner::new(count_zeros, config).unwrap();
        ga.run().unwrap();

        assert!(
            ga.best_cost() <= 5.0,
            "expected cost <= 5 for 20-bit OneMax, got {}",
            ga.best_cost()
        );
    }

    #[test]
    fn test_shapes_constant_each_generation() {
        let config = GaConfig::new(5)
            .with_population_size(8)
            .with_max_iterations(3)
            .with_seed(3);
        let mut ga = GaRunner::new(count_zeros, config).unwrap();

        for _ in 0..3 {
            ga.step().unwrap();
            assert_eq!(ga.population().len(), 8);
            assert!(ga.population().iter().all(|ind| ind.len() == 5));
            assert_eq!(ga.costs().len(), 8);
        }
        assert_eq!(ga.iterations(), 3);
    }

    #[test]
    fn test_odd_population_size() {
        let config = GaConfig::new(4)
            .with_population_size(5)
            .with_max_iterations(4)
            .with_seed(9);
        let mut ga = GaRunner::new(count_zeros, config).unwrap();
        ga.run().unwrap();
        assert_eq!(ga.population().len(), 5);
        assert_eq!(ga.evaluations(), 5 + 4 * 5);
    }

    #[test]
    fn test_elitism_keeps_best_in_population() {
        let config = GaConfig::new(12)
            .with_population_size(10)
            .with_max_iterations(25)
            .with_mutation_rate(0.5)
            .with_seed(17);
        let cost = |s: &[u8]| {
            s.iter()
                .enumerate()
                .map(|(i, &b)| if i % 2 == 0 { b as f64 } else { 1.0 - b as f64 })
                .sum::<f64>()
        };
        let mut ga = GaRunner::new(cost, config).unwrap();

        for _ in 0..25 {
            ga.step().unwrap();
            let best = ga.best_solution().to_vec();
            let slot = ga
                .population()
                .iter()
                .position(|ind| *ind == best)
                .expect("best-ever individual must survive");
            assert_eq!(ga.costs()[slot], ga.best_cost());
        }
    }

    #[test]
    fn test_convergence_monotone() {
        let config = GaConfig::new(16)
            .with_population_size(12)
            .with_max_iterations(40)
            .with_mutation_rate(0.2)
            .with_seed(5);
        let mut ga = GaRunner::new(count_zeros, config).unwrap();
        ga.run().unwrap();

        assert_eq!(ga.convergence().len(), 40);
        assert!(ga.convergence().is_non_increasing());
    }

    #[test]
    fn test_constant_cost_keeps_initial_best() {
        let config = GaConfig::new(6)
            .with_population_size(6)
            .with_max_iterations(10)
            .with_mutation_rate(1.0)
            .with_seed(8);
        let mut ga = GaRunner::new(|_: &[u8]| 2.5, config).unwrap();
        let initial_best = ga.best_solution().to_vec();
        ga.run().unwrap();

        assert_eq!(ga.best_cost(), 2.5);
        assert_eq!(ga.best_solution(), initial_best.as_slice());
    }

    #[test]
    fn test_callback_once_per_generation() {
        let seen: Rc<RefCell<Vec<Progress>>> = Rc::default();
        let log = Rc::clone(&seen);
        let config = GaConfig::new(6)
            .with_population_size(4)
            .with_max_iterations(5)
            .with_seed(1);
        let mut ga = GaRunner::new(count_zeros, config)
            .unwrap()
            .with_callback(move |p: &Progress| log.borrow_mut().push(*p));
        ga.run().unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[0].iteration, 1);
        assert_eq!(seen[4].evaluations, 4 + 5 * 4);
        assert_eq!(seen[4].best_cost, ga.best_cost());
    }

    #[test]
    fn test_failed_generation_keeps_population() {
        let mut calls = 0;
        let cost = fallible(move |s: &[u8]| -> std::result::Result<f64, BoxError> {
            calls += 1;
            if calls > 6 {
                Err("mode solver diverged".into())
            } else {
                Ok(count_zeros(s))
            }
        });
        let config = GaConfig::new(4)
            .with_population_size(4)
            .with_max_iterations(2)
            .with_seed(2);
        let mut ga = GaRunner::new(cost, config).unwrap();
        let before = ga.population().to_vec();

        assert!(matches!(ga.run(), Err(OptError::Evaluation(_))));
        assert_eq!(ga.iterations(), 0);
        assert_eq!(ga.population(), before.as_slice());
    }

    #[test]
    fn test_oversized_budget_is_config_error() {
        let mut calls = 0;
        let cost = |_: &[u8]| {
            calls += 1;
            0.0
        };
        let err = GaRunner::new(cost, GaConfig::new(4).with_max_iterations(usize::MAX))
            .err()
            .unwrap();
        assert!(err.is_config_error());
        assert_eq!(calls, 0);
    }
}
