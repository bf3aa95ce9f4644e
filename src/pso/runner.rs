//! Continuous PSO execution loop.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

use super::bounds::ParamBounds;
use super::config::PsoConfig;
use crate::convergence::{argmin, ConvergenceCurve};
use crate::error::{OptError, Result};
use crate::objective::{evaluate, Callback, CostFunction, Progress};
use crate::random::{random_unit, rng_from_seed};

/// Snapshot of a PSO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoResult {
    /// Best normalized position.
    pub best: Vec<f64>,
    /// `best` mapped onto the parameter bounds.
    pub best_params: Vec<f64>,
    /// Cost of the best position.
    pub best_cost: f64,
    /// Iterations executed.
    pub iterations: usize,
    /// Total cost evaluations, including the initial swarm.
    pub evaluations: usize,
    /// Best cost at the end of each iteration.
    pub convergence: Vec<f64>,
}

/// Particle Swarm Optimizer over box-bounded continuous parameters.
///
/// Particles move in `[0, 1]^D`; the cost function receives the
/// de-normalized parameters.
///
/// ```
/// use u_pixelopt::pso::{ParamBounds, PsoConfig, PsoRunner};
///
/// let bounds = ParamBounds::new(vec![(-5.0, 5.0); 2]).unwrap();
/// let sphere = |p: &[f64]| p.iter().map(|x| x * x).sum::<f64>();
/// let config = PsoConfig::default().with_max_iterations(100).with_seed(1);
/// let mut pso = PsoRunner::new(sphere, bounds, config).unwrap();
/// pso.run().unwrap();
/// assert!(pso.best_cost() < 0.1);
/// ```
pub struct PsoRunner<'a, C> {
    cost_fn: C,
    bounds: ParamBounds,
    config: PsoConfig,
    rng: StdRng,
    positions: Vec<Vec<f64>>,
    velocities: Vec<Vec<f64>>,
    costs: Vec<f64>,
    personal_best: Vec<Vec<f64>>,
    personal_best_costs: Vec<f64>,
    best: Vec<f64>,
    best_cost: f64,
    iterations: usize,
    evaluations: usize,
    curve: ConvergenceCurve,
    callback: Option<Callback<'a, Progress>>,
}

impl<'a, C: CostFunction<f64>> PsoRunner<'a, C> {
    /// Validates the inputs, then scatters and evaluates the swarm.
    pub fn new(mut cost_fn: C, bounds: ParamBounds, config: PsoConfig) -> Result<Self> {
        config.validate()?;
        if let Some(expected) = config.solution_length {
            if expected != bounds.len() {
                return Err(OptError::DimensionMismatch {
                    bounds: bounds.len(),
                    expected,
                });
            }
        }

        let mut rng = rng_from_seed(config.seed);
        let dim = bounds.len();
        let v_max = config.swarm.v_max;

        let positions: Vec<Vec<f64>> = (0..config.population_size)
            .map(|_| random_unit(dim, &mut rng))
            .collect();
        let velocities: Vec<Vec<f64>> = (0..config.population_size)
            .map(|_| (0..dim).map(|_| rng.random_range(-v_max..=v_max)).collect())
            .collect();

        let mut costs = Vec::with_capacity(positions.len());
        for x in &positions {
            costs.push(evaluate(&mut cost_fn, &bounds.denormalize(x))?);
        }

        let best_idx = argmin(&costs);
        let best = positions[best_idx].clone();
        let best_cost = costs[best_idx];
        debug!("pso: initial best cost {best_cost:.6e} ({dim} dimensions)");

        Ok(Self {
            cost_fn,
            bounds,
            evaluations: positions.len(),
            curve: ConvergenceCurve::with_capacity(config.max_iterations),
            config,
            rng,
            personal_best: positions.clone(),
            personal_best_costs: costs.clone(),
            positions,
            velocities,
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
            "pso: finished {} iterations, {} evaluations, best cost {:.6e}",
            self.iterations, self.evaluations, self.best_cost
        );
        Ok(())
    }

    /// Moves every particle once.
    ///
    /// A particle is committed only after its evaluation succeeds; on error,
    /// particles already moved in this iteration keep their new positions.
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
        for i in 0..self.positions.len() {
            let r = swarm.ratios(&mut self.rng);
            let x = &self.positions[i];
            let pbest = &self.personal_best[i];

            let velocity: Vec<f64> = self.velocities[i]
                .iter()
                .enumerate()
                .map(|(d, &v)| swarm.velocity(v, x[d], pbest[d], self.best[d], r))
                .collect();
            let position: Vec<f64> = x
                .iter()
                .zip(&velocity)
                .map(|(&xd, &vd)| (xd + vd).clamp(0.0, 1.0))
                .collect();

            let cost = evaluate(&mut self.cost_fn, &self.bounds.denormalize(&position))?;
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
            "pso: iteration {}/{max} best cost {:.6e}",
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

    /// Best normalized position found so far.
    pub fn best_solution(&self) -> &[f64] {
        &self.best
    }

    /// [`best_solution`](Self::best_solution) mapped onto the bounds.
    pub fn best_params(&self) -> Vec<f64> {
        self.bounds.denormalize(&self.best)
    }

    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    /// Current normalized particle positions.
    pub fn positions(&self) -> &[Vec<f64>] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec<f64>] {
        &self.velocities
    }

    /// Costs of the current positions.
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Best cost each particle has reached.
    pub fn personal_best_costs(&self) -> &[f64] {
        &self.personal_best_costs
    }

    pub fn bounds(&self) -> &ParamBounds {
        &self.bounds
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

    pub fn config(&self) -> &PsoConfig {
        &self.config
    }

    /// Returns the cost function, e.g. to inspect state it accumulated.
    pub fn into_cost_function(self) -> C {
        self.cost_fn
    }

    /// Copies the current state into a [`PsoResult`].
    pub fn result(&self) -> PsoResult {
        PsoResult {
            best: self.best.clone(),
            best_params: self.best_params(),
            best_cost: self.best_cost,
            iterations: self.iterations,
            evaluations: self.evaluations,
            convergence: self.curve.values().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sphere(p: &[f64]) -> f64 {
        p.iter().map(|x| x * x).sum()
    }

    #[test]
    fn test_sphere_converges() {
        let bounds = ParamBounds::new(vec![(-5.0, 5.0); 3]).unwrap();
        let config = PsoConfig::default()
            .with_population_size(30)
            .with_max_iterations(150)
            .with_seed(42);
        let mut pso = PsoRunner::new(sphere, bounds, config).unwrap();
        pso.run().unwrap();

        assert!(pso.best_cost() < 0.05, "got {}", pso.best_cost());
        assert_eq!(pso.convergence().len(), 150);
        assert!(pso.convergence().is_non_increasing());
    }

    #[test]
    fn test_cost_sees_denormalized_params() {
        let seen: Rc<RefCell<Vec<Vec<f64>>>> = Rc::default();
        let rec = Rc::clone(&seen);
        let cost = move |p: &[f64]| {
            rec.borrow_mut().push(p.to_vec());
            (p[0] - 150.0).abs()
        };
        let bounds = ParamBounds::new(vec![(100.0, 200.0)]).unwrap();
        let config = PsoConfig::default()
            .with_population_size(5)
            .with_max_iterations(10)
            .with_seed(3);
        let mut pso = PsoRunner::new(cost, bounds, config).unwrap();
        pso.run().unwrap();

        assert!(seen
            .borrow()
            .iter()
            .all(|p| (100.0..=200.0).contains(&p[0])));
        assert_eq!(pso.best_params(), pso.bounds().denormalize(pso.best_solution()));
    }

    #[test]
    fn test_positions_stay_in_unit_box() {
        let bounds = ParamBounds::new(vec![(0.0, 1.0); 4]).unwrap();
        // Optimum outside the box pushes particles into the walls.
        let cost = |p: &[f64]| p.iter().map(|x| (x - 3.0).powi(2)).sum::<f64>();
        let config = PsoConfig::default()
            .with_v_max(0.5)
            .with_max_iterations(40)
            .with_seed(7);
        let mut pso = PsoRunner::new(cost, bounds, config).unwrap();
        pso.run().unwrap();

        for x in pso.positions() {
            assert!(x.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
        for v in pso.velocities() {
            assert!(v.iter().all(|&u| u.abs() <= 0.5));
        }
        assert!(pso.best_solution().iter().all(|&v| v > 0.9));
    }

    #[test]
    fn test_dimension_mismatch() {
        let bounds = ParamBounds::new(vec![(0.0, 1.0); 2]).unwrap();
        let config = PsoConfig::default().with_solution_length(3);
        let err = PsoRunner::new(sphere, bounds, config).err().unwrap();
        assert!(matches!(
            err,
            OptError::DimensionMismatch {
                bounds: 2,
                expected: 3
            }
        ));
    }

    #[test]
    fn test_constant_cost_keeps_best_cost() {
        let bounds = ParamBounds::new(vec![(0.0, 1.0); 2]).unwrap();
        let config = PsoConfig::default()
            .with_population_size(6)
            .with_max_iterations(15)
            .with_seed(2);
        let mut pso = PsoRunner::new(|_: &[f64]| -1.0, bounds, config).unwrap();
        pso.run().unwrap();
        assert_eq!(pso.best_cost(), -1.0);
        assert!(pso.convergence().values().iter().all(|&c| c == -1.0));
    }

    #[test]
    fn test_fixed_ratios_are_deterministic_given_seed() {
        let make = || {
            let bounds = ParamBounds::new(vec![(-1.0, 1.0); 2]).unwrap();
            let config = PsoConfig::default()
                .with_fixed_ratios(0.5, 0.5)
                .with_max_iterations(10)
                .with_seed(11);
            let mut pso = PsoRunner::new(sphere, bounds, config).unwrap();
            pso.run().unwrap();
            pso.result()
        };
        let a = make();
        let b = make();
        assert_eq!(a.best, b.best);
        assert_eq!(a.convergence, b.convergence);
    }

    #[test]
    fn test_personal_best_never_worse_than_current() {
        let bounds = ParamBounds::new(vec![(-3.0, 3.0); 2]).unwrap();
        let config = PsoConfig::default().with_max_iterations(5).with_seed(4);
        let mut pso = PsoRunner::new(sphere, bounds, config).unwrap();
        pso.run().unwrap();
        for (pb, c) in pso.personal_best_costs().iter().zip(pso.costs()) {
            assert!(pb <= c);
        }
        let min_pb = pso
            .personal_best_costs()
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        assert_eq!(min_pb, pso.best_cost());
    }

    #[test]
    fn test_position_moves_by_velocity_then_clips() {
        // With w = 1 and no attraction the velocity carries over unchanged,
        // so each coordinate must land on clip(x + v, 0, 1).
        let bounds = ParamBounds::new(vec![(0.0, 1.0); 3]).unwrap();
        let config = PsoConfig::default()
            .with_population_size(10)
            .with_v_max(0.5)
            .with_inertia_weight(1.0)
            .with_coefficients(0.0, 0.0)
            .with_max_iterations(1)
            .with_seed(21);
        let mut pso = PsoRunner::new(sphere, bounds, config).unwrap();
        let x0 = pso.positions().to_vec();
        let v0 = pso.velocities().to_vec();

        pso.step().unwrap();

        for ((x, v), moved) in x0.iter().zip(&v0).zip(pso.positions()) {
            for d in 0..3 {
                assert_eq!(moved[d], (x[d] + v[d]).clamp(0.0, 1.0));
            }
        }
        assert_eq!(pso.velocities(), v0.as_slice());
    }

    #[test]
    fn test_oversized_budget_is_config_error() {
        let mut calls = 0;
        let cost = |_: &[f64]| {
            calls += 1;
            0.0
        };
        let bounds = ParamBounds::new(vec![(0.0, 1.0)]).unwrap();
        let config = PsoConfig::default().with_max_iterations(usize::MAX);
        let err = PsoRunner::new(cost, bounds, config).err().unwrap();
        assert!(err.is_config_error());
        assert_eq!(calls, 0);
    }
}
