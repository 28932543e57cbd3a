//! Steady-state relaxation under fixed edge temperatures.
//!
//! The default scheme is an in-place Gauss-Seidel sweep: every interior point
//! is replaced by the mean of its four neighbours, read from the buffer being
//! written, so points already visited in the current sweep feed the ones
//! after them. The Jacobi scheme reads a frozen copy of the previous sweep
//! instead and gives different numbers for the same sweep count.

use crate::boundary::BoundaryConditions;
use crate::error::{HeatError, HeatResult, require_finite};
use crate::grid::{Grid, PlateConfig};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationScheme {
    #[default]
    GaussSeidel,
    Jacobi,
}

/// Steady-state input block as it appears in a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteadyStateConfig {
    pub boundary_conditions: BoundaryConditions,
    pub relaxation_guess: f64,
    pub ds: f64,
    pub maxiter: usize,
    pub scheme: RelaxationScheme,
    /// Stop once a sweep changes no point by more than this. `None` runs
    /// exactly `maxiter` sweeps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
}

impl Default for SteadyStateConfig {
    fn default() -> Self {
        Self {
            boundary_conditions: BoundaryConditions::default(),
            relaxation_guess: 30.0,
            ds: 0.1,
            maxiter: 500,
            scheme: RelaxationScheme::GaussSeidel,
            tolerance: None,
        }
    }
}

impl SteadyStateConfig {
    pub fn grid(&self, plate: &PlateConfig) -> HeatResult<Grid> {
        Grid::new(plate, self.ds)
    }

    pub fn solver(&self) -> SteadyStateSolver {
        let solver = SteadyStateSolver::new(
            self.boundary_conditions,
            self.relaxation_guess,
            self.maxiter,
        )
        .with_scheme(self.scheme);
        match self.tolerance {
            Some(tolerance) => solver.until_converged(tolerance),
            None => solver,
        }
    }
}

/// Outcome of a relaxation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SteadyState {
    pub field: Array2<f64>,
    /// Sweeps actually performed.
    pub sweeps: usize,
    /// Largest absolute change made by the final sweep.
    pub last_delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyStateSolver {
    boundary: BoundaryConditions,
    relaxation_guess: f64,
    maxiter: usize,
    scheme: RelaxationScheme,
    tolerance: Option<f64>,
}

impl SteadyStateSolver {
    pub fn new(boundary: BoundaryConditions, relaxation_guess: f64, maxiter: usize) -> Self {
        Self {
            boundary,
            relaxation_guess,
            maxiter,
            scheme: RelaxationScheme::GaussSeidel,
            tolerance: None,
        }
    }

    pub fn with_scheme(mut self, scheme: RelaxationScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Allow an early exit once a sweep's largest change is `<= tolerance`.
    /// `maxiter` stays the upper bound.
    pub fn until_converged(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn boundary(&self) -> BoundaryConditions {
        self.boundary
    }

    fn validate(&self) -> HeatResult<()> {
        if self.maxiter == 0 {
            return Err(HeatError::Precondition("maxiter must be > 0".into()));
        }
        require_finite("relaxation guess", self.relaxation_guess)?;
        self.boundary.validate()?;
        if let Some(tol) = self.tolerance {
            if !(tol.is_finite() && tol >= 0.0) {
                return Err(HeatError::Precondition(format!(
                    "tolerance must be a finite value >= 0, got {tol}"
                )));
            }
        }
        Ok(())
    }

    /// Field before any sweep: the guess everywhere, edges one cell thick.
    pub fn initial_field(&self, grid: &Grid) -> Array2<f64> {
        let mut u0 = grid.filled(self.relaxation_guess);
        self.boundary.stamp_edges(&mut u0);
        u0
    }

    pub fn solve(&self, grid: &Grid) -> HeatResult<SteadyState> {
        self.validate()?;

        let mut u0 = self.initial_field(grid);
        let mut scratch = match self.scheme {
            RelaxationScheme::GaussSeidel => None,
            RelaxationScheme::Jacobi => Some(u0.clone()),
        };

        let mut sweeps = 0;
        let mut last_delta = 0.0;
        for iteration in 0..self.maxiter {
            last_delta = match scratch.as_mut() {
                None => gauss_seidel_sweep(&mut u0),
                Some(prev) => jacobi_sweep(&mut u0, prev),
            };
            sweeps = iteration + 1;

            if self.tolerance.is_some_and(|tol| last_delta <= tol) {
                log::debug!("relaxation converged after {sweeps} sweeps (delta {last_delta:e})");
                break;
            }
        }

        log::debug!(
            "{:?} relaxation: {sweeps}/{} sweeps, last delta {last_delta:e}",
            self.scheme,
            self.maxiter
        );

        Ok(SteadyState {
            field: u0,
            sweeps,
            last_delta,
        })
    }
}

/// One in-place sweep in ascending `(i, j)` order. Returns the largest change.
fn gauss_seidel_sweep(u: &mut Array2<f64>) -> f64 {
    let (nx, ny) = u.dim();
    let mut delta: f64 = 0.0;
    for i in 1..nx - 1 {
        for j in 1..ny - 1 {
            let next = 0.25 * (u[[i + 1, j]] + u[[i - 1, j]] + u[[i, j + 1]] + u[[i, j - 1]]);
            delta = delta.max((next - u[[i, j]]).abs());
            u[[i, j]] = next;
        }
    }
    delta
}

fn jacobi_sweep(u: &mut Array2<f64>, prev: &mut Array2<f64>) -> f64 {
    prev.assign(u);
    let (nx, ny) = u.dim();
    let mut delta: f64 = 0.0;
    for i in 1..nx - 1 {
        for j in 1..ny - 1 {
            let next =
                0.25 * (prev[[i + 1, j]] + prev[[i - 1, j]] + prev[[i, j + 1]] + prev[[i, j - 1]]);
            delta = delta.max((next - prev[[i, j]]).abs());
            u[[i, j]] = next;
        }
    }
    delta
}
