//! Explicit time stepping (forward time, central space).
//!
//! Each step computes a fresh interior from the untouched previous buffer and
//! then swaps the two buffers. Edge cells are never written, so they keep
//! whatever values they held when the integrator was built.

use crate::error::{HeatError, HeatResult};
use crate::frames::{FrameRecorder, FrameStack};
use crate::grid::Grid;
use ndarray::{Array2, Axis, s};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Integration input block as it appears in a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub tsteps: usize,
    pub snapshot_steps: Vec<usize>,
    /// Compute interior rows on the rayon pool.
    pub parallel: bool,
    /// Fail with [`HeatError::Diverged`] if a step yields a non-finite value.
    pub check_finite: bool,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            tsteps: 101,
            snapshot_steps: vec![0, 10, 50, 100],
            parallel: false,
            check_finite: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegratorState {
    Ready,
    Stepping,
    Done,
}

pub struct DiffusionIntegrator {
    grid: Grid,
    u0: Array2<f64>,
    u: Array2<f64>,
    state: IntegratorState,
    steps_done: usize,
    parallel: bool,
    check_finite: bool,
}

impl DiffusionIntegrator {
    pub fn new(grid: Grid, field: Array2<f64>) -> HeatResult<DiffusionIntegrator> {
        grid.check_shape(&field)?;
        let u = field.clone();
        Ok(DiffusionIntegrator {
            grid,
            u0: field,
            u,
            state: IntegratorState::Ready,
            steps_done: 0,
            parallel: false,
            check_finite: false,
        })
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_finite_check(mut self, check_finite: bool) -> Self {
        self.check_finite = check_finite;
        self
    }

    // ---- Accessors ----

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn field(&self) -> &Array2<f64> {
        &self.u0
    }

    pub fn state(&self) -> IntegratorState {
        self.state
    }

    pub fn steps_done(&self) -> usize {
        self.steps_done
    }

    pub fn into_field(self) -> Array2<f64> {
        self.u0
    }

    // ---- Core: run tsteps steps, recording requested frames ----

    pub fn integrate<I>(&mut self, tsteps: usize, snapshot_steps: I) -> HeatResult<FrameStack>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut recorder = FrameRecorder::new(self.grid.shape(), snapshot_steps);
        self.run(tsteps, &mut recorder)?;
        Ok(recorder.finish())
    }

    /// Runs `tsteps` steps, reporting each completed step to `recorder`.
    pub fn run(&mut self, tsteps: usize, recorder: &mut FrameRecorder) -> HeatResult<()> {
        if self.state != IntegratorState::Ready {
            return Err(HeatError::Precondition(
                "integrator has already been run".into(),
            ));
        }
        if tsteps == 0 {
            return Err(HeatError::Precondition("tsteps must be > 0".into()));
        }

        log::debug!(
            "integrating {tsteps} steps of dt={:e} on {}x{} ({} frames requested)",
            self.grid.dt(),
            self.grid.nx(),
            self.grid.ny(),
            recorder.expected_frames(tsteps)
        );

        self.state = IntegratorState::Stepping;
        let dt = self.grid.dt();
        for n in 0..tsteps {
            self.do_timestep();
            self.steps_done += 1;

            if self.check_finite
                && let Some((i, j)) = first_non_finite(&self.u0)
            {
                log::warn!("field diverged at step {n}, point ({i}, {j})");
                self.state = IntegratorState::Done;
                return Err(HeatError::Diverged { step: n, i, j });
            }

            recorder.observe(n, (n + 1) as f64 * dt, &self.u0);
        }
        self.state = IntegratorState::Done;

        log::debug!("integration done, {} frames recorded", recorder.len());
        Ok(())
    }

    fn do_timestep(&mut self) {
        let stencil = Stencil::new(&self.grid);
        let (nx, ny) = self.u0.dim();
        let u0 = &self.u0;

        if self.parallel {
            self.u
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .enumerate()
                .filter(|(i, _)| *i > 0 && *i < nx - 1)
                .for_each(|(i, mut row)| {
                    for j in 1..ny - 1 {
                        row[j] = stencil.apply(u0, i, j);
                    }
                });
        } else {
            for i in 1..nx - 1 {
                for j in 1..ny - 1 {
                    self.u[[i, j]] = stencil.apply(u0, i, j);
                }
            }
        }

        std::mem::swap(&mut self.u0, &mut self.u);
    }
}

#[derive(Clone, Copy)]
struct Stencil {
    d_dt: f64,
    dx2: f64,
    dy2: f64,
}

impl Stencil {
    fn new(grid: &Grid) -> Self {
        Self {
            d_dt: grid.diffusivity() * grid.dt(),
            dx2: grid.dx2(),
            dy2: grid.dy2(),
        }
    }

    #[inline(always)]
    fn apply(&self, u0: &Array2<f64>, i: usize, j: usize) -> f64 {
        let c = u0[[i, j]];
        c + self.d_dt
            * ((u0[[i + 1, j]] - 2.0 * c + u0[[i - 1, j]]) / self.dx2
                + (u0[[i, j + 1]] - 2.0 * c + u0[[i, j - 1]]) / self.dy2)
    }
}

/// First non-finite interior value. Edges are frozen, so a bad edge value only
/// matters once the stencil carries it inward.
fn first_non_finite(field: &Array2<f64>) -> Option<(usize, usize)> {
    let (nx, ny) = field.dim();
    field
        .slice(s![1..nx - 1, 1..ny - 1])
        .indexed_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|((i, j), _)| (i + 1, j + 1))
}
