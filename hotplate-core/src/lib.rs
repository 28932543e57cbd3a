//! Two-dimensional heat diffusion on a rectangular plate.
//!
//! A [`Grid`] is derived from a [`PlateConfig`] and a spacing. The
//! [`SteadyStateSolver`] relaxes a field under fixed edge temperatures, the
//! field can then be perturbed with a [`BoundaryConditionUpdater`] or a
//! [`HotSpot`], and the [`DiffusionIntegrator`] evolves it in time while a
//! [`FrameRecorder`] keeps copies at requested steps.
//!
//! Fields are `nx × ny` arrays indexed `[[i, j]]`, `i` along the width and `j`
//! along the height.

pub mod boundary;
pub mod error;
pub mod frames;
pub mod grid;
pub mod hotspot;
pub mod integrator;
pub mod scenario;
pub mod steady;

pub use boundary::{BOUNDARY_BAND_DEPTH, BoundaryConditionUpdater, BoundaryConditions};
pub use error::{HeatError, HeatResult};
pub use frames::{Frame, FrameRecorder, FrameStack};
pub use grid::{Grid, PlateConfig};
pub use hotspot::HotSpot;
pub use integrator::{DiffusionIntegrator, IntegrationConfig, IntegratorState};
pub use scenario::{BoundaryUpdate, Scenario, ScenarioOutcome};
pub use steady::{RelaxationScheme, SteadyState, SteadyStateConfig, SteadyStateSolver};

use ndarray::Array2;

// ---- Function-call API ----

/// Relaxes toward the steady state with exactly `maxiter` Gauss-Seidel sweeps.
pub fn solve(
    grid: &Grid,
    boundary: BoundaryConditions,
    relaxation_guess: f64,
    maxiter: usize,
) -> HeatResult<Array2<f64>> {
    SteadyStateSolver::new(boundary, relaxation_guess, maxiter)
        .solve(grid)
        .map(|state| state.field)
}

pub fn update_boundary(
    grid: &Grid,
    field: &mut Array2<f64>,
    boundary: BoundaryConditions,
) -> HeatResult<()> {
    BoundaryConditionUpdater::new(boundary).apply(grid, field)
}

pub fn inject_hotspot(grid: &Grid, field: &mut Array2<f64>, spot: &HotSpot) -> HeatResult<()> {
    spot.inject(grid, field).map(|_| ())
}

/// Integrates `tsteps` steps serially. Returns the final field and the frames
/// recorded at `snapshot_steps`.
pub fn integrate<I>(
    grid: &Grid,
    field: Array2<f64>,
    tsteps: usize,
    snapshot_steps: I,
) -> HeatResult<(Array2<f64>, FrameStack)>
where
    I: IntoIterator<Item = usize>,
{
    let mut integrator = DiffusionIntegrator::new(*grid, field)?;
    let frames = integrator.integrate(tsteps, snapshot_steps)?;
    Ok((integrator.into_field(), frames))
}
