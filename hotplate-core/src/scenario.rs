//! A whole run described as data: solve, perturb, integrate.

use crate::boundary::{BoundaryConditionUpdater, BoundaryConditions};
use crate::error::HeatResult;
use crate::frames::FrameStack;
use crate::grid::{Grid, PlateConfig};
use crate::hotspot::HotSpot;
use crate::integrator::{DiffusionIntegrator, IntegrationConfig};
use crate::steady::{SteadyState, SteadyStateConfig};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryUpdate {
    pub boundary_conds: BoundaryConditions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub plate: PlateConfig,
    pub steady: SteadyStateConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_update: Option<BoundaryUpdate>,
    pub hotspots: Vec<HotSpot>,
    pub integration: IntegrationConfig,
}

#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub grid: Grid,
    /// Relaxed field before any perturbation.
    pub steady: SteadyState,
    pub frames: FrameStack,
    pub final_field: Array2<f64>,
}

impl Scenario {
    pub fn grid(&self) -> HeatResult<Grid> {
        self.steady.grid(&self.plate)
    }

    pub fn run(&self) -> HeatResult<ScenarioOutcome> {
        let grid = self.grid()?;
        let steady = self.steady.solver().solve(&grid)?;

        let mut u0 = steady.field.clone();
        if let Some(update) = &self.boundary_update {
            BoundaryConditionUpdater::new(update.boundary_conds).apply(&grid, &mut u0)?;
        }
        for spot in &self.hotspots {
            spot.inject(&grid, &mut u0)?;
        }

        let cfg = &self.integration;
        let mut integrator = DiffusionIntegrator::new(grid, u0)?
            .with_parallel(cfg.parallel)
            .with_finite_check(cfg.check_finite);
        let frames = integrator.integrate(cfg.tsteps, cfg.snapshot_steps.iter().copied())?;

        Ok(ScenarioOutcome {
            grid,
            steady,
            frames,
            final_field: integrator.into_field(),
        })
    }
}
