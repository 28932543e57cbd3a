//! Plate geometry and its finite-difference discretization.

use crate::error::{HeatError, HeatResult};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Physical description of the plate: extent and thermal diffusivity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateConfig {
    /// Width along the `i` axis.
    pub w: f64,
    /// Height along the `j` axis.
    pub h: f64,
    /// Thermal diffusivity.
    #[serde(rename = "D")]
    pub diffusivity: f64,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            w: 10.0,
            h: 20.0,
            diffusivity: 4.0,
        }
    }
}

impl PlateConfig {
    pub fn new(w: f64, h: f64, diffusivity: f64) -> Self {
        Self { w, h, diffusivity }
    }
}

/// Uniform grid laid over a plate.
///
/// Spacing is equal on both axes (`dx == dy == ds`). The time step is the
/// explicit-scheme stability limit, computed once here and reused by every
/// integration that runs on this grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    dx: f64,
    dy: f64,
    dx2: f64,
    dy2: f64,
    nx: usize,
    ny: usize,
    dt: f64,
    diffusivity: f64,
}

impl Grid {
    pub fn new(plate: &PlateConfig, ds: f64) -> HeatResult<Grid> {
        let PlateConfig { w, h, diffusivity } = *plate;

        if !(diffusivity.is_finite() && diffusivity > 0.0) {
            return Err(HeatError::Configuration(format!(
                "diffusivity must be > 0, got {diffusivity}"
            )));
        }
        if !(ds.is_finite() && ds > 0.0) {
            return Err(HeatError::Configuration(format!(
                "grid spacing must be > 0, got {ds}"
            )));
        }
        if !(w.is_finite() && w > 0.0 && h.is_finite() && h > 0.0) {
            return Err(HeatError::Configuration(format!(
                "plate extent must be positive, got w={w}, h={h}"
            )));
        }

        let (dx, dy) = (ds, ds);
        let (dx2, dy2) = (dx * dx, dy * dy);
        let dt = dx2 * dy2 / (2.0 * diffusivity * (dx2 + dy2));

        // number of discrete points in each cardinal direction
        let nx = point_count("w", w / dx)?;
        let ny = point_count("h", h / dy)?;
        if nx < 3 || ny < 3 {
            return Err(HeatError::Configuration(format!(
                "grid {nx}x{ny} has no interior points (need at least 3x3)"
            )));
        }
        let fits = nx
            .checked_mul(ny)
            .and_then(|n| n.checked_mul(std::mem::size_of::<f64>()))
            .is_some_and(|bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(HeatError::Configuration(format!(
                "grid {nx}x{ny} is too large to allocate"
            )));
        }

        log::debug!("grid {nx}x{ny}, ds={ds}, dt={dt:e}");

        Ok(Grid {
            dx,
            dy,
            dx2,
            dy2,
            nx,
            ny,
            dt,
            diffusivity,
        })
    }

    // ---- Accessors ----

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn dx2(&self) -> f64 {
        self.dx2
    }

    pub fn dy2(&self) -> f64 {
        self.dy2
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn diffusivity(&self) -> f64 {
        self.diffusivity
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Physical coordinates of grid point `(i, j)`.
    pub fn position(&self, i: usize, j: usize) -> (f64, f64) {
        (i as f64 * self.dx, j as f64 * self.dy)
    }

    // ---- Fields ----

    pub fn zeros(&self) -> Array2<f64> {
        Array2::zeros((self.nx, self.ny))
    }

    pub fn filled(&self, value: f64) -> Array2<f64> {
        Array2::from_elem((self.nx, self.ny), value)
    }

    /// Fails with [`HeatError::ShapeMismatch`] unless `field` is `nx × ny`.
    pub fn check_shape(&self, field: &Array2<f64>) -> HeatResult<()> {
        let found = field.dim();
        if found != self.shape() {
            return Err(HeatError::ShapeMismatch {
                expected: self.shape(),
                found,
            });
        }
        Ok(())
    }
}

fn point_count(axis: &str, extent: f64) -> HeatResult<usize> {
    let count = extent.floor();
    // usize::MAX as f64 rounds up, so a strict bound keeps the cast exact
    if count.is_finite() && count < usize::MAX as f64 {
        Ok(count as usize)
    } else {
        Err(HeatError::Configuration(format!(
            "{axis}/ds = {extent:e} points does not fit a grid"
        )))
    }
}
