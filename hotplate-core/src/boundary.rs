//! Fixed edge temperatures and the operator that rewrites them.
//!
//! Edge geometry: `top` is the last column (`j = ny - 1`), `bottom` the first
//! column (`j = 0`), `left` the first row (`i = 0`) and `right` the last row
//! (`i = nx - 1`).

use crate::error::{HeatError, HeatResult, require_finite};
use crate::grid::Grid;
use ndarray::{Array2, s};
use serde::{Deserialize, Serialize};

/// Depth, in grid points, of the band rewritten by [`BoundaryConditionUpdater`].
pub const BOUNDARY_BAND_DEPTH: usize = 5;

/// Temperatures held fixed along the four plate edges.
///
/// Serialized as the legacy `[top, bottom, left, right]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundaryConditions {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl BoundaryConditions {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub fn uniform(temperature: f64) -> Self {
        Self::new(temperature, temperature, temperature, temperature)
    }

    /// Converts the legacy positional form: `[0]` top, `[1]` bottom,
    /// `[len-2]` left, `[len-1]` right. Anything but four entries is rejected.
    pub fn from_legacy(values: &[f64]) -> HeatResult<Self> {
        match values {
            &[top, bottom, left, right] => Ok(Self::new(top, bottom, left, right)),
            _ => Err(HeatError::Precondition(format!(
                "boundary conditions need exactly 4 values, got {}",
                values.len()
            ))),
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.top, self.bottom, self.left, self.right]
    }

    pub fn min(&self) -> f64 {
        self.to_array().into_iter().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.to_array().into_iter().fold(f64::NEG_INFINITY, f64::max)
    }

    pub(crate) fn validate(&self) -> HeatResult<()> {
        require_finite("top boundary", self.top)?;
        require_finite("bottom boundary", self.bottom)?;
        require_finite("left boundary", self.left)?;
        require_finite("right boundary", self.right)
    }

    /// Writes the single-cell edges used to seed the steady-state solve.
    /// Left and right are written last and own the corners.
    pub(crate) fn stamp_edges(&self, field: &mut Array2<f64>) {
        let (nx, ny) = field.dim();
        field.slice_mut(s![.., ny - 1..]).fill(self.top);
        field.slice_mut(s![.., ..1]).fill(self.bottom);
        field.slice_mut(s![..1, ..]).fill(self.left);
        field.slice_mut(s![nx - 1.., ..]).fill(self.right);
    }
}

impl Default for BoundaryConditions {
    fn default() -> Self {
        Self::new(100.0, 0.0, 0.0, 0.0)
    }
}

impl From<[f64; 4]> for BoundaryConditions {
    fn from(values: [f64; 4]) -> Self {
        let [top, bottom, left, right] = values;
        Self::new(top, bottom, left, right)
    }
}

impl From<BoundaryConditions> for [f64; 4] {
    fn from(bc: BoundaryConditions) -> Self {
        bc.to_array()
    }
}

/// Overwrites a band [`BOUNDARY_BAND_DEPTH`] points deep along each edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryConditionUpdater {
    conditions: BoundaryConditions,
    depth: usize,
}

impl BoundaryConditionUpdater {
    pub fn new(conditions: BoundaryConditions) -> Self {
        Self {
            conditions,
            depth: BOUNDARY_BAND_DEPTH,
        }
    }

    pub fn conditions(&self) -> BoundaryConditions {
        self.conditions
    }

    /// Rewrites the edge bands of `field` in place.
    ///
    /// Bands are written bottom, right, left, top, so `top` wins the corners
    /// it shares. An axis shorter than the band depth is covered entirely.
    pub fn apply(&self, grid: &Grid, field: &mut Array2<f64>) -> HeatResult<()> {
        grid.check_shape(field)?;
        self.conditions.validate()?;

        let (nx, ny) = field.dim();
        let bx = self.depth.min(nx);
        let by = self.depth.min(ny);
        let bc = &self.conditions;

        field.slice_mut(s![.., ..by]).fill(bc.bottom);
        field.slice_mut(s![nx - bx.., ..]).fill(bc.right);
        field.slice_mut(s![..bx, ..]).fill(bc.left);
        field.slice_mut(s![.., ny - by..]).fill(bc.top);

        log::debug!(
            "boundary bands rewritten to {:?} (depth {})",
            bc.to_array(),
            self.depth
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::PlateConfig;

    fn grid() -> Grid {
        Grid::new(&PlateConfig::default(), 1.0).unwrap()
    }

    #[test]
    fn legacy_mapping() {
        let bc = BoundaryConditions::from_legacy(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(bc, BoundaryConditions::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(bc, BoundaryConditions::from([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(bc.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn legacy_rejects_wrong_length() {
        for values in [&[][..], &[1.0, 2.0, 3.0][..], &[1.0, 2.0, 3.0, 4.0, 5.0][..]] {
            let err = BoundaryConditions::from_legacy(values).unwrap_err();
            assert!(matches!(err, HeatError::Precondition(_)));
        }
    }

    #[test]
    fn serde_uses_array_form() {
        let bc: BoundaryConditions = serde_json::from_str("[10, 20, 30, 40]").unwrap();
        assert_eq!(bc.left, 30.0);
        assert_eq!(bc.right, 40.0);
        assert_eq!(serde_json::to_string(&bc).unwrap(), "[10.0,20.0,30.0,40.0]");
    }

    #[test]
    fn stamp_edges_corner_ownership() {
        let grid = grid();
        let mut u = grid.filled(-1.0);
        BoundaryConditions::new(1.0, 2.0, 3.0, 4.0).stamp_edges(&mut u);

        assert_eq!(u[[4, 19]], 1.0);
        assert_eq!(u[[4, 0]], 2.0);
        assert_eq!(u[[0, 7]], 3.0);
        assert_eq!(u[[9, 7]], 4.0);
        // left/right overwrite top/bottom at the corners
        assert_eq!(u[[0, 0]], 3.0);
        assert_eq!(u[[0, 19]], 3.0);
        assert_eq!(u[[9, 0]], 4.0);
        assert_eq!(u[[9, 19]], 4.0);
        assert_eq!(u[[4, 7]], -1.0);
    }

    #[test]
    fn update_writes_five_deep_bands() {
        let grid = grid();
        let mut u = grid.filled(-1.0);
        BoundaryConditionUpdater::new(BoundaryConditions::new(1.0, 2.0, 3.0, 4.0))
            .apply(&grid, &mut u)
            .unwrap();

        // nx = 10: the left (i < 5) and right (i >= 5) bands cover every row
        for ((i, j), &v) in u.indexed_iter() {
            let expected = match (i, j) {
                (_, j) if j >= 15 => 1.0,
                (i, _) if i < 5 => 3.0,
                _ => 4.0,
            };
            assert_eq!(v, expected, "({i}, {j})");
        }
    }

    #[test]
    fn update_leaves_interior_on_larger_plate() {
        let grid = Grid::new(&PlateConfig::new(20.0, 20.0, 1.0), 1.0).unwrap();
        let mut u = grid.filled(-1.0);
        BoundaryConditionUpdater::new(BoundaryConditions::new(1.0, 2.0, 3.0, 4.0))
            .apply(&grid, &mut u)
            .unwrap();

        assert_eq!(u[[10, 10]], -1.0);
        assert_eq!(u[[5, 5]], -1.0);
        assert_eq!(u[[14, 14]], -1.0);
        assert_eq!(u[[10, 4]], 2.0);
        assert_eq!(u[[15, 10]], 4.0);
        assert_eq!(u[[4, 10]], 3.0);
        assert_eq!(u[[10, 15]], 1.0);
        // top wins every corner band it touches
        assert_eq!(u[[0, 19]], 1.0);
        assert_eq!(u[[19, 15]], 1.0);
        // left wins over bottom
        assert_eq!(u[[0, 0]], 3.0);
    }

    #[test]
    fn update_covers_short_axis() {
        let grid = Grid::new(&PlateConfig::new(3.0, 20.0, 1.0), 1.0).unwrap();
        let mut u = grid.filled(-1.0);
        BoundaryConditionUpdater::new(BoundaryConditions::new(1.0, 2.0, 3.0, 4.0))
            .apply(&grid, &mut u)
            .unwrap();
        assert!(u.iter().all(|&v| v != -1.0));
    }

    #[test]
    fn update_rejects_shape_mismatch_without_mutation() {
        let grid = grid();
        let mut u = Array2::from_elem((5, 5), 7.0);
        let err = BoundaryConditionUpdater::new(BoundaryConditions::uniform(0.0))
            .apply(&grid, &mut u)
            .unwrap_err();
        assert!(matches!(err, HeatError::ShapeMismatch { .. }));
        assert!(u.iter().all(|&v| v == 7.0));
    }
}
