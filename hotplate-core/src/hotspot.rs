use crate::error::{HeatError, HeatResult, require_finite};
use crate::grid::Grid;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A disc of fixed temperature stamped onto the plate.
///
/// `center` is in physical coordinates, not grid indices. Points exactly on
/// the circle are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotSpot {
    pub temperature: f64,
    pub r: f64,
    pub center: (f64, f64),
}

impl Default for HotSpot {
    fn default() -> Self {
        Self {
            temperature: 200.0,
            r: 1.0,
            center: (0.0, 0.0),
        }
    }
}

impl HotSpot {
    pub fn new(temperature: f64, r: f64, center: (f64, f64)) -> Self {
        Self {
            temperature,
            r,
            center,
        }
    }

    fn validate(&self) -> HeatResult<()> {
        if !(self.r.is_finite() && self.r > 0.0) {
            return Err(HeatError::Precondition(format!(
                "hot spot radius must be > 0, got {}",
                self.r
            )));
        }
        require_finite("hot spot temperature", self.temperature)?;
        require_finite("hot spot center x", self.center.0)?;
        require_finite("hot spot center y", self.center.1)
    }

    /// Sets every point strictly inside the disc to `temperature`.
    /// Returns how many points were written.
    pub fn inject(&self, grid: &Grid, field: &mut Array2<f64>) -> HeatResult<usize> {
        grid.check_shape(field)?;
        self.validate()?;

        let r2 = self.r * self.r;
        let (cx, cy) = self.center;
        let mut stamped = 0;
        for ((i, j), v) in field.indexed_iter_mut() {
            let (x, y) = grid.position(i, j);
            let p2 = (x - cx).powi(2) + (y - cy).powi(2);
            if p2 < r2 {
                *v = self.temperature;
                stamped += 1;
            }
        }

        log::debug!(
            "hot spot {} at ({cx}, {cy}) r={}: {stamped} points",
            self.temperature,
            self.r
        );
        Ok(stamped)
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
    fn stamps_strict_interior_of_disc() {
        let grid = grid();
        let mut u = grid.zeros();
        let n = HotSpot::new(200.0, 2.0, (5.0, 5.0)).inject(&grid, &mut u).unwrap();

        // centre, four unit neighbours, four diagonals; (3,5) lies on the circle
        assert_eq!(n, 9);
        assert_eq!(u[[5, 5]], 200.0);
        assert_eq!(u[[6, 6]], 200.0);
        assert_eq!(u[[3, 5]], 0.0);
        assert_eq!(u[[5, 7]], 0.0);
    }

    #[test]
    fn uses_physical_coordinates() {
        let grid = Grid::new(&PlateConfig::default(), 0.5).unwrap();
        let mut u = grid.zeros();
        HotSpot::new(50.0, 0.3, (2.0, 3.0)).inject(&grid, &mut u).unwrap();

        assert_eq!(u[[4, 6]], 50.0);
        assert_eq!(u.iter().filter(|&&v| v == 50.0).count(), 1);
    }

    #[test]
    fn reaches_the_edges() {
        let grid = grid();
        let mut u = grid.zeros();
        HotSpot::default().inject(&grid, &mut u).unwrap();

        assert_eq!(u[[0, 0]], 200.0);
        assert_eq!(u.iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn rejects_non_positive_radius_without_mutation() {
        let grid = grid();
        let mut u = grid.zeros();
        for r in [0.0, -1.0, f64::NAN] {
            let err = HotSpot::new(200.0, r, (5.0, 5.0)).inject(&grid, &mut u).unwrap_err();
            assert!(matches!(err, HeatError::Precondition(_)));
        }
        assert!(u.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn rejects_shape_mismatch() {
        let grid = grid();
        let mut u = Array2::zeros((3, 3));
        let err = HotSpot::default().inject(&grid, &mut u).unwrap_err();
        assert!(matches!(err, HeatError::ShapeMismatch { .. }));
    }
}
