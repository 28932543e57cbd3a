use hotplate_core::{Grid, HotSpot};
use rand::Rng;

/// Place `count` hot spots fully inside the grid's extent.
///
/// Radii are 5-20% of the shorter side; temperatures 100-500. Taking a
/// validated [`Grid`] keeps every sampling range non-empty.
pub fn sample_hotspots<R: Rng>(rng: &mut R, grid: &Grid, count: usize) -> Vec<HotSpot> {
    // physical position of the last point on each axis
    let (span_x, span_y) = grid.position(grid.nx() - 1, grid.ny() - 1);
    let short_side = span_x.min(span_y);
    (0..count)
        .map(|_| {
            let r = rng.gen_range(0.05..0.2) * short_side;
            let cx = rng.gen_range(r..span_x - r);
            let cy = rng.gen_range(r..span_y - r);
            let temperature = rng.gen_range(100.0..500.0);
            HotSpot::new(temperature, r, (cx, cy))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotplate_core::PlateConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn spots_stay_on_the_grid() {
        let grid = Grid::new(&PlateConfig::default(), 0.1).unwrap();
        let (span_x, span_y) = grid.position(grid.nx() - 1, grid.ny() - 1);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for spot in sample_hotspots(&mut rng, &grid, 200) {
            let (cx, cy) = spot.center;
            assert!(spot.r > 0.0);
            assert!(cx - spot.r >= 0.0 && cx + spot.r <= span_x);
            assert!(cy - spot.r >= 0.0 && cy + spot.r <= span_y);
            assert!((100.0..500.0).contains(&spot.temperature));
        }
    }

    #[test]
    fn smallest_grid_still_samples() {
        let grid = Grid::new(&PlateConfig::new(3.0, 3.0, 1.0), 1.0).unwrap();
        let spots = sample_hotspots(&mut ChaCha8Rng::seed_from_u64(3), &grid, 20);
        assert_eq!(spots.len(), 20);
    }

    #[test]
    fn same_seed_same_spots() {
        let grid = Grid::new(&PlateConfig::default(), 1.0).unwrap();
        let a = sample_hotspots(&mut ChaCha8Rng::seed_from_u64(42), &grid, 5);
        let b = sample_hotspots(&mut ChaCha8Rng::seed_from_u64(42), &grid, 5);
        assert_eq!(a, b);
    }
}
