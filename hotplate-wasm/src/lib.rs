use hotplate_core::{
    BoundaryConditions, DiffusionIntegrator, FrameStack, Grid, HeatError, HotSpot, PlateConfig,
    SteadyStateSolver, update_boundary,
};
use ndarray::Array2;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct Plate {
    grid: Grid,
    field: Array2<f64>,
    frames: FrameStack,
}

#[wasm_bindgen]
impl Plate {
    #[wasm_bindgen(constructor)]
    pub fn new(w: f64, h: f64, d: f64, ds: f64) -> Result<Plate, JsValue> {
        let grid = Grid::new(&PlateConfig::new(w, h, d), ds).map_err(to_js)?;
        Ok(Plate {
            grid,
            field: grid.zeros(),
            frames: FrameStack::empty(grid.shape()),
        })
    }

    // Geometry
    pub fn nx(&self) -> usize { self.grid.nx() }
    pub fn ny(&self) -> usize { self.grid.ny() }
    pub fn dx(&self) -> f64 { self.grid.dx() }
    pub fn dt(&self) -> f64 { self.grid.dt() }

    /// Replace the field with a relaxed steady state. Returns sweeps run.
    pub fn solve(&mut self, bc: Vec<f64>, guess: f64, maxiter: usize) -> Result<usize, JsValue> {
        let bc = BoundaryConditions::from_legacy(&bc).map_err(to_js)?;
        let state = SteadyStateSolver::new(bc, guess, maxiter)
            .solve(&self.grid)
            .map_err(to_js)?;
        self.field = state.field;
        self.frames = FrameStack::empty(self.grid.shape());
        Ok(state.sweeps)
    }

    pub fn update_boundary(&mut self, bc: Vec<f64>) -> Result<(), JsValue> {
        let bc = BoundaryConditions::from_legacy(&bc).map_err(to_js)?;
        update_boundary(&self.grid, &mut self.field, bc).map_err(to_js)
    }

    pub fn inject_hotspot(&mut self, temperature: f64, r: f64, cx: f64, cy: f64) -> Result<usize, JsValue> {
        HotSpot::new(temperature, r, (cx, cy))
            .inject(&self.grid, &mut self.field)
            .map_err(to_js)
    }

    // Integrate + timing (WASM-only)
    pub fn integrate(&mut self, tsteps: usize, snapshots: Vec<u32>) -> Result<IntegrationInfo, JsValue> {
        let t0 = now_ms();
        let mut integrator = DiffusionIntegrator::new(self.grid, self.field.clone())
            .map_err(to_js)?
            .with_finite_check(true);
        let frames = integrator
            .integrate(tsteps, snapshots.into_iter().map(|s| s as usize))
            .map_err(to_js)?;
        self.field = integrator.into_field();
        self.frames = frames;
        let t1 = now_ms();
        Ok(IntegrationInfo { frames: self.frames.len(), compute_ms: t1 - t0 })
    }

    // Copy-based JS access (reliable)
    pub fn get_field(&self) -> Vec<f64> {
        self.field.iter().copied().collect()
    }

    /// Recorded frames back to back, each `nx * ny` values row-major.
    pub fn get_frames(&self) -> Vec<f64> {
        self.frames
            .iter()
            .flat_map(|f| f.field.iter().copied())
            .collect()
    }

    pub fn frame_steps(&self) -> Vec<u32> {
        self.frames.steps().into_iter().map(|s| s as u32).collect()
    }
}

#[wasm_bindgen]
pub struct IntegrationInfo {
    frames: usize,
    compute_ms: f64,
}

#[wasm_bindgen]
impl IntegrationInfo {
    pub fn frames(&self) -> usize { self.frames }
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
}

fn to_js(e: HeatError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
