mod spots;

use clap::Parser;
use hotplate_core::{HeatResult, Scenario, ScenarioOutcome};
use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use spots::sample_hotspots;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scenario file (JSON). Defaults reproduce the reference 10x20 plate.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(long)]
    out: PathBuf,

    /// Number of extra hot spots placed at random
    #[arg(long, default_value_t = 0)]
    random_hotspots: usize,

    /// RNG seed for random hot spots (reproducibility)
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// Override the number of time steps
    #[arg(long)]
    tsteps: Option<usize>,

    /// Override snapshot steps, comma-separated, e.g. "0,50,100"
    #[arg(long)]
    snapshots: Option<String>,

    /// Compute interior rows in parallel
    #[arg(long)]
    parallel: bool,

    /// Abort if a step produces a non-finite temperature
    #[arg(long)]
    check_finite: bool,
}

#[derive(Serialize)]
struct Meta<'a> {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
    dt: f64,

    sweeps: usize,
    last_delta: f64,

    frame_steps: Vec<usize>,
    frame_times: Vec<f64>,

    scenario: &'a Scenario,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut scenario = match &args.config {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => Scenario::default(),
    };

    if let Some(tsteps) = args.tsteps {
        scenario.integration.tsteps = tsteps;
    }
    if let Some(list) = &args.snapshots {
        scenario.integration.snapshot_steps = parse_step_list(list)?;
    }
    scenario.integration.parallel |= args.parallel;
    scenario.integration.check_finite |= args.check_finite;

    if args.random_hotspots > 0 {
        add_random_hotspots(&mut scenario, args.random_hotspots, args.seed)?;
        log::info!("placed {} random hot spots (seed {})", args.random_hotspots, args.seed);
    }

    let outcome = scenario.run()?;
    log::info!(
        "grid {}x{}, {} sweeps, {} steps, {} frames",
        outcome.grid.nx(),
        outcome.grid.ny(),
        outcome.steady.sweeps,
        scenario.integration.tsteps,
        outcome.frames.len()
    );

    write_outputs(&args.out, &scenario, &outcome)?;
    log::info!("wrote results to {}", args.out.display());

    Ok(())
}

/// Sampling needs the plate's extent, so the grid is validated first.
fn add_random_hotspots(scenario: &mut Scenario, count: usize, seed: u64) -> HeatResult<()> {
    let grid = scenario.grid()?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    scenario.hotspots.extend(sample_hotspots(&mut rng, &grid, count));
    Ok(())
}

fn write_outputs(
    out: &Path,
    scenario: &Scenario,
    outcome: &ScenarioOutcome,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(out)?;

    let mut steady_writer = BufWriter::new(File::create(out.join("steady.bin"))?);
    write_f64_field(&mut steady_writer, &outcome.steady.field)?;
    steady_writer.flush()?;

    let mut frames_writer = BufWriter::new(File::create(out.join("frames.bin"))?);
    for frame in &outcome.frames {
        write_f64_field(&mut frames_writer, &frame.field)?;
    }
    frames_writer.flush()?;

    let grid = &outcome.grid;
    let meta = Meta {
        nx: grid.nx(),
        ny: grid.ny(),
        dx: grid.dx(),
        dy: grid.dy(),
        dt: grid.dt(),
        sweeps: outcome.steady.sweeps,
        last_delta: outcome.steady.last_delta,
        frame_steps: outcome.frames.steps(),
        frame_times: outcome.frames.times(),
        scenario,
    };
    let mut meta_file = BufWriter::new(File::create(out.join("meta.json"))?);
    serde_json::to_writer_pretty(&mut meta_file, &meta)?;
    meta_file.write_all(b"\n")?;
    meta_file.flush()?;

    Ok(())
}

/// Row-major (`i` outer, `j` inner) little-endian `f64`.
fn write_f64_field<W: Write>(w: &mut W, field: &Array2<f64>) -> std::io::Result<()> {
    for &x in field.iter() {
        w.write_all(&x.to_le_bytes())?;
    }
    Ok(())
}

fn parse_step_list(s: &str) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
    let mut out = Vec::new();
    for part in s.split(',') {
        let p = part.trim();
        if p.is_empty() {
            continue;
        }
        let step: usize = p.parse()?;
        out.push(step);
    }
    // ascending, no duplicates
    out.sort_unstable();
    out.dedup();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotplate_core::{HeatError, PlateConfig};
    use tempfile::tempdir;

    fn small_scenario() -> Scenario {
        let mut scenario = Scenario::default();
        scenario.steady.ds = 1.0;
        scenario.steady.maxiter = 50;
        scenario.integration.tsteps = 11;
        scenario.integration.snapshot_steps = vec![0, 5, 10, 40];
        scenario
    }

    #[test]
    fn step_list_parsing() {
        assert_eq!(parse_step_list("10, 0,5,,5").unwrap(), vec![0, 5, 10]);
        assert!(parse_step_list("1,x").is_err());
        assert!(parse_step_list("-1").is_err());
    }

    #[test]
    fn field_bytes_are_row_major_le() {
        let field = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut buf = Vec::new();
        write_f64_field(&mut buf, &field).unwrap();

        assert_eq!(buf.len(), 4 * 8);
        assert_eq!(&buf[8..16], &2.0f64.to_le_bytes());
        assert_eq!(&buf[24..32], &4.0f64.to_le_bytes());
    }

    #[test]
    fn random_hotspots_on_bad_plate_is_a_config_error() {
        for plate in [
            PlateConfig::new(-1.0, 20.0, 4.0),
            PlateConfig::new(10.0, 0.0, 4.0),
            PlateConfig::new(f64::NAN, 20.0, 4.0),
        ] {
            let mut scenario = Scenario {
                plate,
                ..Scenario::default()
            };
            let err = add_random_hotspots(&mut scenario, 3, 1).unwrap_err();
            assert!(matches!(err, HeatError::Configuration(_)), "{err}");
            assert!(scenario.hotspots.is_empty());
        }
    }

    #[test]
    fn random_hotspots_are_reproducible() {
        let mut a = small_scenario();
        let mut b = small_scenario();
        add_random_hotspots(&mut a, 4, 9).unwrap();
        add_random_hotspots(&mut b, 4, 9).unwrap();
        assert_eq!(a.hotspots.len(), 4);
        assert_eq!(a.hotspots, b.hotspots);
    }

    #[test]
    fn outputs_have_expected_sizes_and_metadata() -> Result<(), Box<dyn std::error::Error>> {
        let scenario = small_scenario();
        let outcome = scenario.run()?;
        let (nx, ny) = outcome.grid.shape();
        assert_eq!((nx, ny), (10, 20));

        let dir = tempdir()?;
        write_outputs(dir.path(), &scenario, &outcome)?;

        let field_bytes = nx * ny * 8;
        assert_eq!(fs::read(dir.path().join("steady.bin"))?.len(), field_bytes);
        // step 40 is past the end of an 11-step run
        assert_eq!(fs::read(dir.path().join("frames.bin"))?.len(), 3 * field_bytes);

        let meta: serde_json::Value =
            serde_json::from_reader(File::open(dir.path().join("meta.json"))?)?;
        assert_eq!(meta["nx"], 10);
        assert_eq!(meta["ny"], 20);
        assert_eq!(meta["sweeps"], 50);
        assert_eq!(meta["frame_steps"], serde_json::json!([0, 5, 10]));
        assert_eq!(meta["frame_times"].as_array().map(Vec::len), Some(3));

        let round_trip: Scenario = serde_json::from_value(meta["scenario"].clone())?;
        assert_eq!(round_trip, scenario);
        Ok(())
    }
}
