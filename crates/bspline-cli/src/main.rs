use std::{error::Error, fs, path::Path};

use bspline::{run_pose_fit, PoseFitConfig, PoseFitInput, PoseFitReport};
use clap::Parser;

/// Fit a continuous-time pose spline to timestamped poses.
#[derive(Debug, Parser)]
#[command(author, version, about = "Pose spline fitting")]
struct Args {
    /// JSON file with the timestamped samples.
    #[arg(long)]
    input: String,

    /// JSON fit configuration. Defaults are used if omitted.
    #[arg(long)]
    config: Option<String>,

    /// Spline order, replacing the configured one.
    #[arg(long)]
    order: Option<usize>,

    /// Number of uniform segments, replacing the configured one.
    #[arg(long)]
    segments: Option<usize>,

    /// Smoothing weight, replacing the configured one.
    #[arg(long)]
    lambda: Option<f64>,

    /// Write the report here instead of stdout.
    #[arg(long)]
    output: Option<String>,
}

/// Command-line replacements for fields of [`PoseFitConfig`].
#[derive(Debug, Default, Clone, Copy)]
struct FitOverrides {
    order: Option<usize>,
    segments: Option<usize>,
    lambda: Option<f64>,
}

impl FitOverrides {
    fn apply(&self, config: &mut PoseFitConfig) {
        if let Some(order) = self.order {
            config.order = order;
        }
        if let Some(segments) = self.segments {
            config.fit.num_segments = segments;
        }
        if let Some(lambda) = self.lambda {
            config.fit.lambda = lambda;
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&data)?)
}

/// A fit whose residuals are not finite is reported as an error, not written out.
fn check_residuals(report: &PoseFitReport) -> Result<(), Box<dyn Error>> {
    let r = &report.residuals;
    let values = [
        r.rms_translation,
        r.max_translation,
        r.rms_rotation,
        r.max_rotation,
    ];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(format!("fit produced non-finite residuals: {r:?}").into());
    }
    Ok(())
}

fn fit_from_files(
    input_path: &str,
    config_path: Option<&str>,
    overrides: &FitOverrides,
) -> Result<PoseFitReport, Box<dyn Error>> {
    let input: PoseFitInput = read_json(Path::new(input_path))?;
    let mut config = match config_path {
        Some(path) => read_json::<PoseFitConfig>(Path::new(path))?,
        None => PoseFitConfig::default(),
    };
    overrides.apply(&mut config);

    let report = run_pose_fit(&input, &config)?;
    check_residuals(&report)?;
    Ok(report)
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let overrides = FitOverrides {
        order: args.order,
        segments: args.segments,
        lambda: args.lambda,
    };
    let report = fit_from_files(&args.input, args.config.as_deref(), &overrides)?;
    let json = serde_json::to_string_pretty(&report)?;
    match args.output {
        Some(path) => fs::write(&path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
