//! fieldlines: turn traced segment files into streamline and arrow files.
//!
//! Reads the segment soup emitted by a streamline tracer, stitches it
//! into streamlines, clips piecewise-smooth fields at their switching
//! manifold, places direction arrows, and writes `streamlines.dat` and
//! `streamarrows.dat` into a fresh output directory.
//!
//! # Usage
//!
//! ```text
//! fieldlines --out plot segments.dat
//! fieldlines --out plot --manifold 1 -0.5 0 field0.dat field1.dat
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use fieldlines_core::diagnostics::{Clock, process_with_diagnostics};
use fieldlines_core::{AffineManifold, ClipStrategy, StreamplotConfig, StreamplotInput};
use log::info;

/// Build streamplots from traced segments.
///
/// With one segments file the field is treated as smooth. With
/// `--manifold A B C` exactly two files are expected, traced through
/// field 0 and field 1, and each is clipped to its side of the switching
/// line `A*x + B*y + C = 0`.
#[derive(Parser)]
#[command(name = "fieldlines", version)]
struct Cli {
    /// Segment files (`x0; y0; x1; y1` per line).
    #[arg(required = true)]
    segments: Vec<PathBuf>,

    /// Output directory; must not exist, its parent must.
    #[arg(long)]
    out: PathBuf,

    /// Affine switching manifold coefficients `A B C`.
    #[arg(
        long,
        num_args = 3,
        value_names = ["A", "B", "C"],
        allow_negative_numbers = true
    )]
    manifold: Option<Vec<f64>>,

    /// How streamlines are cut at the manifold.
    #[arg(long, value_enum, default_value_t = Clip::Crossing)]
    clip: Clip,

    /// Minimum edge fraction kept on either side of an arrow midpoint.
    #[arg(long, default_value_t = StreamplotConfig::DEFAULT_MIN_ARROW_FRACTION)]
    min_arrow_fraction: f64,

    /// Residual tolerance for manifold crossings.
    #[arg(long, default_value_t = StreamplotConfig::DEFAULT_ROOT_TOLERANCE)]
    root_tolerance: f64,

    /// Iteration cap for manifold crossings.
    #[arg(long, default_value_t = StreamplotConfig::DEFAULT_ROOT_MAX_ITERATIONS)]
    root_max_iterations: usize,

    /// Print the per-stage diagnostics report to stderr.
    #[arg(long)]
    diagnostics: bool,

    /// Output diagnostics as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, all other pipeline parameter flags are ignored.
    /// The JSON must be a valid `StreamplotConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Clip strategy selection.
#[derive(Clone, Copy, ValueEnum)]
enum Clip {
    /// Cut sections exactly at the manifold.
    Crossing,
    /// Keep visible vertices only.
    Filter,
}

/// Build a [`StreamplotConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<StreamplotConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(StreamplotConfig {
        clip_strategy: match cli.clip {
            Clip::Crossing => ClipStrategy::Crossing,
            Clip::Filter => ClipStrategy::Filter,
        },
        min_arrow_fraction: cli.min_arrow_fraction,
        root_tolerance: cli.root_tolerance,
        root_max_iterations: cli.root_max_iterations,
    })
}

/// Read the segment files into pipeline input.
fn input_from_cli(cli: &Cli) -> Result<StreamplotInput, String> {
    let read = |path: &PathBuf| fieldlines_io::read_segments(path).map_err(|e| e.to_string());

    match (cli.manifold.as_deref(), cli.segments.as_slice()) {
        (None, [path]) => Ok(StreamplotInput::Smooth {
            segments: read(path)?,
        }),
        (None, files) => Err(format!(
            "expected one segments file for a smooth field, got {}",
            files.len()
        )),
        (Some(&[a, b, c]), [field0, field1]) => Ok(StreamplotInput::PiecewiseSmooth {
            field0: read(field0)?,
            field1: read(field1)?,
            manifold: AffineManifold::new(a, b, c),
        }),
        (Some(&[_, _, _]), files) => Err(format!(
            "--manifold needs exactly two segments files (field 0, field 1), got {}",
            files.len()
        )),
        (Some(coefficients), _) => Err(format!(
            "--manifold takes three coefficients, got {}",
            coefficients.len()
        )),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let input = match input_from_cli(&cli) {
        Ok(input) => input,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "loaded {} segments from {} file(s)",
        input.segment_count(),
        cli.segments.len(),
    );

    let (streamplot, diagnostics) = match process_with_diagnostics(input, &config, &StdClock) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Pipeline error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fieldlines_io::write_streamplot(&cli.out, &streamplot) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    if cli.json {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing diagnostics: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else if cli.diagnostics {
        eprintln!("{}", diagnostics.report());
    }

    ExitCode::SUCCESS
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fieldlines").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = parse(&[
            "--out",
            "plot",
            "--clip",
            "filter",
            "--min-arrow-fraction",
            "0.2",
            "--root-max-iterations",
            "7",
            "a.dat",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.clip_strategy, ClipStrategy::Filter);
        assert!((config.min_arrow_fraction - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.root_max_iterations, 7);
        assert!(
            (config.root_tolerance - StreamplotConfig::DEFAULT_ROOT_TOLERANCE).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = parse(&[
            "--out",
            "plot",
            "--clip",
            "filter",
            "--config-json",
            r#"{"min_arrow_fraction": 0.3}"#,
            "a.dat",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.clip_strategy, ClipStrategy::Crossing);
        assert!((config.min_arrow_fraction - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_config_json_is_reported() {
        let cli = parse(&["--out", "plot", "--config-json", "{", "a.dat"]);
        assert!(config_from_cli(&cli).unwrap_err().contains("--config-json"));
    }

    #[test]
    fn manifold_accepts_negative_coefficients() {
        let cli = parse(&[
            "--out",
            "plot",
            "--manifold",
            "1",
            "-0.5",
            "0",
            "f0.dat",
            "f1.dat",
        ]);
        assert_eq!(cli.manifold, Some(vec![1.0, -0.5, 0.0]));
        assert_eq!(cli.segments.len(), 2);
    }

    #[test]
    fn manifold_requires_two_files() {
        let cli = parse(&["--out", "plot", "--manifold", "0", "1", "0", "only.dat"]);
        assert!(
            input_from_cli(&cli)
                .unwrap_err()
                .contains("exactly two segments files")
        );
    }

    #[test]
    fn smooth_field_requires_one_file() {
        let cli = parse(&["--out", "plot", "a.dat", "b.dat"]);
        assert!(input_from_cli(&cli).unwrap_err().contains("one segments file"));
    }

    #[test]
    fn segments_and_out_are_required() {
        assert!(Cli::try_parse_from(["fieldlines", "a.dat"]).is_err());
        assert!(Cli::try_parse_from(["fieldlines", "--out", "plot"]).is_err());
    }
}
