//! `notdotblur` CLI - Enlarge pixel art by an integer factor.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notdotblur::transform::{ScaleFactor, ScaleLimits};
use notdotblur::{EnlargeOptions, enlarge_file};

/// Enlarge an image by replicating each pixel into an N x N block.
#[derive(Parser, Debug)]
#[command(name = "notdotblur")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image (PNG, JPEG, GIF or BMP).
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Scale factor, an integer of 1 or greater.
    #[arg(short, long, default_value = "2", value_name = "INT", allow_negative_numbers = true)]
    scale: i64,

    /// Output PNG path. Defaults to `{stem}-x{N}-{W}x{H}.png` next to the input.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Largest output buffer in MiB (0 for no limit). Defaults to 1024.
    #[arg(long, value_name = "MB")]
    max_output_mb: Option<u64>,

    /// Scale on the current thread only.
    #[arg(long)]
    sequential: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("notdotblur={log_level},notdotblur_io={log_level}").into()),
        )
        .with(log_layer())
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Log events, the error chain included, go to stderr.
type LogLayer<S> = tracing_subscriber::fmt::Layer<S, DefaultFields, Format, fn() -> io::Stderr>;

fn log_layer<S>() -> LogLayer<S> {
    tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr as fn() -> io::Stderr)
}

fn run(args: &Args) -> Result<()> {
    let options = build_options(args)?;
    info!("selected {}", args.input.display());

    let result = enlarge_file(&args.input, args.output.as_deref(), &options)
        .with_context(|| format!("failed to enlarge {}", args.input.display()))?;

    info!("source size: {}x{}", result.source.0, result.source.1);
    info!(
        "target size: {}x{} (x{})",
        result.target.0, result.target.1, options.factor
    );
    info!("saved {}", result.output.display());

    Ok(())
}

fn build_options(args: &Args) -> Result<EnlargeOptions> {
    let factor = ScaleFactor::new(args.scale).context("invalid --scale")?;
    let limits = match args.max_output_mb {
        None => ScaleLimits::default(),
        Some(0) => ScaleLimits::unlimited(),
        Some(mb) => {
            let bytes = usize::try_from(mb.saturating_mul(1 << 20)).unwrap_or(usize::MAX);
            ScaleLimits::new(bytes)
        }
    };

    Ok(EnlargeOptions {
        factor,
        limits,
        parallel: !args.sequential && EnlargeOptions::default().parallel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_log_layer_writes_to_stderr() {
        let _layer: LogLayer<tracing_subscriber::Registry> = log_layer();
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["notdotblur", "cat.png"]);
        assert_eq!(args.scale, 2);
        assert!(args.output.is_none());

        let options = build_options(&args).unwrap();
        assert_eq!(options.factor.get(), 2);
        assert_eq!(options.limits, ScaleLimits::default());
    }

    #[test]
    fn test_rejects_small_factor() {
        for scale in ["0", "-3"] {
            let args = parse(&["notdotblur", "cat.png", "--scale", scale]);
            let err = build_options(&args).unwrap_err();
            assert!(
                format!("{err:#}").contains("scale factor must be an integer of 1 or greater"),
                "{err:#}"
            );
        }
    }

    #[test]
    fn test_rejects_non_integer_factor() {
        assert!(Args::try_parse_from(["notdotblur", "cat.png", "-s", "2.5"]).is_err());
        assert!(Args::try_parse_from(["notdotblur", "cat.png", "-s", "abc"]).is_err());
    }

    #[test]
    fn test_limits_and_sequential() {
        let args = parse(&[
            "notdotblur",
            "cat.png",
            "-s",
            "4",
            "-o",
            "big.png",
            "--max-output-mb",
            "3",
            "--sequential",
        ]);
        let options = build_options(&args).unwrap();
        assert_eq!(options.limits, ScaleLimits::new(3 << 20));
        assert!(!options.parallel);
        assert_eq!(args.output, Some(PathBuf::from("big.png")));

        let args = parse(&["notdotblur", "cat.png", "--max-output-mb", "0"]);
        assert_eq!(build_options(&args).unwrap().limits, ScaleLimits::unlimited());
    }
}
