//! renderdiff CLI - compare rendered map output against expected files.
//!
//! Run: cargo run -p renderdiff-cli -- --help

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use renderdiff::{
    compare_grids, compare_images, report, CompareConfig, CompareError, Suite,
    GRID_INCOMPARABLE,
};

/// Visual test comparison for rendered map tiles and UTF-grids
#[derive(Parser)]
#[command(name = "renderdiff", version, long_about = None)]
#[command(after_help = "EXIT CODES:
    0 - Difference within the allowance
    1 - Difference above the allowance (or sizes differ, or grids incomparable)
    2 - Error (file not found, invalid image or JSON, etc.)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two raster images pixel by pixel
    Image {
        /// Rendered image
        actual: PathBuf,

        /// Reference image
        expected: PathBuf,

        /// Ignore the alpha channel
        #[arg(long)]
        no_alpha: bool,

        /// Per-channel tolerance (0-255)
        #[arg(long, default_value = "0")]
        pixel_threshold: u8,

        /// Differing pixels allowed for a pass
        #[arg(long, default_value = "0")]
        max_diff: u64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two UTF-grid JSON documents cell by cell
    Grid {
        /// Rendered grid
        actual: PathBuf,

        /// Reference grid
        expected: PathBuf,

        /// Differing cells allowed for a pass
        #[arg(long, default_value = "0")]
        max_diff: u64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare every .png and .json under two directories
    Suite {
        /// Directory with rendered output
        actual_dir: PathBuf,

        /// Directory with reference output
        expected_dir: PathBuf,

        /// Comparison config (TOML); defaults to ./renderdiff.toml when present
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,

        /// Only print failures
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands) -> Result<bool, CompareError> {
    match command {
        Commands::Image {
            actual,
            expected,
            no_alpha,
            pixel_threshold,
            max_diff,
            json,
        } => {
            let result = compare_images(&actual, &expected, pixel_threshold, !no_alpha)?;
            let incomparable = !result.same_size();
            let passed = !incomparable && result.diff <= max_diff;
            print_single("image", &actual, &expected, result.diff, incomparable, passed, json);
            Ok(passed)
        }
        Commands::Grid {
            actual,
            expected,
            max_diff,
            json,
        } => {
            let diff = compare_grids(&actual, &expected, 0, true)?;
            let incomparable = diff == GRID_INCOMPARABLE;
            let passed = !incomparable && diff <= max_diff;
            print_single("grid", &actual, &expected, diff, incomparable, passed, json);
            Ok(passed)
        }
        Commands::Suite {
            actual_dir,
            expected_dir,
            config,
            output,
            json,
            quiet,
        } => run_suite(
            &actual_dir,
            &expected_dir,
            config.as_deref(),
            output.as_deref(),
            json,
            quiet,
        ),
    }
}

fn print_single(
    kind: &str,
    actual: &Path,
    expected: &Path,
    diff: u64,
    incomparable: bool,
    passed: bool,
    json: bool,
) {
    if json {
        let value = serde_json::json!({
            "kind": kind,
            "actual": actual.display().to_string(),
            "expected": expected.display().to_string(),
            "diff": diff,
            "incomparable": incomparable,
            "passed": passed,
        });
        println!("{value}");
    } else {
        println!("{diff}");
        if incomparable {
            eprintln!("✗ {kind} comparison FAILED (dimensions differ)");
        } else if passed {
            eprintln!("✓ {kind} comparison PASSED");
        } else {
            eprintln!("✗ {kind} comparison FAILED");
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<CompareConfig, CompareError> {
    let config = match path {
        Some(path) => CompareConfig::load(path)?,
        None => {
            let default = Path::new(CompareConfig::CONFIG_FILE);
            if default.is_file() {
                CompareConfig::load(default)?
            } else {
                CompareConfig::default()
            }
        }
    };
    Ok(config.with_env_overrides())
}

fn run_suite(
    actual_dir: &Path,
    expected_dir: &Path,
    config: Option<&Path>,
    output: Option<&Path>,
    json: bool,
    quiet: bool,
) -> Result<bool, CompareError> {
    let config = load_config(config)?;
    let summary = Suite::new(actual_dir, expected_dir, config).run()?;

    let rendered = if json {
        report::render_json(&summary).map_err(|source| CompareError::Json {
            path: output.unwrap_or(Path::new("<stdout>")).to_path_buf(),
            source,
        })?
    } else {
        report::render_text(&summary)
    };

    if let Some(path) = output {
        fs::write(path, &rendered).map_err(|source| CompareError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }

    if quiet {
        for failure in summary.failures() {
            eprintln!("✗ {}: {:?}", failure.name, failure.outcome);
        }
    } else {
        print!("{rendered}");
    }

    Ok(summary.is_success())
}
