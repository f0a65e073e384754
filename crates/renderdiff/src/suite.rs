//! Directory-level visual test runs.
//!
//! Every `*.png` and `*.json` file under the expected directory is a case.
//! The rendered output must sit at the same relative path under the actual
//! directory. Results are collected into a [`SuiteSummary`]; nothing is
//! counted in shared state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::compare::compare_images;
use crate::config::CompareConfig;
use crate::error::{CompareError, Result};
use crate::grid::{compare_grids, GRID_INCOMPARABLE};

/// Which comparator a case uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseKind {
    /// Raster image, compared pixel by pixel.
    Image,
    /// UTF-grid JSON, compared cell by cell.
    Grid,
}

impl CaseKind {
    /// Classify a file by extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Image),
            "json" => Some(Self::Grid),
            _ => None,
        }
    }

    /// Lowercase name used in reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Grid => "grid",
        }
    }
}

/// Result of a single case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Difference within the allowance.
    Passed { diff: u64 },
    /// Difference above the allowance.
    Failed { diff: u64 },
    /// Image dimensions differ; no allowance applies.
    SizeMismatch {
        actual: (u32, u32),
        expected: (u32, u32),
    },
    /// Grid metadata or dimensions differ.
    Incomparable,
    /// No rendered output for the expected file.
    Missing,
    /// An input could not be loaded.
    Errored { message: String },
}

impl Outcome {
    /// True only for [`Outcome::Passed`].
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    /// Classify a raw difference count.
    pub fn evaluate(kind: CaseKind, diff: u64, config: &CompareConfig) -> Self {
        let allowed = match kind {
            CaseKind::Image => config.max_image_diff,
            CaseKind::Grid => config.max_grid_diff,
        };
        if kind == CaseKind::Grid && diff == GRID_INCOMPARABLE {
            Self::Incomparable
        } else if diff <= allowed {
            Self::Passed { diff }
        } else {
            Self::Failed { diff }
        }
    }

    /// Compare one rendered file against its reference and classify it.
    ///
    /// Images of different width or height are a [`Outcome::SizeMismatch`]
    /// whatever the allowance.
    pub fn assess(
        kind: CaseKind,
        actual: &Path,
        expected: &Path,
        config: &CompareConfig,
    ) -> Result<Self> {
        match kind {
            CaseKind::Image => {
                let result =
                    compare_images(actual, expected, config.pixel_threshold, config.alpha)?;
                if result.same_size() {
                    Ok(Self::evaluate(kind, result.diff, config))
                } else {
                    Ok(Self::SizeMismatch {
                        actual: result.actual_size,
                        expected: result.expected_size,
                    })
                }
            }
            CaseKind::Grid => {
                let diff = compare_grids(actual, expected, 0, config.alpha)?;
                Ok(Self::evaluate(kind, diff, config))
            }
        }
    }
}

/// One compared pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseResult {
    /// Path relative to the suite directories.
    pub name: String,
    pub kind: CaseKind,
    pub outcome: Outcome,
}

/// Aggregated results of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<CaseResult>,
}

impl SuiteSummary {
    /// Add a case and update the counters.
    pub fn record(&mut self, result: CaseResult) {
        if result.outcome.is_pass() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }

    /// Number of recorded cases.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// True when every case passed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Cases that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| !r.outcome.is_pass())
    }
}

/// A pair of directories to compare.
#[derive(Debug, Clone)]
pub struct Suite {
    actual_dir: PathBuf,
    expected_dir: PathBuf,
    config: CompareConfig,
}

impl Suite {
    /// Pair rendered output in `actual_dir` with references in `expected_dir`.
    pub fn new(
        actual_dir: impl Into<PathBuf>,
        expected_dir: impl Into<PathBuf>,
        config: CompareConfig,
    ) -> Self {
        Self {
            actual_dir: actual_dir.into(),
            expected_dir: expected_dir.into(),
            config,
        }
    }

    /// Settings applied to every case.
    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Relative paths of all cases, sorted.
    pub fn discover(&self) -> Result<Vec<(PathBuf, CaseKind)>> {
        let mut cases = Vec::new();
        collect_cases(&self.expected_dir, Path::new(""), &mut cases)?;
        cases.sort();
        Ok(cases)
    }

    /// Compare every discovered case.
    pub fn run(&self) -> Result<SuiteSummary> {
        let cases = self.discover()?;
        log::info!(
            "comparing {} cases: {} vs {}",
            cases.len(),
            self.actual_dir.display(),
            self.expected_dir.display()
        );

        let mut summary = SuiteSummary::default();
        for (relative, kind) in cases {
            summary.record(self.run_case(&relative, kind));
        }

        log::info!("{} passed, {} failed", summary.passed, summary.failed);
        Ok(summary)
    }

    /// Compare a single case given its relative path.
    pub fn run_case(&self, relative: &Path, kind: CaseKind) -> CaseResult {
        let actual = self.actual_dir.join(relative);
        let expected = self.expected_dir.join(relative);
        let name = relative.to_string_lossy().replace('\\', "/");

        let outcome = if actual.is_file() {
            match Outcome::assess(kind, &actual, &expected, &self.config) {
                Ok(outcome) => outcome,
                Err(e) => Outcome::Errored {
                    message: e.to_string(),
                },
            }
        } else {
            Outcome::Missing
        };

        if !outcome.is_pass() {
            log::warn!("{name}: {outcome:?}");
        }
        CaseResult {
            name,
            kind,
            outcome,
        }
    }
}

fn collect_cases(root: &Path, relative: &Path, out: &mut Vec<(PathBuf, CaseKind)>) -> Result<()> {
    let dir = root.join(relative);
    let entries = fs::read_dir(&dir).map_err(|e| CompareError::io(&dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| CompareError::io(&dir, e))?;
        let rel = relative.join(entry.file_name());
        let path = entry.path();
        if path.is_dir() {
            collect_cases(root, &rel, out)?;
        } else if let Some(kind) = CaseKind::from_path(&path) {
            out.push((rel, kind));
        }
    }
    Ok(())
}
