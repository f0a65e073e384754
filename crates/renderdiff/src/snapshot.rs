//! Visual regression assertions against stored baselines.
//!
//! Baselines live at `<root>/<name>.<ext>` (by default under
//! `tests/snapshots`). A missing baseline is created from the rendered file
//! when `SNAPSHOT_UPDATE` is set; otherwise the assertion fails and names the
//! path it expected.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CompareConfig;
use crate::error::{CompareError, Result};
use crate::suite::{CaseKind, Outcome};

/// Result of checking one rendered file against its baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotStatus {
    /// Within the configured allowance.
    Matched { diff: u64 },
    /// No baseline existed and one was written.
    Created { baseline: PathBuf },
    /// Over the allowance; the rendered file was copied next to the baseline.
    Mismatch {
        outcome: Outcome,
        baseline: PathBuf,
        actual: PathBuf,
    },
    /// No baseline and updating is disabled.
    MissingBaseline { baseline: PathBuf },
}

/// Baseline store for snapshot assertions.
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: PathBuf,
    config: CompareConfig,
    update: bool,
}

impl Snapshot {
    /// Environment variable that enables baseline creation.
    pub const UPDATE_ENV: &'static str = "SNAPSHOT_UPDATE";

    /// Default baseline directory, relative to the crate under test.
    pub const DEFAULT_DIR: &'static str = "tests/snapshots";

    /// Baselines under `root`; updating follows `SNAPSHOT_UPDATE`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: CompareConfig::default(),
            update: std::env::var_os(Self::UPDATE_ENV).is_some(),
        }
    }

    pub fn with_config(mut self, config: CompareConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }

    /// Baseline path for a case name and kind.
    pub fn baseline_path(&self, name: &str, kind: CaseKind) -> PathBuf {
        self.root.join(format!("{name}.{}", extension(kind)))
    }

    fn actual_path(&self, name: &str, kind: CaseKind) -> PathBuf {
        self.root.join(format!("{name}.actual.{}", extension(kind)))
    }

    /// Compare `rendered` against the baseline called `name`.
    ///
    /// The comparator is chosen by the extension of `rendered`.
    pub fn check(&self, name: &str, rendered: &Path) -> Result<SnapshotStatus> {
        let kind = CaseKind::from_path(rendered).ok_or_else(|| CompareError::Unsupported {
            path: rendered.to_path_buf(),
        })?;
        let baseline = self.baseline_path(name, kind);

        if !baseline.is_file() {
            if !self.update {
                return Ok(SnapshotStatus::MissingBaseline { baseline });
            }
            copy(rendered, &baseline)?;
            log::info!("created new baseline: {}", baseline.display());
            return Ok(SnapshotStatus::Created { baseline });
        }

        match Outcome::assess(kind, rendered, &baseline, &self.config)? {
            Outcome::Passed { diff } => Ok(SnapshotStatus::Matched { diff }),
            outcome => {
                let actual = self.actual_path(name, kind);
                copy(rendered, &actual)?;
                Ok(SnapshotStatus::Mismatch {
                    outcome,
                    baseline,
                    actual,
                })
            }
        }
    }

    /// Assert that `rendered` matches its baseline.
    ///
    /// # Panics
    ///
    /// Panics on a mismatch, a missing baseline, or an unreadable input.
    pub fn assert_match(&self, name: &str, rendered: &Path) {
        match self.check(name, rendered) {
            Ok(SnapshotStatus::Matched { .. } | SnapshotStatus::Created { .. }) => {}
            Ok(SnapshotStatus::Mismatch {
                outcome,
                baseline,
                actual,
            }) => panic!(
                "Visual regression '{}': {:?}\n\
                 Baseline: {}\n\
                 Actual: {}",
                name,
                outcome,
                baseline.display(),
                actual.display()
            ),
            Ok(SnapshotStatus::MissingBaseline { baseline }) => panic!(
                "No baseline found for '{}'. Run with {}=1 to create.\n\
                 Expected path: {}",
                name,
                Self::UPDATE_ENV,
                baseline.display()
            ),
            Err(e) => panic!("Snapshot '{name}' could not be compared: {e}"),
        }
    }

    /// Assert an image against `tests/snapshots/<name>.png` allowing up to
    /// `max_diff` differing pixels.
    pub fn assert_image_match(name: &str, rendered: &Path, max_diff: u64) {
        let config = CompareConfig {
            max_image_diff: max_diff,
            ..CompareConfig::default()
        };
        Self::new(Self::DEFAULT_DIR)
            .with_config(config)
            .assert_match(name, rendered);
    }

    /// Assert a grid against `tests/snapshots/<name>.json` allowing up to
    /// `max_diff` differing cells.
    pub fn assert_grid_match(name: &str, rendered: &Path, max_diff: u64) {
        let config = CompareConfig {
            max_grid_diff: max_diff,
            ..CompareConfig::default()
        };
        Self::new(Self::DEFAULT_DIR)
            .with_config(config)
            .assert_match(name, rendered);
    }
}

const fn extension(kind: CaseKind) -> &'static str {
    match kind {
        CaseKind::Image => "png",
        CaseKind::Grid => "json",
    }
}

fn copy(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| CompareError::io(parent, e))?;
    }
    fs::copy(from, to).map_err(|e| CompareError::io(from, e))?;
    Ok(())
}
