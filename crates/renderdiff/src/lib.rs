#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::format_push_string)]
#![allow(clippy::manual_assert)]
#![allow(clippy::needless_pass_by_value)]
//! Visual regression comparison for map rendering tests.
//!
//! Compares a rendered raster or UTF-grid tile against its expected output
//! and returns a difference count. Zero means identical.
//!
//! # Example
//!
//! ```ignore
//! use renderdiff::{compare, compare_grids, GRID_INCOMPARABLE};
//!
//! let pixels = compare("out/lines.png", "expected/lines.png", true)?;
//! assert_eq!(pixels, 0);
//!
//! let cells = compare_grids("out/world.json", "expected/world.json", 0, true)?;
//! assert_ne!(cells, GRID_INCOMPARABLE);
//! ```

mod compare;
mod config;
mod error;
mod grid;
pub mod pixel;
mod raster;
pub mod report;
mod snapshot;
mod suite;

pub use compare::{compare, compare_images, compare_with_threshold, ImageDiff};
pub use config::CompareConfig;
pub use error::{CompareError, Result};
pub use grid::{
    compare_grid_documents, compare_grids, GridCell, GridDocument, GridRow, GRID_INCOMPARABLE,
};
pub use pixel::{compare_pixels, pack_rgba, unpack_rgba, PackedPixel, DEFAULT_PIXEL_THRESHOLD};
pub use raster::RasterImage;
pub use snapshot::{Snapshot, SnapshotStatus};
pub use suite::{CaseKind, CaseResult, Outcome, Suite, SuiteSummary};
