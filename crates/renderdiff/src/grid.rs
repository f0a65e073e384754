//! UTF-grid document comparison.
//!
//! A grid document is the JSON emitted by the UTF-grid tile renderer:
//!
//! ```json
//! { "data": { "1": { "name": "Canada" } },
//!   "keys": ["", "1"],
//!   "grid": ["  !!", "  !!"] }
//! ```
//!
//! Rows may also be arrays of JSON values, e.g. `[["x", "y"], ["z", "w"]]`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::{CompareError, Result};

/// Returned by the grid comparators when two documents cannot be compared
/// cell by cell (different `data`, `keys` or dimensions).
pub const GRID_INCOMPARABLE: u64 = 99_999_999;

const INLINE_ORIGIN: &str = "<inline>";

/// One row of a grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GridRow {
    /// A string whose characters are the cells.
    Text(String),
    /// An array of arbitrary JSON cells.
    Cells(Vec<Value>),
}

impl GridRow {
    /// Number of cells in the row.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(s) => s.chars().count(),
            Self::Cells(cells) => cells.len(),
        }
    }

    /// True when the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells in column order.
    pub fn cells(&self) -> Vec<GridCell<'_>> {
        match self {
            Self::Text(s) => s.chars().map(GridCell::Char).collect(),
            Self::Cells(cells) => cells.iter().map(GridCell::Value).collect(),
        }
    }
}

/// A single grid cell, borrowed from its row.
#[derive(Debug, Clone, Copy)]
pub enum GridCell<'a> {
    Char(char),
    Value(&'a Value),
}

impl PartialEq for GridCell<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Value(a), Self::Value(b)) => json_eq(a, b),
            (Self::Char(c), Self::Value(v)) | (Self::Value(v), Self::Char(c)) => {
                single_char(v) == Some(*c)
            }
        }
    }
}

/// Structural equality where numbers compare by value, so `1` equals `1.0`.
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            x == y || matches!((x.as_f64(), y.as_f64()), (Some(x), Some(y)) if x == y)
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| json_eq(x, y)))
        }
        _ => a == b,
    }
}

fn single_char(value: &Value) -> Option<char> {
    let mut chars = value.as_str()?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// A decoded grid document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridDocument {
    pub data: Value,
    pub keys: Value,
    pub grid: Vec<GridRow>,
    #[serde(skip)]
    origin: PathBuf,
}

impl GridDocument {
    /// Build a document in memory.
    pub fn new(data: Value, keys: Value, grid: Vec<GridRow>) -> Self {
        Self {
            data,
            keys,
            grid,
            origin: PathBuf::from(INLINE_ORIGIN),
        }
    }

    /// Read and decode a document from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CompareError::io(path, e))?;
        Self::parse(&text, path)
    }

    /// Decode a document, attributing errors to `origin`.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|source| CompareError::Json {
            path: origin.to_path_buf(),
            source,
        })?;
        Self::from_value(value, origin)
    }

    /// Pull the three fields out of an already parsed JSON value.
    pub fn from_value(mut value: Value, origin: &Path) -> Result<Self> {
        let mut take = |field: &'static str| {
            value
                .get_mut(field)
                .map(Value::take)
                .ok_or_else(|| CompareError::MissingField {
                    path: origin.to_path_buf(),
                    field,
                })
        };
        let data = take("data")?;
        let keys = take("keys")?;
        let grid = take("grid")?;

        let invalid = |reason: String| CompareError::InvalidGrid {
            path: origin.to_path_buf(),
            reason,
        };
        let rows = match grid {
            Value::Array(rows) => rows,
            other => {
                return Err(invalid(format!(
                    "expected an array of rows, found {}",
                    kind(&other)
                )))
            }
        };
        let grid = rows
            .into_iter()
            .enumerate()
            .map(|(y, row)| match row {
                Value::String(s) => Ok(GridRow::Text(s)),
                Value::Array(cells) => Ok(GridRow::Cells(cells)),
                other => Err(invalid(format!("row {y} is {}", kind(&other)))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            data,
            keys,
            grid,
            origin: origin.to_path_buf(),
        })
    }

    /// Where the document was read from.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.grid.len()
    }

    /// Cell count of the first row, or `None` for an empty grid.
    pub fn width(&self) -> Option<usize> {
        self.grid.first().map(GridRow::len)
    }
}

impl FromStr for GridDocument {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, Path::new(INLINE_ORIGIN))
    }
}

impl fmt::Display for GridDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Compare two grid files and return the number of differing cells.
///
/// `threshold` and `include_alpha` are accepted so grid and image checks
/// share a call shape; neither affects the result.
///
/// Returns [`GRID_INCOMPARABLE`] when `data`, `keys`, the first-row width or
/// the row count differ. See [`compare_grid_documents`] for the cell scan.
pub fn compare_grids(
    actual: impl AsRef<Path>,
    expected: impl AsRef<Path>,
    _threshold: u64,
    _include_alpha: bool,
) -> Result<u64> {
    let im1 = GridDocument::open(actual)?;
    let im2 = GridDocument::open(expected)?;
    compare_grid_documents(&im1, &im2)
}

/// Compare two decoded grid documents.
///
/// Only rows `0..height - 1` are scanned: the last row never contributes to
/// the count. Within a row, cells are compared up to the shorter row's
/// length and the length difference itself is not counted.
///
/// An empty grid is an error ([`CompareError::EmptyGrid`]) because its width
/// is undefined; it is only reached once `data` and `keys` have matched.
pub fn compare_grid_documents(actual: &GridDocument, expected: &GridDocument) -> Result<u64> {
    if !json_eq(&actual.data, &expected.data) {
        log::warn!("{}: grid data differs", actual.origin.display());
        return Ok(GRID_INCOMPARABLE);
    }
    if !json_eq(&actual.keys, &expected.keys) {
        log::warn!("{}: grid keys differ", actual.origin.display());
        return Ok(GRID_INCOMPARABLE);
    }

    let empty = |doc: &GridDocument| CompareError::EmptyGrid {
        path: doc.origin.clone(),
    };
    let width1 = actual.width().ok_or_else(|| empty(actual))?;
    let width2 = expected.width().ok_or_else(|| empty(expected))?;
    if width1 != width2 {
        log::warn!(
            "{}: grid width {width1} != {width2}",
            actual.origin.display()
        );
        return Ok(GRID_INCOMPARABLE);
    }

    let height1 = actual.height();
    let height2 = expected.height();
    if height1 != height2 {
        log::warn!(
            "{}: grid height {height1} != {height2}",
            actual.origin.display()
        );
        return Ok(GRID_INCOMPARABLE);
    }

    let mut diff = 0u64;
    for (row1, row2) in actual.grid.iter().zip(&expected.grid).take(height1 - 1) {
        diff += row1
            .cells()
            .iter()
            .zip(row2.cells().iter())
            .filter(|(a, b)| a != b)
            .count() as u64;
    }

    log::debug!("{}: {diff} differing cells", actual.origin.display());
    Ok(diff)
}
