//! Input source resolution and delimited-text parsing.
//!
//! [`DataSource`] is the tagged union over the input shapes the batchers
//! accept: a 1-D column, an in-memory row list or matrix, or a path to a
//! delimited text file. Resolution happens once at this boundary; all
//! downstream code operates on `Array2<f64>` in sample-major layout
//! (`[n_samples, n_features]`, one row per sample) or on the streaming
//! [`RowReader`].
//!
//! # File format
//!
//! Plain text, one sample per line, values separated by a [`Delimiter`].
//! No header row. Blank lines are skipped. Every data line must parse to
//! the same column count as the first one.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use log::debug;
use ndarray::{Array1, Array2};

use crate::error::DataError;

// =============================================================================
// Delimiter
// =============================================================================

/// Token separator for text data files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    /// Any run of whitespace.
    #[default]
    Whitespace,
    /// A single separator character, e.g. `,`.
    Char(char),
}

impl Delimiter {
    /// Split one line into raw tokens.
    ///
    /// Under `Char` splitting the tokens are trimmed and a trailing empty
    /// token (separator at end of line) is dropped.
    fn tokens<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Whitespace => line.split_whitespace().collect(),
            Delimiter::Char(c) => {
                let mut tokens: Vec<&str> = line.split(*c).map(str::trim).collect();
                if tokens.last() == Some(&"") {
                    tokens.pop();
                }
                tokens
            }
        }
    }

    /// Parse one line into numeric values.
    pub(crate) fn parse_row(&self, line: &str, line_no: usize) -> Result<Vec<f64>, DataError> {
        self.tokens(line)
            .into_iter()
            .map(|token| {
                token.parse::<f64>().map_err(|_| DataError::InvalidToken {
                    line: line_no,
                    token: token.to_string(),
                })
            })
            .collect()
    }
}

// =============================================================================
// DataSource
// =============================================================================

/// An input descriptor accepted by the batchers.
///
/// Construction is usually implicit through the `From` impls, so call
/// sites read `batch_features(vec![1.0, 2.0], ..)` for in-memory data or
/// `batch_features("iris.txt", ..)` for a file. Strings convert to file
/// paths.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A 1-D sequence, resolved to an n×1 matrix.
    Column(Array1<f64>),
    /// An in-memory row list. Must be rectangular.
    Rows(Vec<Vec<f64>>),
    /// A matrix used as-is.
    Matrix(Array2<f64>),
    /// A delimited text file, parsed lazily line by line.
    File(PathBuf),
}

impl DataSource {
    /// Materialize the source into a full sample-major matrix.
    ///
    /// This is the eager path for callers that need the whole matrix at
    /// once, e.g. to feed [`crate::stats::mean_std`]. The batchers use the
    /// streaming path internally so file sources are never fully
    /// materialized ahead of consumption.
    ///
    /// # Errors
    ///
    /// Any parse or I/O error from the underlying source.
    pub fn into_matrix(self, delimiter: Delimiter) -> Result<Array2<f64>, DataError> {
        match self.into_reader(delimiter)? {
            SourceReader::Memory(matrix) => Ok(matrix),
            SourceReader::File(mut rows) => {
                let n_cols = rows.n_cols();
                let mut data = Vec::new();
                let mut n_rows = 0usize;
                while let Some(row) = rows.next_row()? {
                    data.extend_from_slice(&row);
                    n_rows += 1;
                }
                debug!("materialized {} rows of {} columns", n_rows, n_cols);
                Ok(Array2::from_shape_vec((n_rows, n_cols), data)
                    .expect("row reader yields fixed-width rows"))
            }
        }
    }

    /// Resolve into either an in-memory matrix or a streaming file reader.
    pub(crate) fn into_reader(self, delimiter: Delimiter) -> Result<SourceReader, DataError> {
        match self {
            DataSource::Column(column) => {
                let n = column.len();
                let matrix = column
                    .into_shape_with_order((n, 1))
                    .expect("length-n column reshapes to n×1");
                Ok(SourceReader::Memory(matrix))
            }
            DataSource::Rows(rows) => Ok(SourceReader::Memory(rows_to_matrix(rows)?)),
            DataSource::Matrix(matrix) => Ok(SourceReader::Memory(matrix)),
            DataSource::File(path) => Ok(SourceReader::File(RowReader::open(&path, delimiter)?)),
        }
    }
}

impl From<Vec<f64>> for DataSource {
    fn from(values: Vec<f64>) -> Self {
        DataSource::Column(Array1::from(values))
    }
}

impl From<&[f64]> for DataSource {
    fn from(values: &[f64]) -> Self {
        DataSource::Column(Array1::from(values.to_vec()))
    }
}

impl From<Array1<f64>> for DataSource {
    fn from(column: Array1<f64>) -> Self {
        DataSource::Column(column)
    }
}

impl From<Vec<Vec<f64>>> for DataSource {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        DataSource::Rows(rows)
    }
}

impl From<Array2<f64>> for DataSource {
    fn from(matrix: Array2<f64>) -> Self {
        DataSource::Matrix(matrix)
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        DataSource::File(path)
    }
}

impl From<&Path> for DataSource {
    fn from(path: &Path) -> Self {
        DataSource::File(path.to_path_buf())
    }
}

impl From<&str> for DataSource {
    fn from(path: &str) -> Self {
        DataSource::File(PathBuf::from(path))
    }
}

impl From<String> for DataSource {
    fn from(path: String) -> Self {
        DataSource::File(PathBuf::from(path))
    }
}

/// Validate a row list as rectangular and pack it into a matrix.
fn rows_to_matrix(rows: Vec<Vec<f64>>) -> Result<Array2<f64>, DataError> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    let mut data = Vec::with_capacity(n_rows * n_cols);
    for (row_idx, row) in rows.iter().enumerate() {
        if row.len() != n_cols {
            return Err(DataError::RowWidthMismatch {
                row: row_idx,
                expected: n_cols,
                got: row.len(),
            });
        }
        data.extend_from_slice(row);
    }
    Ok(Array2::from_shape_vec((n_rows, n_cols), data).expect("rows validated rectangular"))
}

// =============================================================================
// Streaming file reader
// =============================================================================

/// A resolved source: either fully in memory or streamed from a file.
#[derive(Debug)]
pub(crate) enum SourceReader {
    Memory(Array2<f64>),
    File(RowReader),
}

/// Streaming reader over the rows of a delimited text file.
///
/// The first data row is parsed eagerly at open time to fix the column
/// count; subsequent rows are pulled one at a time, so a file larger than
/// memory is never fully materialized. Dropping the reader closes the
/// underlying file.
#[derive(Debug)]
pub(crate) struct RowReader {
    lines: Lines<BufReader<File>>,
    delimiter: Delimiter,
    n_cols: usize,
    line_no: usize,
    peeked: Option<Vec<f64>>,
}

impl RowReader {
    pub(crate) fn open(path: &Path, delimiter: Delimiter) -> Result<Self, DataError> {
        let file = File::open(path)?;
        let mut lines = BufReader::new(file).lines();
        let mut line_no = 0usize;
        // The width of the first data row fixes the schema for the rest of
        // the file.
        let first = loop {
            match lines.next() {
                Some(line) => {
                    let line = line?;
                    line_no += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    break delimiter.parse_row(&line, line_no)?;
                }
                None => {
                    return Err(DataError::EmptyFile {
                        path: path.to_path_buf(),
                    })
                }
            }
        };
        let n_cols = first.len();
        debug!("{}: {} columns per row", path.display(), n_cols);
        Ok(Self {
            lines,
            delimiter,
            n_cols,
            line_no,
            peeked: Some(first),
        })
    }

    /// Column count, known from the first data row.
    pub(crate) fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Parse and return the next data row, or `None` at end of file.
    pub(crate) fn next_row(&mut self) -> Result<Option<Vec<f64>>, DataError> {
        if let Some(row) = self.peeked.take() {
            return Ok(Some(row));
        }
        loop {
            let Some(line) = self.lines.next() else {
                return Ok(None);
            };
            let line = line?;
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let row = self.delimiter.parse_row(&line, self.line_no)?;
            if row.len() != self.n_cols {
                return Err(DataError::ColumnMismatch {
                    line: self.line_no,
                    expected: self.n_cols,
                    got: row.len(),
                });
            }
            return Ok(Some(row));
        }
    }
}
