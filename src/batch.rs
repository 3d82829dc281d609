//! Chunked batch production.
//!
//! [`batch_features`] and the two target batchers resolve an input source
//! and expose it as a lazy sequence of fixed-size row chunks. The sequence
//! is pull-based and single-pass: each chunk materializes inside
//! [`Iterator::next`], file I/O included, and a fresh pass requires
//! invoking the batcher again on the original descriptor.
//!
//! A learning routine consumes X and Y batchers in lock-step: same chunk
//! size, same number of chunks, rows aligned index for index.

use ndarray::{s, Array2};

use crate::encoding::{ClassDict, Label};
use crate::error::DataError;
use crate::source::{DataSource, Delimiter, RowReader, SourceReader};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a batching pass.
///
/// The default serves the entire dataset as one chunk and splits file
/// lines on whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchConfig {
    batch: Option<usize>,
    delimiter: Delimiter,
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows per chunk. Unset means the entire dataset arrives as one chunk.
    pub fn batch(mut self, rows: usize) -> Self {
        self.batch = Some(rows);
        self
    }

    /// Token separator for file sources. Ignored for in-memory sources.
    pub fn delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn chunk_rows(&self) -> Result<Option<usize>, DataError> {
        match self.batch {
            Some(0) => Err(DataError::InvalidBatchSize),
            other => Ok(other),
        }
    }
}

// =============================================================================
// Batch iterator
// =============================================================================

/// Lazy sequence of row chunks over a resolved source.
///
/// Yields `Result<Array2<f64>, DataError>`. In-memory sources cannot fail
/// after construction; file sources surface parse and I/O errors at the
/// failing chunk, after which the sequence ends. Chunks cover the source
/// rows exactly once, in original order, each `batch` rows tall except a
/// shorter final chunk. Dropping the iterator mid-pass closes the
/// underlying file.
#[derive(Debug)]
pub struct Batches {
    inner: Inner,
    chunk_rows: Option<usize>,
    bias: bool,
}

#[derive(Debug)]
enum Inner {
    Memory { data: Array2<f64>, pos: usize },
    File { rows: RowReader, done: bool },
}

impl Iterator for Batches {
    type Item = Result<Array2<f64>, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Memory { data, pos } => {
                let n_rows = data.nrows();
                if *pos >= n_rows {
                    return None;
                }
                let take = self.chunk_rows.unwrap_or(n_rows).min(n_rows - *pos);
                let chunk = data.slice(s![*pos..*pos + take, ..]).to_owned();
                *pos += take;
                Some(Ok(chunk))
            }
            Inner::File { rows, done } => {
                if *done {
                    return None;
                }
                let width = rows.n_cols() + usize::from(self.bias);
                let mut buffer: Vec<f64> = Vec::new();
                let mut n_rows = 0usize;
                while self.chunk_rows.map_or(true, |limit| n_rows < limit) {
                    match rows.next_row() {
                        Ok(Some(row)) => {
                            buffer.extend_from_slice(&row);
                            if self.bias {
                                buffer.push(1.0);
                            }
                            n_rows += 1;
                        }
                        Ok(None) => {
                            *done = true;
                            break;
                        }
                        Err(err) => {
                            *done = true;
                            return Some(Err(err));
                        }
                    }
                }
                if n_rows == 0 {
                    return None;
                }
                let chunk = Array2::from_shape_vec((n_rows, width), buffer)
                    .expect("reader yields fixed-width rows");
                Some(Ok(chunk))
            }
        }
    }
}

// =============================================================================
// Batchers
// =============================================================================

/// Batch a feature source: resolve it, append the bias column, chunk it.
///
/// Returns the chunk sequence and the input feature count, bias column
/// excluded. Every chunk is one column wider than the source.
///
/// # Errors
///
/// [`DataError::InvalidBatchSize`] for a zero batch size, plus any
/// resolution error from the source. For file sources, parse errors past
/// the first row surface from the iterator at the failing chunk instead.
///
/// # Example
///
/// ```
/// use tabstream::{batch_features, BatchConfig};
///
/// let (chunks, n_inputs) = batch_features(vec![1.0, 2.0, 3.0], BatchConfig::new())?;
/// let matrix = chunks.collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(n_inputs, 1);
/// assert_eq!(matrix[0].shape(), &[3, 2]); // value column + bias column
/// # Ok::<(), tabstream::DataError>(())
/// ```
pub fn batch_features(
    x: impl Into<DataSource>,
    config: BatchConfig,
) -> Result<(Batches, usize), DataError> {
    let chunk_rows = config.chunk_rows()?;
    let source: DataSource = x.into();
    let (inner, n_inputs) = match source.into_reader(config.delimiter)? {
        SourceReader::Memory(data) => {
            let n_inputs = data.ncols();
            let inner = Inner::Memory {
                data: append_bias(data),
                pos: 0,
            };
            (inner, n_inputs)
        }
        SourceReader::File(rows) => {
            let n_inputs = rows.n_cols();
            (Inner::File { rows, done: false }, n_inputs)
        }
    };
    Ok((
        Batches {
            inner,
            chunk_rows,
            bias: true,
        },
        n_inputs,
    ))
}

/// Batch a regression target source.
///
/// Resolution matches [`batch_features`] except that no bias column is
/// appended: 1-D input becomes an n×1 column. Returns the chunk sequence
/// and the target column count.
///
/// # Errors
///
/// Same conditions as [`batch_features`].
pub fn batch_targets(
    y: impl Into<DataSource>,
    config: BatchConfig,
) -> Result<(Batches, usize), DataError> {
    let chunk_rows = config.chunk_rows()?;
    let source: DataSource = y.into();
    let (inner, n_targets) = match source.into_reader(config.delimiter)? {
        SourceReader::Memory(data) => {
            let n_targets = data.ncols();
            (Inner::Memory { data, pos: 0 }, n_targets)
        }
        SourceReader::File(rows) => {
            let n_targets = rows.n_cols();
            (Inner::File { rows, done: false }, n_targets)
        }
    };
    Ok((
        Batches {
            inner,
            chunk_rows,
            bias: false,
        },
        n_targets,
    ))
}

/// Batch a classification target: encode every label through `dict` into
/// an n×m one-hot matrix and chunk it like [`batch_targets`].
///
/// Returns the chunk sequence and m, the one-hot code length.
///
/// # Errors
///
/// [`DataError::UnknownLabel`] if any label is absent from the dictionary,
/// [`DataError::InvalidBatchSize`] for a zero batch size.
pub fn batch_classes<L: Label>(
    y: &[L],
    dict: &ClassDict<L>,
    config: BatchConfig,
) -> Result<(Batches, usize), DataError> {
    let chunk_rows = config.chunk_rows()?;
    let codes = dict.encode(y)?;
    Ok((
        Batches {
            inner: Inner::Memory {
                data: codes,
                pos: 0,
            },
            chunk_rows,
            bias: false,
        },
        dict.n_classes(),
    ))
}

/// Append a trailing column of 1s to every row.
fn append_bias(data: Array2<f64>) -> Array2<f64> {
    let n_cols = data.ncols();
    let mut augmented = Array2::ones((data.nrows(), n_cols + 1));
    augmented.slice_mut(s![.., ..n_cols]).assign(&data);
    augmented
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn bias_column_is_appended_to_every_row() {
        let augmented = append_bias(array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(augmented, array![[1.0, 2.0, 1.0], [3.0, 4.0, 1.0]]);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let err = batch_features(vec![1.0, 2.0], BatchConfig::new().batch(0)).unwrap_err();
        assert!(matches!(err, DataError::InvalidBatchSize));
    }

    #[test]
    fn default_config_serves_one_chunk() {
        let (chunks, n_inputs) =
            batch_features(vec![vec![1.0, 2.0], vec![3.0, 4.0]], BatchConfig::new()).unwrap();
        let chunks: Vec<_> = chunks.collect::<Result<_, _>>().unwrap();
        assert_eq!(n_inputs, 2);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], array![[1.0, 2.0, 1.0], [3.0, 4.0, 1.0]]);
    }

    #[test]
    fn memory_chunks_cover_rows_in_order() {
        let (chunks, _) = batch_features(
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            BatchConfig::new().batch(2),
        )
        .unwrap();
        let chunks: Vec<_> = chunks.collect::<Result<_, _>>().unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], array![[1.0, 1.0], [2.0, 1.0]]);
        assert_eq!(chunks[1], array![[3.0, 1.0], [4.0, 1.0]]);
        assert_eq!(chunks[2], array![[5.0, 1.0]]);
    }

    #[test]
    fn target_batches_have_no_bias_column() {
        let (chunks, n_targets) = batch_targets(vec![4.0, 5.0, 6.0], BatchConfig::new()).unwrap();
        let chunks: Vec<_> = chunks.collect::<Result<_, _>>().unwrap();
        assert_eq!(n_targets, 1);
        assert_eq!(chunks[0], array![[4.0], [5.0], [6.0]]);
    }

    #[test]
    fn class_batches_report_code_length() {
        let labels = [1_i64, 1, 2, 3];
        let dict = ClassDict::fit(&labels);
        let (chunks, n_targets) = batch_classes(&labels, &dict, BatchConfig::new()).unwrap();
        let chunks: Vec<_> = chunks.collect::<Result<_, _>>().unwrap();
        assert_eq!(n_targets, 3);
        assert_eq!(chunks[0].nrows(), 4);
        for row in chunks[0].rows() {
            assert_eq!(row.sum(), 1.0);
        }
    }

    #[test]
    fn empty_memory_source_yields_no_chunks() {
        let (mut chunks, n_inputs) =
            batch_features(Vec::<f64>::new(), BatchConfig::new().batch(3)).unwrap();
        assert_eq!(n_inputs, 1);
        assert!(chunks.next().is_none());
    }
}
