//! tabstream: streaming ingestion and encoding of tabular datasets.
//!
//! This crate sits between raw data sources and a numeric learner that
//! consumes fixed-shape matrices. Inputs may be in-memory 1-D sequences,
//! row lists, matrices, or paths to delimited text files; all of them
//! resolve into a canonical sample-major matrix form and are served as a
//! lazy sequence of row chunks, so datasets larger than memory stream in
//! fixed-size batches.
//!
//! # Key Operations
//!
//! - [`batch_features`] - resolve X, append the bias column, chunk
//! - [`batch_targets`] / [`batch_classes`] - chunk numeric or one-hot targets
//! - [`ClassDict`] - fit, encode, and decode categorical labels
//! - [`mean_std`] - standardization statistics with categorical protection
//!
//! # Batching
//!
//! ```
//! use tabstream::{batch_features, BatchConfig};
//!
//! let (chunks, n_inputs) = batch_features(vec![1.0, 2.0, 3.0], BatchConfig::new())?;
//! assert_eq!(n_inputs, 1);
//! for chunk in chunks {
//!     let chunk = chunk?;
//!     assert_eq!(chunk.ncols(), 2); // value column + bias column
//! }
//! # Ok::<(), tabstream::DataError>(())
//! ```
//!
//! # Classification targets
//!
//! ```
//! use tabstream::{batch_classes, BatchConfig, ClassDict};
//!
//! let labels = ["cat", "cat", "dog", "mouse"];
//! let dict = ClassDict::fit(&labels);
//! let (chunks, n_targets) = batch_classes(&labels, &dict, BatchConfig::new())?;
//! assert_eq!(n_targets, 3);
//! # let _ = chunks;
//! # Ok::<(), tabstream::DataError>(())
//! ```

pub mod batch;
pub mod encoding;
pub mod error;
pub mod source;
pub mod stats;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use batch::{batch_classes, batch_features, batch_targets, BatchConfig, Batches};
pub use encoding::{ClassDict, Label};
pub use error::DataError;
pub use source::{DataSource, Delimiter};
pub use stats::mean_std;
