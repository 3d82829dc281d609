//! Categorical label encoding.
//!
//! [`ClassDict`] is the bijective mapping between discrete class labels
//! and fixed-length one-hot codes. A dictionary is built once, either
//! fitted from an observed label column or assembled from explicit pairs,
//! and is immutable afterwards, so it can be shared by reference across
//! encode and decode calls.

use std::cmp::Ordering;
use std::fmt;

use ndarray::{Array2, ArrayView2};

use crate::error::DataError;

/// Types usable as class labels.
///
/// Labels are compared for identity with `PartialEq`, ordered with
/// `PartialOrd` to fix the class index assignment, and displayed in error
/// messages. Key homogeneity within one dictionary is a compile-time
/// property of the type parameter.
pub trait Label: Clone + PartialEq + PartialOrd + fmt::Display {}

impl Label for f64 {}
impl Label for f32 {}
impl Label for i64 {}
impl Label for i32 {}
impl Label for u32 {}
impl Label for String {}
impl Label for &str {}

/// A bijective mapping between class labels and one-hot codes.
///
/// `labels[i]` owns basis position `i`: its code is the length-m vector
/// with a 1 at index i and 0 elsewhere, m being the number of classes.
/// Fitted dictionaries order labels ascending, so the mapping is
/// reproducible for a given label set; downstream column semantics depend
/// on that.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDict<L> {
    labels: Vec<L>,
}

impl<L: Label> ClassDict<L> {
    /// Build a dictionary from an observed label column.
    ///
    /// Distinct values are sorted ascending by natural ordering (numeric
    /// order for numeric labels, lexicographic for strings) and assigned
    /// class indices 0..m-1 in that order.
    ///
    /// # Example
    ///
    /// ```
    /// use tabstream::ClassDict;
    ///
    /// let dict = ClassDict::fit(&[3_i64, 1, 2, 1]);
    /// assert_eq!(dict.n_classes(), 3);
    /// assert_eq!(dict.labels(), &[1, 2, 3]);
    /// ```
    pub fn fit(labels: &[L]) -> Self {
        let mut distinct: Vec<L> = Vec::new();
        for label in labels {
            if !distinct.contains(label) {
                distinct.push(label.clone());
            }
        }
        distinct.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        Self { labels: distinct }
    }

    /// Assemble a dictionary from explicit label to code pairs.
    ///
    /// The codes must form a standard basis: equal lengths, exactly one 1
    /// per code, no shared positions, no repeated labels.
    ///
    /// # Errors
    ///
    /// [`DataError::EmptyDictionary`], [`DataError::CodeLengthMismatch`],
    /// [`DataError::CodeNotOneHot`], [`DataError::DuplicateCode`], or
    /// [`DataError::DuplicateLabel`] when the pairs violate an invariant.
    pub fn from_pairs(pairs: Vec<(L, Vec<f64>)>) -> Result<Self, DataError> {
        if pairs.is_empty() {
            return Err(DataError::EmptyDictionary);
        }
        let m = pairs.len();
        let mut slots: Vec<Option<L>> = vec![None; m];
        for (label, code) in pairs {
            if code.len() != m {
                return Err(DataError::CodeLengthMismatch {
                    label: label.to_string(),
                    expected: m,
                    got: code.len(),
                });
            }
            let mut hot = None;
            for (position, &value) in code.iter().enumerate() {
                if value == 1.0 {
                    if hot.is_some() {
                        return Err(DataError::CodeNotOneHot(label.to_string()));
                    }
                    hot = Some(position);
                } else if value != 0.0 {
                    return Err(DataError::CodeNotOneHot(label.to_string()));
                }
            }
            let Some(hot) = hot else {
                return Err(DataError::CodeNotOneHot(label.to_string()));
            };
            if slots.iter().flatten().any(|seen| seen == &label) {
                return Err(DataError::DuplicateLabel(label.to_string()));
            }
            if let Some(existing) = &slots[hot] {
                return Err(DataError::DuplicateCode(
                    existing.to_string(),
                    label.to_string(),
                ));
            }
            slots[hot] = Some(label);
        }
        let labels = slots
            .into_iter()
            .map(|slot| slot.expect("every slot filled by a distinct pair"))
            .collect();
        Ok(Self { labels })
    }

    /// Number of classes, equal to the one-hot code length.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    /// Labels in class-index order.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Class index for a label, if present.
    pub fn index_of(&self, label: &L) -> Option<usize> {
        self.labels.iter().position(|known| known == label)
    }

    /// Encode a label sequence into an n×m one-hot matrix.
    ///
    /// Accepts anything that iterates labels, so both a plain slice and a
    /// matrix column work. Row order is preserved.
    ///
    /// # Errors
    ///
    /// [`DataError::UnknownLabel`] on the first label absent from the
    /// dictionary.
    ///
    /// # Example
    ///
    /// ```
    /// use tabstream::ClassDict;
    ///
    /// let dict = ClassDict::fit(&["cat", "dog"]);
    /// let codes = dict.encode(&["cat", "dog", "dog"])?;
    /// assert_eq!(codes.row(1).to_vec(), vec![0.0, 1.0]);
    /// # Ok::<(), tabstream::DataError>(())
    /// ```
    pub fn encode<'a, I>(&self, y: I) -> Result<Array2<f64>, DataError>
    where
        L: 'a,
        I: IntoIterator<Item = &'a L>,
    {
        let mut indices = Vec::new();
        for label in y {
            let index = self
                .index_of(label)
                .ok_or_else(|| DataError::UnknownLabel(label.to_string()))?;
            indices.push(index);
        }
        let mut codes = Array2::zeros((indices.len(), self.n_classes()));
        for (row, index) in indices.into_iter().enumerate() {
            codes[[row, index]] = 1.0;
        }
        Ok(codes)
    }

    /// Decode an n×m score matrix back into labels.
    ///
    /// Rows need not be exact one-hot codes: each row selects the nearest
    /// code, i.e. the position of the row maximum, so soft scores from a
    /// model decode to their argmax class. Exact one-hot rows are the
    /// special case where the maximum is the single 1. Ties resolve to the
    /// lowest class index.
    ///
    /// # Errors
    ///
    /// [`DataError::CodeWidthMismatch`] if `y` has a different column
    /// count than the dictionary codes, [`DataError::EmptyDictionary`] if
    /// the dictionary has no classes.
    pub fn decode(&self, y: ArrayView2<'_, f64>) -> Result<Vec<L>, DataError> {
        let m = self.n_classes();
        if m == 0 {
            return Err(DataError::EmptyDictionary);
        }
        if y.ncols() != m {
            return Err(DataError::CodeWidthMismatch {
                expected: m,
                got: y.ncols(),
            });
        }
        let mut labels = Vec::with_capacity(y.nrows());
        for row in y.rows() {
            let mut best = 0usize;
            for (index, &value) in row.iter().enumerate() {
                if value > row[best] {
                    best = index;
                }
            }
            labels.push(self.labels[best].clone());
        }
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn fit_sorts_numeric_labels_ascending() {
        let dict = ClassDict::fit(&[3.0, 1.0, 2.0, 1.0]);
        assert_eq!(dict.labels(), &[1.0, 2.0, 3.0]);
        assert_eq!(dict.n_classes(), 3);
    }

    #[test]
    fn fit_sorts_string_labels_lexicographically() {
        let dict = ClassDict::fit(&["mouse", "cat", "dog", "cat"]);
        assert_eq!(dict.labels(), &["cat", "dog", "mouse"]);
    }

    #[test]
    fn fit_is_reproducible_across_permutations() {
        let a = ClassDict::fit(&[2_i64, 7, 5]);
        let b = ClassDict::fit(&[5_i64, 2, 7, 7, 2]);
        assert_eq!(a, b);
    }

    #[test]
    fn encode_stacks_codes_in_input_order() {
        let dict = ClassDict::from_pairs(vec![
            ("cat", vec![1.0, 0.0]),
            ("dog", vec![0.0, 1.0]),
        ])
        .unwrap();
        let codes = dict.encode(&["cat", "dog", "dog"]).unwrap();
        assert_eq!(codes, array![[1.0, 0.0], [0.0, 1.0], [0.0, 1.0]]);
    }

    #[test]
    fn encode_accepts_a_matrix_column() {
        let dict = ClassDict::fit(&[1.0, 2.0]);
        let column = array![[1.0], [2.0], [2.0]];
        let codes = dict.encode(column.column(0)).unwrap();
        assert_eq!(codes, array![[1.0, 0.0], [0.0, 1.0], [0.0, 1.0]]);
    }

    #[test]
    fn encode_rejects_unknown_labels() {
        let dict = ClassDict::fit(&["cat", "dog"]);
        let err = dict.encode(&["cat", "fox"]).unwrap_err();
        assert!(matches!(err, DataError::UnknownLabel(ref label) if label == "fox"));
    }

    #[test]
    fn decode_inverts_exact_codes() {
        let dict = ClassDict::fit(&[1.0, 2.0]);
        let codes = array![[1.0, 0.0], [0.0, 1.0], [0.0, 1.0]];
        assert_eq!(dict.decode(codes.view()).unwrap(), vec![1.0, 2.0, 2.0]);
    }

    #[test]
    fn decode_selects_nearest_code_for_soft_scores() {
        let dict = ClassDict::fit(&["cat", "dog", "mouse"]);
        let scores = array![[0.1, 0.7, 0.2], [0.5, 0.3, 0.2], [0.0, 0.1, 0.9]];
        assert_eq!(
            dict.decode(scores.view()).unwrap(),
            vec!["dog", "cat", "mouse"]
        );
    }

    #[test]
    fn decode_rejects_wrong_width() {
        let dict = ClassDict::fit(&[1.0, 2.0, 3.0]);
        let err = dict.decode(array![[1.0, 0.0]].view()).unwrap_err();
        assert!(matches!(
            err,
            DataError::CodeWidthMismatch {
                expected: 3,
                got: 2
            }
        ));
    }

    #[test]
    fn from_pairs_rejects_short_code() {
        let err = ClassDict::from_pairs(vec![
            ("cat", vec![1.0, 0.0]),
            ("dog", vec![1.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::CodeLengthMismatch { .. }));
    }

    #[test]
    fn from_pairs_rejects_non_one_hot_code() {
        let err = ClassDict::from_pairs(vec![
            ("cat", vec![1.0, 1.0]),
            ("dog", vec![0.0, 1.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::CodeNotOneHot(_)));

        let err = ClassDict::from_pairs(vec![
            ("cat", vec![0.5, 0.0]),
            ("dog", vec![0.0, 1.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::CodeNotOneHot(_)));
    }

    #[test]
    fn from_pairs_rejects_shared_position() {
        let err = ClassDict::from_pairs(vec![
            ("cat", vec![1.0, 0.0]),
            ("dog", vec![1.0, 0.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::DuplicateCode(..)));
    }

    #[test]
    fn from_pairs_rejects_repeated_label() {
        let err = ClassDict::from_pairs(vec![
            ("cat", vec![1.0, 0.0]),
            ("cat", vec![0.0, 1.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::DuplicateLabel(_)));
    }

    #[test]
    fn from_pairs_rejects_empty_input() {
        let err = ClassDict::<&str>::from_pairs(Vec::new()).unwrap_err();
        assert!(matches!(err, DataError::EmptyDictionary));
    }
}
