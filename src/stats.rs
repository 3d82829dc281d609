//! Per-column standardization statistics.

use ndarray::{Array1, ArrayView2, Axis};

/// Distinct values that mark a column as categorical, binary, or
/// sign-coded, and therefore exempt from standardization.
const PROTECTED_ALPHABET: [f64; 3] = [-1.0, 0.0, 1.0];

/// Column-wise mean and population standard deviation, with categorical
/// columns protected from standardization.
///
/// A column whose distinct values all lie in `{-1, 0, 1}` (which covers
/// one-hot, binary and sign encodings) reports mean 0 and std 1 regardless
/// of its true sample statistics, so the downstream `(x - mean) / std`
/// transform is the identity on it. Every other column reports its true
/// statistics.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use tabstream::mean_std;
///
/// let x = array![[0.0, 5.0], [1.0, 7.0]];
/// let (mean, std) = mean_std(x.view());
/// assert_eq!(mean[0], 0.0); // binary column, protected
/// assert_eq!(std[0], 1.0);
/// assert_eq!(mean[1], 6.0);
/// assert_eq!(std[1], 1.0); // population std of {5, 7}
/// ```
pub fn mean_std(x: ArrayView2<'_, f64>) -> (Array1<f64>, Array1<f64>) {
    let n_features = x.ncols();
    if x.nrows() == 0 {
        return (Array1::zeros(n_features), Array1::ones(n_features));
    }
    let mut mean = x.mean_axis(Axis(0)).expect("rows are non-empty");
    let mut std = x.std_axis(Axis(0), 0.0);
    for (feature, column) in x.axis_iter(Axis(1)).enumerate() {
        if column.iter().all(|value| PROTECTED_ALPHABET.contains(value)) {
            mean[feature] = 0.0;
            std[feature] = 1.0;
        }
    }
    (mean, std)
}
