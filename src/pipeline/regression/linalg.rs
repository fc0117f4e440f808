//! Dense linear algebra helpers shared by the regression trainers

use faer::Mat;

/// Subtract the column means from `x`.
///
/// Returns the centered matrix and the means.
pub fn center_columns(x: &Mat<f64>) -> (Mat<f64>, Vec<f64>) {
    let (rows, cols) = (x.nrows(), x.ncols());
    let mut means = vec![0.0; cols];
    let mut centered = Mat::<f64>::zeros(rows, cols);
    if rows == 0 {
        return (centered, means);
    }

    for j in 0..cols {
        let mut sum = 0.0;
        for i in 0..rows {
            sum += x[(i, j)];
        }
        let mean = sum / rows as f64;
        means[j] = mean;
        for i in 0..rows {
            centered[(i, j)] = x[(i, j)] - mean;
        }
    }
    (centered, means)
}

/// Subtract the mean from `y`.
pub fn center(y: &[f64]) -> (Vec<f64>, f64) {
    if y.is_empty() {
        return (Vec::new(), 0.0);
    }
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    (y.iter().map(|v| v - mean).collect(), mean)
}

/// `v` as a one-column matrix.
pub fn column(v: &[f64]) -> Mat<f64> {
    Mat::from_fn(v.len(), 1, |i, _| v[i])
}

/// First column of `m` as a vector.
pub fn first_column(m: &Mat<f64>) -> Vec<f64> {
    (0..m.nrows()).map(|i| m[(i, 0)]).collect()
}

/// `X^T v`
pub fn transpose_times(x: &Mat<f64>, v: &[f64]) -> Vec<f64> {
    first_column(&(x.transpose() * column(v).as_ref()))
}

/// `X w + b`
pub fn affine(x: &Mat<f64>, w: &[f64], b: f64) -> Vec<f64> {
    let xw = x * &column(w);
    (0..x.nrows()).map(|i| xw[(i, 0)] + b).collect()
}

/// Rows of `x` at `indices`, in that order.
pub fn select_rows(x: &Mat<f64>, indices: &[usize]) -> Mat<f64> {
    let mut out = Mat::<f64>::zeros(indices.len(), x.ncols());
    for j in 0..x.ncols() {
        for (dst, &src) in indices.iter().enumerate() {
            out[(dst, j)] = x[(src, j)];
        }
    }
    out
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum::<f64>()
        / actual.len() as f64
}
