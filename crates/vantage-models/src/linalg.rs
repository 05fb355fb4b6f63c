//! Ridge regression via normal equations.

/// Coefficients `[intercept, w1, …, wp]` minimising
/// `Σ (y − Xw)² + λ Σ wj²` (intercept unpenalised).
///
/// Returns `None` when the system is singular.
pub fn ridge_fit(rows: &[Vec<f64>], targets: &[f64], lambda: f64) -> Option<Vec<f64>> {
    let p = rows.first()?.len() + 1;
    let mut a = vec![vec![0.0; p]; p];
    let mut b = vec![0.0; p];

    for (row, &y) in rows.iter().zip(targets) {
        let x: Vec<f64> = std::iter::once(1.0).chain(row.iter().copied()).collect();
        for i in 0..p {
            b[i] += x[i] * y;
            for j in 0..p {
                a[i][j] += x[i] * x[j];
            }
        }
    }
    for (i, row) in a.iter_mut().enumerate().skip(1) {
        row[i] += lambda;
    }
    solve(a, b)
}

/// Dot product of `[intercept, weights…]` with `[1, x…]`.
pub fn predict_linear(coefficients: &[f64], x: &[f64]) -> f64 {
    match coefficients.split_first() {
        Some((intercept, weights)) => {
            intercept + weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>()
        }
        None => 0.0,
    }
}

/// Coefficient of determination. 1.0 when targets are constant and fit exactly.
pub fn r_squared(targets: &[f64], fitted: &[f64]) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }
    let mean = targets.iter().sum::<f64>() / targets.len() as f64;
    let ss_tot: f64 = targets.iter().map(|y| (y - mean) * (y - mean)).sum();
    let ss_res: f64 = targets
        .iter()
        .zip(fitted)
        .map(|(y, f)| (y - f) * (y - f))
        .sum();
    if ss_tot <= f64::EPSILON {
        return if ss_res <= f64::EPSILON { 1.0 } else { 0.0 };
    }
    (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}
