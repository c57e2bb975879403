//! Sample statistics.

use ndarray::ArrayView1;

/// Standard deviation below which a series is treated as constant.
pub const DEGENERATE_STD: f64 = 1e-12;

/// Arithmetic mean; `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator); `None` below two observations.
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    Some(variance.sqrt())
}

/// Pearson correlation between two equally long series.
///
/// Returns `None` when the correlation is undefined: fewer than two
/// observations, mismatched lengths, a non-finite input, or either series
/// with standard deviation at or below [`DEGENERATE_STD`].
#[must_use]
pub fn correlation(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Option<f64> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let mx = x.sum() / n as f64;
    let my = y.sum() / n as f64;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mx;
        let dy = b - my;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    let dof = n as f64 - 1.0;
    if (sxx / dof).sqrt() <= DEGENERATE_STD || (syy / dof).sqrt() <= DEGENERATE_STD {
        return None;
    }

    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then_some(r)
}
