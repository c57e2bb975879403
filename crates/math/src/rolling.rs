//! Trailing-window and compounding helpers over monthly series.

use crate::{mean, sample_std};

/// Trailing mean requiring `window` consecutive defined values.
///
/// Output position `i` is `None` until positions `i + 1 - window ..= i` are all
/// defined and finite.
#[must_use]
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let defined: Option<Vec<f64>> =
                slice.iter().map(|v| v.filter(|x| x.is_finite())).collect();
            defined.and_then(|v| mean(&v))
        })
        .collect()
}

/// First difference; the first value is always `None`.
#[must_use]
pub fn diff(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(None);
    for pair in values.windows(2) {
        out.push(match (pair[0], pair[1]) {
            (Some(prev), Some(curr)) => Some(curr - prev),
            _ => None,
        });
    }
    out
}

/// Geometrically compounded return of a series: `prod(1 + r) - 1`.
#[must_use]
pub fn compound(returns: &[f64]) -> f64 {
    returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0
}

/// Running product of `1 + r`, starting from the first period.
#[must_use]
pub fn cumulative_product(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |growth, r| {
            *growth *= 1.0 + r;
            Some(*growth)
        })
        .collect()
}

/// Compounded return over each trailing window; `None` for the first `window - 1` points.
#[must_use]
pub fn rolling_compound(returns: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..returns.len())
        .map(|i| (window > 0 && i + 1 >= window).then(|| compound(&returns[i + 1 - window..=i])))
        .collect()
}

/// Sample standard deviation over each trailing window.
#[must_use]
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                None
            } else {
                sample_std(&values[i + 1 - window..=i])
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn rolling_mean_needs_consecutive_values() {
        let v = [None, Some(1.0), Some(2.0), Some(3.0), None, Some(5.0), Some(6.0), Some(7.0)];
        let out = rolling_mean(&v, 3);

        assert_eq!(out[2], None);
        assert_eq!(out[3], Some(2.0));
        assert_eq!(out[4], None);
        assert_eq!(out[6], None);
        assert_eq!(out[7], Some(6.0));
    }

    #[test]
    fn diff_first_value_undefined() {
        let out = diff(&[None, Some(1.0), Some(4.0), Some(2.0)]);
        assert_eq!(out, vec![None, None, Some(3.0), Some(-2.0)]);
        assert!(diff(&[]).is_empty());
    }

    #[test]
    fn compounding() {
        let r = [0.1, -0.1, 0.05];
        assert_relative_eq!(compound(&r), 1.1 * 0.9 * 1.05 - 1.0, epsilon = 1e-12);

        let cum = cumulative_product(&r);
        assert_relative_eq!(cum[0], 1.1, epsilon = 1e-12);
        assert_relative_eq!(cum[2], 1.1 * 0.9 * 1.05, epsilon = 1e-12);
    }

    #[rstest]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(3, 2)]
    fn rolling_windows_leading_none(#[case] window: usize, #[case] leading: usize) {
        let r = [0.01, 0.02, 0.03, 0.04];
        let out = rolling_compound(&r, window);
        assert_eq!(out.iter().take_while(|v| v.is_none()).count(), leading);
        assert_eq!(out.len(), r.len());
    }

    #[test]
    fn rolling_std_window() {
        let v = [1.0, 2.0, 3.0, 4.0];
        let out = rolling_std(&v, 2);
        assert_eq!(out[0], None);
        assert_relative_eq!(out[1].unwrap(), 0.5_f64.sqrt(), epsilon = 1e-12);
        assert!(rolling_std(&v, 1).iter().all(Option::is_none));
    }
}
