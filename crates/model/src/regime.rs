//! Sign-based four-regime classifier.

use polars::prelude::*;
use quadrant_primitives::{Regime, RegimeSeries};
use quadrant_traits::RegimeClassifier;
use tracing::debug;

use crate::{ModelError, PrincipalComponentSeries};

/// Two-by-two sign table over smoothed PC1 and PC2.
///
/// Strictly positive is the only positive branch; exactly zero falls on the
/// non-positive side. A missing or non-finite input yields no regime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadrantClassifier;

impl QuadrantClassifier {
    /// Create a new classifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RegimeClassifier for QuadrantClassifier {
    fn classify(
        &self,
        risk_appetite: Option<f64>,
        duration_demand: Option<f64>,
    ) -> Option<Regime> {
        let pc1 = risk_appetite.filter(|v| v.is_finite())?;
        let pc2 = duration_demand.filter(|v| v.is_finite())?;
        Some(Regime::from_signs(pc1 > 0.0, pc2 > 0.0))
    }

    fn name(&self) -> &str {
        "quadrant"
    }
}

/// Label every date of `series` from its smoothed scores.
///
/// # Errors
/// Returns `ModelError` if the series index is not strictly increasing.
pub fn classify_series<C: RegimeClassifier + ?Sized>(
    series: &PrincipalComponentSeries,
    classifier: &C,
) -> Result<RegimeSeries, ModelError> {
    let labels: Vec<Option<Regime>> = series
        .pc1_sma
        .iter()
        .zip(&series.pc2_sma)
        .map(|(a, b)| classifier.classify(*a, *b))
        .collect();

    let regimes = RegimeSeries::new(series.dates.clone(), labels)?;
    debug!(
        classifier = classifier.name(),
        dates = regimes.len(),
        defined = regimes.n_defined(),
        "classified regimes"
    );
    Ok(regimes)
}

/// Regime series as a DataFrame with `date`, `Regime` and `Risk_On` columns.
///
/// Undefined labels are null in `Regime` and `false` in `Risk_On`.
///
/// # Errors
/// Returns error if the frame cannot be assembled.
pub fn regimes_to_dataframe(regimes: &RegimeSeries) -> Result<DataFrame, ModelError> {
    let df = DataFrame::new(vec![
        Column::new("date".into(), regimes.dates().to_vec()),
        Column::new(
            "Regime".into(),
            regimes.labels().iter().map(|r| r.map(Regime::as_str)).collect::<Vec<_>>(),
        ),
        Column::new(
            "Risk_On".into(),
            regimes.labels().iter().map(|r| r.is_some_and(Regime::is_risk_on)).collect::<Vec<_>>(),
        ),
    ])?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some(0.5), Some(0.5), Some(Regime::Goldilocks))]
    #[case(Some(0.5), Some(-0.5), Some(Regime::Reflation))]
    #[case(Some(0.5), Some(0.0), Some(Regime::Reflation))]
    #[case(Some(-0.5), Some(0.5), Some(Regime::Recession))]
    #[case(Some(0.0), Some(0.5), Some(Regime::Recession))]
    #[case(Some(-0.5), Some(-0.5), Some(Regime::Stagflation))]
    #[case(Some(0.0), Some(0.0), Some(Regime::Stagflation))]
    #[case(None, Some(0.5), None)]
    #[case(Some(0.5), None, None)]
    #[case(Some(f64::NAN), Some(0.5), None)]
    fn decision_table(
        #[case] pc1: Option<f64>,
        #[case] pc2: Option<f64>,
        #[case] expected: Option<Regime>,
    ) {
        assert_eq!(QuadrantClassifier::new().classify(pc1, pc2), expected);
    }

    #[test]
    fn regime_frame() {
        let d = |m| quadrant_primitives::Date::from_ymd_opt(2024, m, 28).unwrap();
        let regimes = RegimeSeries::new(
            vec![d(1), d(2), d(3)],
            vec![None, Some(Regime::Reflation), Some(Regime::Recession)],
        )
        .unwrap();

        let df = regimes_to_dataframe(&regimes).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.column("Regime").unwrap().null_count(), 1);
        let risk: Vec<Option<bool>> =
            df.column("Risk_On").unwrap().bool().unwrap().into_iter().collect();
        assert_eq!(risk, vec![Some(false), Some(true), Some(false)]);
    }
}
