//! Sleeve and benchmark return table.

use serde::{Deserialize, Serialize};

use crate::{DataError, Date, matrix::check_increasing};

/// Monthly simple returns for the two bond sleeves and the benchmark.
///
/// Returns are fractional (`0.01` is one percent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReturnColumns")]
pub struct ReturnsTable {
    dates: Vec<Date>,
    hy: Vec<f64>,
    ig: Vec<f64>,
    embi: Vec<f64>,
}

/// Unchecked serialized form of [`ReturnsTable`].
#[derive(Deserialize)]
struct ReturnColumns {
    dates: Vec<Date>,
    hy: Vec<f64>,
    ig: Vec<f64>,
    embi: Vec<f64>,
}

impl TryFrom<ReturnColumns> for ReturnsTable {
    type Error = DataError;

    fn try_from(c: ReturnColumns) -> Result<Self, Self::Error> {
        Self::new(c.dates, c.hy, c.ig, c.embi)
    }
}

impl ReturnsTable {
    /// Create a new returns table.
    ///
    /// # Errors
    /// Returns `DataError` if the series lengths disagree, dates are not
    /// strictly increasing, or any return is not finite.
    pub fn new(
        dates: Vec<Date>,
        hy: Vec<f64>,
        ig: Vec<f64>,
        embi: Vec<f64>,
    ) -> Result<Self, DataError> {
        for (series, len) in [("HY", hy.len()), ("IG", ig.len()), ("EMBI", embi.len())] {
            if len != dates.len() {
                return Err(DataError::ShapeMismatch {
                    expected: dates.len(),
                    actual: len,
                    context: series,
                });
            }
        }
        check_increasing(&dates)?;

        for (series, values) in [("HY", &hy), ("IG", &ig), ("EMBI", &embi)] {
            if let Some(i) = values.iter().position(|r| !r.is_finite()) {
                return Err(DataError::NonFinite { series, date: dates[i] });
            }
        }

        Ok(Self { dates, hy, ig, embi })
    }

    /// Number of periods.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Period timestamps.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// High-yield sleeve returns.
    #[must_use]
    pub fn hy(&self) -> &[f64] {
        &self.hy
    }

    /// Investment-grade sleeve returns.
    #[must_use]
    pub fn ig(&self) -> &[f64] {
        &self.ig
    }

    /// Benchmark (EMBI) returns.
    #[must_use]
    pub fn embi(&self) -> &[f64] {
        &self.embi
    }

    /// Position of `date` in the table.
    #[must_use]
    pub fn position(&self, date: Date) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Get `(hy, ig, embi)` for a date.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<(f64, f64, f64)> {
        self.position(date).map(|i| (self.hy[i], self.ig[i], self.embi[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32) -> Date {
        Date::from_ymd_opt(2024, m, 28).unwrap()
    }

    #[test]
    fn returns_table_get() {
        let t = ReturnsTable::new(
            vec![d(1), d(2)],
            vec![0.02, -0.01],
            vec![0.01, 0.005],
            vec![0.015, 0.0],
        )
        .unwrap();

        assert_eq!(t.len(), 2);
        assert_eq!(t.get(d(2)), Some((-0.01, 0.005, 0.0)));
        assert_eq!(t.get(d(3)), None);
    }

    #[test]
    fn returns_table_rejects_length_mismatch() {
        let err = ReturnsTable::new(vec![d(1), d(2)], vec![0.0, 0.0], vec![0.0], vec![0.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, DataError::ShapeMismatch { context: "IG", .. }));
    }

    #[test]
    fn returns_table_rejects_nan() {
        let err = ReturnsTable::new(vec![d(1)], vec![f64::NAN], vec![0.0], vec![0.0]).unwrap_err();
        assert!(matches!(err, DataError::NonFinite { series: "HY", .. }));
    }

    #[test]
    fn deserialize_checks_columns() {
        let t: ReturnsTable = serde_json::from_str(
            r#"{"dates":["2024-01-28","2024-02-28"],"hy":[0.01,0.02],"ig":[0.0,0.0],"embi":[0.0,0.01]}"#,
        )
        .unwrap();
        assert_eq!(t.get(d(2)), Some((0.02, 0.0, 0.01)));

        let err = serde_json::from_str::<ReturnsTable>(
            r#"{"dates":["2024-01-28","2024-02-28"],"hy":[0.01],"ig":[0.0,0.0],"embi":[0.0,0.0]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("shape mismatch for HY"));
    }
}
