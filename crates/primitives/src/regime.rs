//! Regime labels and regime time series.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{DataError, Date, month_start, next_month_start};

/// Macro regime derived from the signs of the smoothed risk-appetite (PC1)
/// and duration-demand (PC2) scores.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Regime {
    /// Risk appetite up, duration demand up.
    Goldilocks,
    /// Risk appetite up, duration demand down.
    Reflation,
    /// Risk appetite down, duration demand up.
    Recession,
    /// Risk appetite down, duration demand down.
    Stagflation,
}

impl Regime {
    /// All regimes in table order.
    pub const ALL: [Self; 4] = [Self::Goldilocks, Self::Reflation, Self::Recession, Self::Stagflation];

    /// Regime for a given pair of sign outcomes.
    #[must_use]
    pub const fn from_signs(risk_on: bool, duration_bid: bool) -> Self {
        match (risk_on, duration_bid) {
            (true, true) => Self::Goldilocks,
            (true, false) => Self::Reflation,
            (false, true) => Self::Recession,
            (false, false) => Self::Stagflation,
        }
    }

    /// Whether the regime sits in the risk-on half of the table.
    #[must_use]
    pub const fn is_risk_on(self) -> bool {
        matches!(self, Self::Goldilocks | Self::Reflation)
    }

    /// Label as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Goldilocks => "Goldilocks",
            Self::Reflation => "Reflation",
            Self::Recession => "Recession",
            Self::Stagflation => "Stagflation",
        }
    }
}

impl FromStr for Regime {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DataError::UnknownRegime(s.to_string()))
    }
}

/// Bond sleeve held by the switching strategy.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sleeve {
    /// High-yield sleeve.
    #[display("HY")]
    #[serde(rename = "HY")]
    HighYield,
    /// Investment-grade sleeve.
    #[display("IG")]
    #[serde(rename = "IG")]
    InvestmentGrade,
}

/// Contiguous run of a single regime, expressed as a half-open calendar span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeSegment {
    /// Regime held over the span.
    pub regime: Regime,
    /// First day of the month of the first period.
    pub start: Date,
    /// First day of the month after the last period.
    pub end: Date,
    /// Number of periods in the run.
    pub periods: usize,
}

/// Regime label per date; `None` where history is insufficient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegimeColumns")]
pub struct RegimeSeries {
    dates: Vec<Date>,
    labels: Vec<Option<Regime>>,
}

/// Unchecked serialized form of [`RegimeSeries`].
#[derive(Deserialize)]
struct RegimeColumns {
    dates: Vec<Date>,
    labels: Vec<Option<Regime>>,
}

impl TryFrom<RegimeColumns> for RegimeSeries {
    type Error = DataError;

    fn try_from(c: RegimeColumns) -> Result<Self, Self::Error> {
        Self::new(c.dates, c.labels)
    }
}

impl RegimeSeries {
    /// Create a new regime series.
    ///
    /// # Errors
    /// Returns `DataError` if lengths disagree or dates are not strictly increasing.
    pub fn new(dates: Vec<Date>, labels: Vec<Option<Regime>>) -> Result<Self, DataError> {
        if labels.len() != dates.len() {
            return Err(DataError::ShapeMismatch {
                expected: dates.len(),
                actual: labels.len(),
                context: "regime labels",
            });
        }
        crate::matrix::check_increasing(&dates)?;
        Ok(Self { dates, labels })
    }

    /// Number of dates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Series timestamps.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Labels aligned with [`Self::dates`].
    #[must_use]
    pub fn labels(&self) -> &[Option<Regime>] {
        &self.labels
    }

    /// Regime at `date`; `None` if the date is absent or undefined.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<Regime> {
        self.dates.binary_search(&date).ok().and_then(|i| self.labels[i])
    }

    /// Iterate `(date, label)` pairs.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = (Date, Option<Regime>)> + ExactSizeIterator + '_ {
        self.dates.iter().copied().zip(self.labels.iter().copied())
    }

    /// Most recent defined label.
    #[must_use]
    pub fn latest(&self) -> Option<(Date, Regime)> {
        self.iter().rev().find_map(|(d, r)| r.map(|r| (d, r)))
    }

    /// Number of dates with a defined regime.
    #[must_use]
    pub fn n_defined(&self) -> usize {
        self.labels.iter().filter(|r| r.is_some()).count()
    }

    /// Contiguous runs of the same regime over the defined labels.
    ///
    /// Undefined dates are skipped before grouping, so a run is only broken by
    /// a change of label.
    #[must_use]
    pub fn segments(&self) -> Vec<RegimeSegment> {
        let mut segments: Vec<RegimeSegment> = Vec::new();
        for (date, regime) in self.iter().filter_map(|(d, r)| r.map(|r| (d, r))) {
            match segments.last_mut() {
                Some(last) if last.regime == regime => {
                    last.end = next_month_start(date);
                    last.periods += 1;
                }
                _ => segments.push(RegimeSegment {
                    regime,
                    start: month_start(date),
                    end: next_month_start(date),
                    periods: 1,
                }),
            }
        }
        segments
    }
}
