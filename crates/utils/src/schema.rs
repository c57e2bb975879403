//! Column discovery for uploaded tables.

use chrono::NaiveDate;
use polars::prelude::*;

use crate::UtilsError;

/// Column names recognised as the date column, compared trimmed and lowercase.
pub const DATE_COLUMN_NAMES: [&str; 5] = ["date", "dates", "month", "asof", "as_of"];

/// Accepted names for the high-yield sleeve, in priority order.
pub const HY_ALIASES: [&str; 5] = ["EMBI GD HY", "EMBI_HY", "HY", "EMBIGD HY", "EMBI HY"];

/// Accepted names for the investment-grade sleeve, in priority order.
pub const IG_ALIASES: [&str; 5] = ["EMBI GD IG", "EMBI_IG", "IG", "EMBIGD IG", "EMBI IG"];

/// Accepted names for the benchmark, in priority order.
pub const EMBI_ALIASES: [&str; 5] =
    ["EMBI", "EMBI GD", "EMBI Global Diversified", "EMBIGD", "EMBI GD Total"];

/// Source column for each required return series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnColumns {
    /// High-yield column.
    pub hy: String,
    /// Investment-grade column.
    pub ig: String,
    /// Benchmark column.
    pub embi: String,
}

/// Name of the date column: the first recognised name, else the first column.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if the frame has no columns.
pub fn detect_date_column(df: &DataFrame) -> Result<String, UtilsError> {
    let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    names
        .iter()
        .find(|n| DATE_COLUMN_NAMES.contains(&n.trim().to_lowercase().as_str()))
        .or_else(|| names.first())
        .cloned()
        .ok_or_else(|| UtilsError::MissingColumn("date".to_string()))
}

/// Parse a date cell; accepts ISO dates, ISO datetimes, slashed dates and `YYYY-MM`.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    let head = s.get(..10).unwrap_or(s);
    ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
        .or_else(|| NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok())
}

/// Map each required series to a column, matching aliases case-insensitively.
///
/// # Errors
/// Returns `UtilsError::UnresolvedSeries` naming the first series with no match.
pub fn resolve_return_columns(columns: &[String]) -> Result<ReturnColumns, UtilsError> {
    let find = |series: &'static str, aliases: &[&str]| {
        aliases
            .iter()
            .find_map(|alias| columns.iter().find(|c| c.trim().eq_ignore_ascii_case(alias)))
            .cloned()
            .ok_or_else(|| UtilsError::UnresolvedSeries { series, available: columns.to_vec() })
    };
    Ok(ReturnColumns {
        hy: find("HY", &HY_ALIASES)?,
        ig: find("IG", &IG_ALIASES)?,
        embi: find("EMBI", &EMBI_ALIASES)?,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn date_column_detection() {
        let df = df! {
            "Level" => &[1.0, 2.0],
            " As_Of " => &["2024-01-31", "2024-02-29"],
        }
        .unwrap();
        assert_eq!(detect_date_column(&df).unwrap(), " As_Of ");

        let df = df! { "when" => &["2024-01-31"], "x" => &[1.0] }.unwrap();
        assert_eq!(detect_date_column(&df).unwrap(), "when");

        assert!(detect_date_column(&DataFrame::empty()).is_err());
    }

    #[rstest]
    #[case("2024-03-15", Some((2024, 3, 15)))]
    #[case("2024-03-15 00:00:00.000", Some((2024, 3, 15)))]
    #[case("2024/03/15", Some((2024, 3, 15)))]
    #[case("03/15/2024", Some((2024, 3, 15)))]
    #[case("2024-03", Some((2024, 3, 1)))]
    #[case("Total", None)]
    fn date_parsing(#[case] raw: &str, #[case] expected: Option<(i32, u32, u32)>) {
        let expected = expected.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        assert_eq!(parse_date(raw), expected);
    }

    #[test]
    fn aliases_resolve_in_priority_order() {
        let cols = names(&["Date", "hy", "EMBI GD HY", "embi_ig", "EMBI GD"]);
        let resolved = resolve_return_columns(&cols).unwrap();
        assert_eq!(resolved.hy, "EMBI GD HY");
        assert_eq!(resolved.ig, "embi_ig");
        assert_eq!(resolved.embi, "EMBI GD");
    }

    #[test]
    fn unresolved_series_rejected() {
        let cols = names(&["Date", "HY", "IG", "Col8", "Col11"]);
        let err = resolve_return_columns(&cols).unwrap_err();
        assert!(matches!(err, UtilsError::UnresolvedSeries { series: "EMBI", .. }));
    }
}
