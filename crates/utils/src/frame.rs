//! Conversion of uploaded DataFrames into validated model inputs.

use ndarray::{Array2, s};
use polars::prelude::*;
use quadrant_primitives::{Date, FactorMatrix, ReturnsTable, month_end};
use tracing::{debug, warn};

use crate::{UtilsError, detect_date_column, parse_date, resolve_return_columns};

/// Largest absolute monthly return accepted; larger values suggest percent units.
pub const MAX_ABS_RETURN: f64 = 2.0;

/// Month-end table of every numeric column in `df`.
///
/// Rows whose date does not parse are dropped. Dates are moved to their
/// month end and rows sharing a month collapse to the last observed value per
/// column. Cells that are not numbers become `NaN`, and columns with no
/// numbers at all are dropped.
///
/// # Errors
/// Returns error if the frame has no columns or a column cannot be cast.
pub fn monthly_table(df: &DataFrame) -> Result<FactorMatrix, UtilsError> {
    let date_col = detect_date_column(df)?;
    let raw_dates = df.column(&date_col)?.cast(&DataType::String)?;
    let raw_dates = raw_dates.str()?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|n| *n != date_col)
        .collect();

    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(names.len());
    for name in &names {
        let cast = df.column(name)?.cast(&DataType::Float64)?;
        let values = cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()).unwrap_or(f64::NAN))
            .collect();
        columns.push(values);
    }

    let mut rows: Vec<(Date, usize)> = raw_dates
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| raw.and_then(parse_date).map(|d| (d, i)))
        .collect();
    let unparsed = df.height() - rows.len();
    if unparsed > 0 {
        debug!(column = %date_col, rows = unparsed, "dropped rows without a date");
    }
    rows.sort_unstable();

    let mut dates: Vec<Date> = Vec::new();
    let mut collapsed: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    for (date, i) in rows {
        let date = month_end(date);
        if dates.last() != Some(&date) {
            dates.push(date);
            for c in &mut collapsed {
                c.push(f64::NAN);
            }
        }
        for (j, c) in collapsed.iter_mut().enumerate() {
            let v = columns[j][i];
            if v.is_finite()
                && let Some(slot) = c.last_mut()
            {
                *slot = v;
            }
        }
    }

    let kept: Vec<usize> =
        (0..names.len()).filter(|&j| collapsed[j].iter().any(|v| v.is_finite())).collect();
    let mut values = Array2::from_elem((dates.len(), kept.len()), f64::NAN);
    for (dst, &j) in kept.iter().enumerate() {
        for (i, v) in collapsed[j].iter().enumerate() {
            values[[i, dst]] = *v;
        }
    }
    let variables = kept.iter().map(|&j| names[j].trim().to_string()).collect();

    debug!(
        months = dates.len(),
        columns = kept.len(),
        dropped = names.len() - kept.len(),
        "normalised to month end"
    );
    Ok(FactorMatrix::new(dates, variables, values)?)
}

/// Standardized factor matrix from a pre-scored table.
///
/// With `drop_leading_zero_row`, a first row whose values are all zero or
/// missing is removed.
///
/// # Errors
/// Returns error if the table cannot be normalised or is empty.
pub fn factor_matrix_from_frame(
    df: &DataFrame,
    drop_leading_zero_row: bool,
) -> Result<FactorMatrix, UtilsError> {
    let table = monthly_table(df)?;
    if table.is_empty() || table.n_variables() == 0 {
        return Err(UtilsError::Empty("factor table"));
    }

    let first: f64 =
        table.values().row(0).iter().filter(|v| v.is_finite()).map(|v| v.abs()).sum();
    if !(drop_leading_zero_row && first == 0.0) {
        return Ok(table);
    }

    debug!(date = %table.dates()[0], "dropping leading all-zero row");
    let values = table.values().slice(s![1.., ..]).to_owned();
    Ok(FactorMatrix::new(table.dates()[1..].to_vec(), table.variables().to_vec(), values)?)
}

/// HY/IG/EMBI returns table from an uploaded returns sheet.
///
/// Series are located by alias; rows missing any of the three are dropped.
///
/// # Errors
/// Returns error if a series cannot be resolved, a return exceeds
/// [`MAX_ABS_RETURN`] in magnitude, or no complete row remains.
pub fn returns_table_from_frame(df: &DataFrame) -> Result<ReturnsTable, UtilsError> {
    let table = monthly_table(df)?;
    let cols = resolve_return_columns(table.variables())?;
    let pick = |name: &str| {
        table.column(name).ok_or_else(|| UtilsError::MissingColumn(name.to_string()))
    };
    let (hy_col, ig_col, embi_col) = (pick(&cols.hy)?, pick(&cols.ig)?, pick(&cols.embi)?);

    let (mut dates, mut hy, mut ig, mut embi) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
    for (i, &date) in table.dates().iter().enumerate() {
        let row = [hy_col[i], ig_col[i], embi_col[i]];
        if row.iter().any(|v| !v.is_finite()) {
            continue;
        }
        for (series, value) in ["HY", "IG", "EMBI"].into_iter().zip(row) {
            if value.abs() > MAX_ABS_RETURN {
                return Err(UtilsError::ImplausibleReturn { series, date, value });
            }
        }
        dates.push(date);
        hy.push(row[0]);
        ig.push(row[1]);
        embi.push(row[2]);
    }

    let dropped = table.n_rows() - dates.len();
    if dropped > 0 {
        warn!(rows = dropped, "dropped return rows with a missing series");
    }
    if dates.is_empty() {
        return Err(UtilsError::Empty("returns table"));
    }
    debug!(
        hy = %cols.hy,
        ig = %cols.ig,
        embi = %cols.embi,
        months = dates.len(),
        "resolved returns"
    );
    Ok(ReturnsTable::new(dates, hy, ig, embi)?)
}
