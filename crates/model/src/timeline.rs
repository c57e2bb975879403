//! Per-date loading vectors for contribution analysis.

use ndarray::Axis;
use quadrant_math::Pca;
use quadrant_primitives::{FactorMatrix, LoadingTimeline, LoadingVector};
use tracing::debug;

use crate::{Anchors, ExpandingPcaConfig, ModelError, Orientation};

/// Recompute the oriented loading vector independently at every date.
///
/// For each cutoff `t` the window `0..=t` is cleaned before fitting: columns
/// with no observation in the window are dropped, then rows with any
/// remaining gap. Windows left with fewer than two rows or two columns are
/// skipped. Each vector is reindexed onto the full variable universe with
/// zero weight for dropped variables, and keyed by the last retained date.
/// An anchor dropped from the window leaves its component unoriented.
///
/// # Errors
/// Returns `ModelError` if the matrix has fewer than two variables.
pub fn loading_timeline(
    matrix: &FactorMatrix,
    config: &ExpandingPcaConfig,
) -> Result<LoadingTimeline, ModelError> {
    if matrix.n_variables() < 2 {
        return Err(ModelError::TooFewVariables(matrix.n_variables()));
    }

    let universe = matrix.variables();
    let anchors = Anchors::resolve(universe, config);
    let pca = Pca::new(2);
    let mut timeline = LoadingTimeline::new();

    for t in 0..matrix.n_rows() {
        let window = matrix.window(t);

        let kept: Vec<usize> = (0..universe.len())
            .filter(|&j| window.column(j).iter().any(|v| v.is_finite()))
            .collect();
        let rows: Vec<usize> = (0..=t)
            .filter(|&i| kept.iter().all(|&j| window[[i, j]].is_finite()))
            .collect();
        if rows.len() < 2 || kept.len() < 2 {
            continue;
        }

        let sample = window.select(Axis(0), &rows).select(Axis(1), &kept);
        let fit = pca.fit(sample.view())?;
        let mut scores = fit.transform(sample.view())?;
        let mut components = fit.components;

        let local = |anchor: usize| kept.iter().position(|&j| j == anchor);
        let orientation = Orientation::decide(
            scores.view(),
            local(anchors.equity).map(|c| sample.column(c)),
            local(anchors.yields).map(|c| sample.column(c)),
        );
        orientation.apply(&mut scores, &mut components);

        let names = kept.iter().map(|&j| universe[j].clone()).collect();
        let loadings =
            LoadingVector::new(names, components.row(0).to_owned(), components.row(1).to_owned());

        let date = matrix.dates()[rows[rows.len() - 1]];
        timeline.insert(date, loadings.reindex(universe));
    }

    debug!(entries = timeline.len(), rows = matrix.n_rows(), "built loading timeline");
    Ok(timeline)
}
