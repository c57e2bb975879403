//! Sign orientation of fitted components.
//!
//! A principal component is only defined up to sign. PC1 is oriented so its
//! score history correlates non-negatively with an equity anchor (risk
//! appetite up), and PC2 so it correlates non-negatively with the negated
//! yield anchor (duration demand up). An undefined correlation leaves the
//! component as fitted.

use ndarray::{Array2, ArrayView1, ArrayView2};
use quadrant_math::correlation;
use tracing::trace;

use crate::ExpandingPcaConfig;

/// Column positions of the orientation anchors within a variable universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchors {
    /// PC1 anchor column.
    pub equity: usize,
    /// PC2 anchor column.
    pub yields: usize,
}

impl Anchors {
    /// Pick the first configured candidate present in `variables`, else column 0.
    #[must_use]
    pub fn resolve(variables: &[String], config: &ExpandingPcaConfig) -> Self {
        let find = |candidates: &[String]| {
            candidates
                .iter()
                .find_map(|c| variables.iter().position(|v| v == c))
                .unwrap_or(0)
        };
        Self { equity: find(&config.equity_anchors), yields: find(&config.yield_anchors) }
    }
}

/// Sign decisions taken for one fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Orientation {
    /// PC1 was negated.
    pub pc1_flipped: bool,
    /// PC2 was negated.
    pub pc2_flipped: bool,
}

impl Orientation {
    /// Decide flips from a score history (n x 2) and the anchor columns over the same rows.
    ///
    /// A missing anchor or an undefined correlation means no flip.
    #[must_use]
    pub fn decide(
        scores: ArrayView2<'_, f64>,
        equity: Option<ArrayView1<'_, f64>>,
        yields: Option<ArrayView1<'_, f64>>,
    ) -> Self {
        let pc1_corr = equity.and_then(|e| correlation(scores.column(0), e));
        let pc2_corr = yields.and_then(|y| {
            let negated = y.mapv(|v| -v);
            correlation(scores.column(1), negated.view())
        });

        if pc1_corr.is_none() {
            trace!(rows = scores.nrows(), "PC1 orientation undefined, keeping fitted sign");
        }
        if pc2_corr.is_none() {
            trace!(rows = scores.nrows(), "PC2 orientation undefined, keeping fitted sign");
        }

        Self {
            pc1_flipped: pc1_corr.is_some_and(|r| r < 0.0),
            pc2_flipped: pc2_corr.is_some_and(|r| r < 0.0),
        }
    }

    /// Negate flipped score columns (n x 2) and component rows (2 x k).
    pub fn apply(self, scores: &mut Array2<f64>, components: &mut Array2<f64>) {
        for (c, flipped) in [self.pc1_flipped, self.pc2_flipped].into_iter().enumerate() {
            if flipped {
                scores.column_mut(c).mapv_inplace(|v| -v);
                components.row_mut(c).mapv_inplace(|v| -v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use rstest::rstest;

    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn anchors_follow_candidate_order() {
        let config = ExpandingPcaConfig::default();
        let vars = names(&["DXY", "US10Y", "SPX Index", "MSCI World"]);
        let anchors = Anchors::resolve(&vars, &config);
        assert_eq!(anchors, Anchors { equity: 3, yields: 1 });
    }

    #[test]
    fn anchors_fall_back_to_first_column() {
        let anchors = Anchors::resolve(&names(&["A", "B"]), &ExpandingPcaConfig::default());
        assert_eq!(anchors, Anchors { equity: 0, yields: 0 });
    }

    #[test]
    fn decide_and_apply() {
        let scores = array![[-1.0, 1.0], [0.0, 0.0], [1.0, -1.0]];
        let equity = array![3.0, 2.0, 1.0];
        let yields = array![1.0, 2.0, 3.0];

        let o = Orientation::decide(scores.view(), Some(equity.view()), Some(yields.view()));
        assert!(o.pc1_flipped);
        assert!(!o.pc2_flipped);

        let mut s = scores;
        let mut comps = array![[0.6, 0.8], [0.8, -0.6]];
        o.apply(&mut s, &mut comps);
        assert_eq!(s.column(0).to_vec(), vec![1.0, 0.0, -1.0]);
        assert_eq!(comps.row(0).to_vec(), vec![-0.6, -0.8]);
        assert_eq!(comps.row(1).to_vec(), vec![0.8, -0.6]);
    }

    #[rstest]
    #[case(1.0, 1.0)]
    #[case(-1.0, 1.0)]
    #[case(1.0, -1.0)]
    #[case(-1.0, -1.0)]
    fn oriented_scores_ignore_eigenvector_sign(#[case] s1: f64, #[case] s2: f64) {
        let window = array![[1.0, 0.5], [-1.0, 0.2], [0.5, -1.0], [-0.5, 0.3]];
        let fitted = array![[0.8, 0.6], [-0.6, 0.8]];
        let orient = |mut comps: Array2<f64>| {
            let mut scores = window.dot(&comps.t());
            let o =
                Orientation::decide(scores.view(), Some(window.column(0)), Some(window.column(1)));
            o.apply(&mut scores, &mut comps);
            (scores, comps)
        };

        let (expected_scores, expected_comps) = orient(fitted.clone());
        let mut flipped = fitted;
        flipped.row_mut(0).mapv_inplace(|v| v * s1);
        flipped.row_mut(1).mapv_inplace(|v| v * s2);
        let (scores, comps) = orient(flipped);

        assert_eq!(scores, expected_scores);
        assert_eq!(comps, expected_comps);
    }

    #[test]
    fn undefined_correlation_keeps_sign() {
        let scores = array![[-1.0, 1.0], [1.0, -1.0]];
        let flat = array![2.0, 2.0];
        let o = Orientation::decide(scores.view(), Some(flat.view()), None);
        assert_eq!(o, Orientation::default());
    }
}
