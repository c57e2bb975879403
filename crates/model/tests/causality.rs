//! Causality and orientation properties of the expanding engine.
#![allow(missing_docs)]

use ndarray::{Array1, Array2, Axis};
use quadrant_math::{Pca, correlation};
use quadrant_model::{ExpandingPca, QuadrantClassifier, classify_series};
use quadrant_primitives::{Date, FactorMatrix, month_end};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn monthly(n: usize) -> Vec<Date> {
    let start = Date::from_ymd_opt(2015, 1, 1).unwrap();
    (0..n).map(|i| month_end(start + chrono::Months::new(i as u32))).collect()
}

fn random_matrix(rows: usize, seed: u64) -> FactorMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let variables = ["MSCI World", "USGG10Y Index", "DXY", "Brent", "VIX"]
        .iter()
        .map(|s| (*s).to_string())
        .collect::<Vec<_>>();
    let values =
        Array2::from_shape_fn((rows, variables.len()), |_| rng.r#gen::<f64>() * 2.0 - 1.0);
    FactorMatrix::new(monthly(rows), variables, values).unwrap()
}

#[test]
fn truncation_invariance() {
    let m = random_matrix(24, 11);
    let engine = ExpandingPca::new();
    let full = engine.fit(&m).unwrap();

    for t in 1..m.n_rows() {
        let truncated = engine.fit(&m.truncated(t)).unwrap();
        let s = &truncated.series;

        assert_eq!(s.pc1[t], full.series.pc1[t], "PC1 differs at cutoff {t}");
        assert_eq!(s.pc2[t], full.series.pc2[t], "PC2 differs at cutoff {t}");
        assert_eq!(s.pc1_evr[t], full.series.pc1_evr[t]);
        assert_eq!(s.pc1_sma[t], full.series.pc1_sma[t]);
        assert_eq!(s.dpc2[t], full.series.dpc2[t]);

        let at = engine.fit_at(&m, t).unwrap();
        assert_eq!(truncated.loadings.as_ref(), Some(&at.loadings));
    }
}

#[test]
fn regimes_are_causal() {
    let m = random_matrix(30, 5);
    let engine = ExpandingPca::new();
    let full = classify_series(&engine.fit(&m).unwrap().series, &QuadrantClassifier).unwrap();

    for t in [10, 17, 29] {
        let part = engine.fit(&m.truncated(t)).unwrap();
        let part = classify_series(&part.series, &QuadrantClassifier).unwrap();
        assert_eq!(part.labels(), &full.labels()[..=t]);
    }
}

#[test]
fn negating_a_non_anchor_variable_keeps_scores() {
    let m = random_matrix(20, 3);
    let mut values = m.values().to_owned();
    values.column_mut(2).mapv_inplace(|v| -v);
    let negated = FactorMatrix::new(m.dates().to_vec(), m.variables().to_vec(), values).unwrap();

    let engine = ExpandingPca::new();
    let a = engine.fit(&m).unwrap();
    let b = engine.fit(&negated).unwrap();

    for t in 1..m.n_rows() {
        let (x, y) = (a.series.pc1[t].unwrap(), b.series.pc1[t].unwrap());
        assert!((x - y).abs() < 1e-9, "PC1 sign flipped at {t}: {x} vs {y}");
        let (x, y) = (a.series.pc2[t].unwrap(), b.series.pc2[t].unwrap());
        assert!((x - y).abs() < 1e-9, "PC2 sign flipped at {t}: {x} vs {y}");
    }

    let (la, lb) = (a.loadings.unwrap(), b.loadings.unwrap());
    let (dxy_a, _) = la.get("DXY").unwrap();
    let (dxy_b, _) = lb.get("DXY").unwrap();
    assert!((dxy_a + dxy_b).abs() < 1e-9);
}

#[test]
fn flat_equity_anchor_leaves_pc1_as_fitted() {
    let m = random_matrix(12, 9);
    let mut values = m.values().to_owned();
    values.column_mut(0).fill(0.25);
    let flat = FactorMatrix::new(m.dates().to_vec(), m.variables().to_vec(), values).unwrap();

    let engine = ExpandingPca::new();
    let pca = Pca::new(2);
    for t in 1..flat.n_rows() {
        let fit = engine.fit_at(&flat, t).unwrap();
        assert!(!fit.orientation.pc1_flipped, "PC1 flipped at cutoff {t}");

        let raw = pca.fit(flat.window(t)).unwrap();
        assert_eq!(fit.loadings.pc1, raw.components.row(0));
    }
}

#[test]
fn pc1_tracks_equity_anchor() {
    // Credit moves one-for-one with equities; rates are unrelated.
    let spx = [0.3, -1.2, 0.8, 1.5, -0.4, 0.1];
    let rates = [0.5, 0.2, -0.9, 0.4, 1.1, -0.6];
    let mut values = Array2::zeros((6, 3));
    for (i, (&e, &r)) in spx.iter().zip(rates.iter()).enumerate() {
        values[[i, 0]] = e;
        values[[i, 1]] = 2.0 * e + 0.5;
        values[[i, 2]] = r;
    }
    let variables = vec!["SPX Index".to_string(), "Credit".to_string(), "US10Y".to_string()];
    let m = FactorMatrix::new(monthly(6), variables, values).unwrap();
    let engine = ExpandingPca::new();

    for t in 1..6 {
        let fit = engine.fit_at(&m, t).unwrap();
        let window = m.window(t);
        let mean = window.mean_axis(Axis(0)).unwrap();
        let history: Array1<f64> = (&window - &mean).dot(&fit.loadings.pc1);

        let corr = correlation(history.view(), window.column(0)).unwrap();
        assert!(corr >= 0.0, "PC1 opposes equities at cutoff {t}: {corr}");
    }
}
