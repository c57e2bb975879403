//! Raw upload to scored factor matrix.

use polars::prelude::*;
use quadrant_utils::{
    ContentCache, ContentKey, IngestConfig, bytes_hash, expanding_zscores, monthly_table,
};

fn raw_frame(n: usize) -> DataFrame {
    let dates: Vec<String> =
        (0..n).map(|i| format!("{}-{:02}-15", 2000 + i / 12, i % 12 + 1)).collect();
    let spx: Vec<f64> =
        (0..n).map(|i| 1000.0 + 10.0 * i as f64 + ((i * 13) % 7) as f64).collect();
    let ust: Vec<Option<f64>> = (0..n)
        .map(|i| if i == 3 { None } else { Some(4.0 - 0.01 * ((i * 5) % 11) as f64) })
        .collect();
    df! {
        "Date" => dates,
        "SPX Index" => spx,
        "USGG10YR Index" => ust,
        "Unused" => vec![None::<f64>; n],
    }
    .unwrap()
}

#[test]
fn upload_to_zscores() {
    let table = monthly_table(&raw_frame(40)).unwrap();
    assert_eq!(table.n_rows(), 40);
    assert_eq!(table.n_variables(), 2);

    let config = IngestConfig { min_periods_for_zscore: 12 };
    let z = expanding_zscores(&table, &config).unwrap();

    // One gap row removed, then the first eleven complete rows lack history.
    assert_eq!(z.n_rows(), 40 - 1 - 11);
    assert!(z.values().iter().all(|v| v.is_finite()));
    assert!(z.dates().windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn scores_never_look_ahead() {
    let full = monthly_table(&raw_frame(40)).unwrap();
    let config = IngestConfig { min_periods_for_zscore: 12 };
    let z_full = expanding_zscores(&full, &config).unwrap();
    let z_short = expanding_zscores(&full.truncated(29), &config).unwrap();

    for (i, date) in z_short.dates().iter().enumerate() {
        let j = z_full.position(*date).unwrap();
        assert_eq!(z_short.values().row(i), z_full.values().row(j));
    }
}

#[test]
fn too_little_history_is_empty() {
    let table = monthly_table(&raw_frame(8)).unwrap();
    let err = expanding_zscores(&table, &IngestConfig { min_periods_for_zscore: 24 });
    assert!(err.is_err());
}

#[test]
fn cache_keyed_by_upload_bytes() {
    let factors = b"Date,SPX Index\n2024-01-31,1.0\n".as_slice();
    let returns = b"Date,HY,IG,EMBI\n2024-01-31,0.01,0.0,0.005\n".as_slice();
    let cache: ContentCache<String> = ContentCache::new();

    let key = ContentKey::new(&[factors, returns], 24);
    let value =
        cache.get_or_try_insert_with(key.clone(), || Ok::<_, ()>(bytes_hash(factors))).unwrap();
    assert_eq!(value.len(), 16);
    assert!(cache.get(&key).is_some());
    assert!(cache.get(&ContentKey::new(&[factors, returns], 36)).is_none());
}
