//! Example: Full Quadrant Regime Pipeline
//!
//! This example walks through the complete quadrant workflow on synthetic data:
//! 1. Simulating a growth cycle and a duration cycle as AR(1) processes
//! 2. Building standardized macro variables and HY/IG/EMBI returns from them
//! 3. Running the expanding PCA, regime classifier and switching backtest
//! 4. Printing the component series, regime runs and performance tables
//!
//! Run with: `cargo run --example full_pipeline --features full`

use chrono::Months;
use ndarray::Array2;
use polars::prelude::*;
use quadrant::{
    Pipeline,
    primitives::{Date, FactorMatrix, ReturnsTable, month_end},
};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Number of simulated months.
const N_MONTHS: usize = 180;

/// AR(1) persistence of both latent cycles.
const PERSISTENCE: f64 = 0.9;

/// Simulated variables with their (growth, duration) exposures.
const VARIABLES: &[(&str, f64, f64)] = &[
    ("SPX Index", 1.0, 0.1),
    ("SXXP Index", 0.9, 0.0),
    ("MXEF Index", 0.8, -0.1),
    ("USGG10YR Index", 0.4, -1.0),
    ("GTDEM10Y Govt", 0.3, -0.9),
    ("CL1 Comdty", 0.6, -0.4),
    ("XAU Curncy", -0.2, 0.7),
    ("DXY Curncy", -0.5, 0.3),
];

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    print_header();

    // Step 1: Simulate inputs
    let (factors, returns) = simulate(42)?;
    println!(
        "[*] Simulated {} months x {} variables ({} to {})\n",
        factors.n_rows(),
        factors.n_variables(),
        factors.dates()[0],
        factors.dates()[factors.n_rows() - 1],
    );

    // Step 2: Run the pipeline
    let output = Pipeline::new().run(&factors, &returns)?;

    // Step 3: Component series
    println!(
        "================================================================================\n\
         STEP 1: PRINCIPAL COMPONENTS\n\
         ================================================================================\n"
    );
    let pcs = output.series.to_dataframe()?;
    println!("{}\n", pcs.tail(Some(8)));

    if let Some(loadings) = &output.loadings {
        println!("[*] Final loadings (oriented):\n");
        println!("    {:<18} {:>8} {:>8}", "Variable", "PC1", "PC2");
        for (j, name) in loadings.variables.iter().enumerate() {
            println!("    {:<18} {:>8.3} {:>8.3}", name, loadings.pc1[j], loadings.pc2[j]);
        }
        println!();
    }

    // Step 4: Regimes
    println!(
        "================================================================================\n\
         STEP 2: REGIMES\n\
         ================================================================================\n"
    );
    for segment in output.segments.iter().rev().take(8).rev() {
        println!(
            "    {} -> {}  {:<12} ({} months)",
            segment.start, segment.end, segment.regime, segment.periods
        );
    }
    println!();
    for avg in output.averages_by_regime() {
        println!(
            "    {:<12} HY {:>7.3}%  IG {:>7.3}%  ({} months)",
            avg.regime,
            avg.hy * 100.0,
            avg.ig * 100.0,
            avg.periods
        );
    }
    println!();

    // Step 5: Backtest
    println!(
        "================================================================================\n\
         STEP 3: BACKTEST\n\
         ================================================================================\n"
    );
    println!("{}\n", output.backtest.to_dataframe()?.tail(Some(6)));
    for year in output.calendar.iter().rev().take(5).rev() {
        println!(
            "    {}  strategy {:>7.2}%  EMBI {:>7.2}%",
            year.year,
            year.strategy * 100.0,
            year.benchmark * 100.0
        );
    }

    let summary = output.summary(3);
    println!("\n[*] Tracking error:     {:.2}%", summary.tracking_error * 100.0);
    println!("[*] Information ratio:  {:.2}", summary.information_ratio);
    println!(
        "[*] Total return:       {:.2}% vs {:.2}%",
        summary.total_strategy_return * 100.0,
        summary.total_benchmark_return * 100.0
    );
    if let (Some(date), Some(regime)) = (summary.as_of, summary.regime) {
        println!("[*] Current regime:     {regime} as of {date}");
        for (name, value) in &summary.top_pc1 {
            println!("      PC1 driver {name:<18} {value:>+.3}");
        }
    }
    println!();

    Ok(())
}

// ============================================================================
// DATA SIMULATION
// ============================================================================

/// Latent cycles drive the variables; next month's credit returns load on them.
fn simulate(seed: u64) -> Result<(FactorMatrix, ReturnsTable), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let shock = Normal::new(0.0, (1.0 - PERSISTENCE * PERSISTENCE).sqrt())?;
    let noise = Normal::new(0.0, 0.35)?;
    let ret_noise = Normal::new(0.0, 0.004)?;

    let start = Date::from_ymd_opt(2008, 1, 31).ok_or("invalid start date")?;
    let dates: Vec<Date> = (0..N_MONTHS)
        .map(|i| start.checked_add_months(Months::new(i as u32)).map(month_end))
        .collect::<Option<_>>()
        .ok_or("date overflow")?;

    let (mut growth, mut duration) = (0.0_f64, 0.0_f64);
    let mut values = Array2::zeros((N_MONTHS, VARIABLES.len()));
    let (mut hy, mut ig, mut embi) = (Vec::new(), Vec::new(), Vec::new());

    for t in 0..N_MONTHS {
        let (prev_growth, prev_duration) = (growth, duration);
        growth = PERSISTENCE * growth + shock.sample(&mut rng);
        duration = PERSISTENCE * duration + shock.sample(&mut rng);

        for (j, (_, g, d)) in VARIABLES.iter().enumerate() {
            values[[t, j]] = g * growth + d * duration + noise.sample(&mut rng);
        }

        let h = 0.004 + 0.012 * prev_growth + ret_noise.sample(&mut rng);
        let i = 0.003 + 0.004 * prev_duration + ret_noise.sample(&mut rng) * 0.5;
        hy.push(h);
        ig.push(i);
        embi.push(0.5 * (h + i));
    }

    let names = VARIABLES.iter().map(|(n, _, _)| (*n).to_string()).collect();
    let factors = FactorMatrix::new(dates.clone(), names, values)?;
    let returns = ReturnsTable::new(dates, hy, ig, embi)?;

    // Show what an upload of the same data would look like.
    let spx: Vec<f64> = factors.values().column(0).iter().take(5).copied().collect();
    let preview = DataFrame::new(vec![
        Column::new("date".into(), factors.dates()[..5].to_vec()),
        Column::new("SPX Index".into(), spx),
        Column::new("HY".into(), returns.hy()[..5].to_vec()),
    ])?;
    println!("[*] Input sample:\n\n{preview}\n");

    Ok((factors, returns))
}

fn print_header() {
    println!(
        "\n\
        ################################################################################\n\
        #                                                                              #\n\
        #                    QUADRANT: FULL PIPELINE EXAMPLE                           #\n\
        #                                                                              #\n\
        #  Expanding-window PCA macro regimes driving an HY/IG switch                  #\n\
        #  Using simulated growth and duration cycles                                  #\n\
        #                                                                              #\n\
        ################################################################################\n"
    );
}
