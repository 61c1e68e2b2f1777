//! Factor insight walkthrough - lag scan, windows, Granger and anomalies
//! over synthetic store data.
//!
//! Run with `RUST_LOG=debug` to see per-lag and per-window logging.

use chrono::{Days, NaiveDate};
use insight_facade::{
    AnalysisConfig, AnomalyDetector, AnomalySweep, DateAlignedSeries, FactorSweep,
    GrangerCausalityTester, Granularity, InMemorySeriesProvider, LagScanner, WindowedLagScanner,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CONFIG: &str = r#"
[lag_scan]
max_lag = 7

[lag_scan.correlation]
significance = 0.05
transform = "detrend"

[window]
window_days = 90
step_days = 30

[granger]
lag_order = 3

[anomaly]
granularity = "weekly"
threshold = 2.5
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== Factor Insight Analysis ===\n");

    let config = AnalysisConfig::from_toml_str(CONFIG)?;
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("invalid start date")?;
    let days = 365usize;
    let end = start
        .checked_add_days(Days::new(days as u64 - 1))
        .ok_or("invalid end date")?;

    // Temperature drives sales three days later; a promotion spike lands in week 40
    let mut rng = StdRng::seed_from_u64(2024);
    let temperature: Vec<f64> = (0..days)
        .map(|t| {
            let season = 12.0 * (2.0 * std::f64::consts::PI * t as f64 / 365.0).sin();
            15.0 + season + rng.gen_range(-3.0..3.0)
        })
        .collect();
    let rainfall: Vec<f64> = (0..days).map(|_| rng.gen_range(0.0..20.0)).collect();
    let sales: Vec<f64> = (0..days)
        .map(|t| {
            let driven = if t >= 3 { 6.0 * temperature[t - 3] } else { 90.0 };
            let promo = if (280..287).contains(&t) { 250.0 } else { 0.0 };
            400.0 + 0.2 * t as f64 + driven + promo + rng.gen_range(-10.0..10.0)
        })
        .collect();

    let provider = InMemorySeriesProvider::new()
        .with_series("sales", DateAlignedSeries::daily("sales", start, &sales)?)
        .with_series("temperature", DateAlignedSeries::daily("temperature", start, &temperature)?)
        .with_series("rainfall", DateAlignedSeries::daily("rainfall", start, &rainfall)?);

    // =========================================================================
    // Factor sweep
    // =========================================================================
    println!("--- Factor Sweep (max lag {}) ---", config.lag_scan.max_lag);
    let sweep = FactorSweep::new(config.lag_scan.clone()).run(
        &provider,
        "sales",
        &["temperature", "rainfall", "footfall"],
        start,
        end,
    )?;
    for factor in sweep.strongest() {
        if let Some(best) = factor.scan.best() {
            println!(
                "{:<12} lag {:+} r = {:+.3} ({})",
                factor.factor_id, best.lag, best.r, best.interpretation
            );
        }
    }
    for failure in &sweep.failures {
        println!("{:<12} skipped: {}", failure.unit, failure.reason);
    }

    // =========================================================================
    // Lag profile and windows for temperature
    // =========================================================================
    let temperature = provider_series(&provider, "temperature", start, end)?;
    let sales = provider_series(&provider, "sales", start, end)?;

    println!("\n--- Lag Profile: temperature -> sales ---");
    let scan = LagScanner::new(config.lag_scan.clone()).scan(&temperature, &sales)?;
    for result in scan.ranked.iter().take(5) {
        println!(
            "lag {:+3}  r = {:+.4}  p = {:.2e}  fdr = {:.2e}  n = {}",
            result.lag,
            result.r,
            result.p_value,
            result.effective_p_value(),
            result.n
        );
    }

    println!("\n--- Windowed Scan ({} day windows) ---", config.window.window_days);
    let windowed = WindowedLagScanner::new(config.lag_scan.clone(), config.window.clone())
        .scan(&temperature, &sales)?;
    for window in &windowed.windows {
        println!(
            "{} .. {}  best lag {:+}  r = {:+.3}",
            window.start, window.end, window.best.lag, window.best.r
        );
    }

    // =========================================================================
    // Granger causality
    // =========================================================================
    println!("\n--- Granger Causality (order {}) ---", config.granger.lag_order);
    let granger = GrangerCausalityTester::new(config.granger.clone()).test(&temperature, &sales)?;
    println!(
        "temperature -> sales: F = {:.2}, p = {:.2e}",
        granger.a_to_b.f_statistic, granger.a_to_b.p_value
    );
    println!(
        "sales -> temperature: F = {:.2}, p = {:.2e}",
        granger.b_to_a.f_statistic, granger.b_to_a.p_value
    );
    println!("direction: {}", granger.direction);

    // =========================================================================
    // Anomalies
    // =========================================================================
    println!("\n--- Weekly Anomalies ---");
    let detector = AnomalyDetector::new(config.anomaly.clone());
    for record in detector.detect(&sales, None)? {
        println!(
            "{} {} {:?}: actual {:.0}, expected {:.0}, z = {:+.2}",
            record.period, record.severity, record.kind, record.actual, record.expected, record.z_score
        );
    }

    let mut monthly = config.anomaly.clone();
    monthly.granularity = Granularity::Monthly;
    let by_factor = AnomalySweep::new(monthly).run(
        &provider,
        &["sales", "temperature", "rainfall"],
        start,
        end,
    )?;
    println!("\nMonthly anomalies across all series: {}", by_factor.records.len());

    println!("\n--- JSON ---");
    if let Some(best) = scan.best() {
        println!("{}", serde_json::to_string_pretty(best)?);
    }

    Ok(())
}

fn provider_series(
    provider: &InMemorySeriesProvider,
    id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DateAlignedSeries, Box<dyn std::error::Error>> {
    use insight_facade::SeriesProvider;
    Ok(provider.fetch(id, start, end)?)
}
