//! Benjamini-Hochberg false discovery rate adjustment.

use insight_spi::{AnalysisError, Result};

/// Benjamini-Hochberg adjusted p-values, returned in input order.
///
/// For p-values sorted ascending, `adjusted_i = min_{j >= i} (p_j * m / j)`,
/// capped at 1. Each adjusted value is at least its raw value and the
/// adjusted values are monotone in raw-p order.
pub fn benjamini_hochberg(p_values: &[f64]) -> Result<Vec<f64>> {
    if let Some(bad) = p_values
        .iter()
        .find(|p| !p.is_finite() || !(0.0..=1.0).contains(*p))
    {
        return Err(AnalysisError::invalid(
            "p_values",
            format!("{} is not a probability", bad),
        ));
    }

    let m = p_values.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mf = m as f64;
    let mut adjusted = vec![0.0; m];
    let mut running_min = 1.0_f64;
    for (rank_idx, &orig_idx) in order.iter().enumerate().rev() {
        let rank = (rank_idx + 1) as f64;
        running_min = running_min.min(p_values[orig_idx] * mf / rank);
        adjusted[orig_idx] = running_min;
    }

    Ok(adjusted)
}
