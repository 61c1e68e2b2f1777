//! Granger causality result types.

use serde::{Deserialize, Serialize};

/// Direction of Granger causality between series A and B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CausalDirection {
    /// Neither direction is significant
    None,
    /// Past A improves the prediction of B
    AToB,
    /// Past B improves the prediction of A
    BToA,
    /// Both directions are significant
    Bidirectional,
}

impl CausalDirection {
    /// Classify from the two directional p-values at `significance`.
    pub fn classify(p_a_to_b: f64, p_b_to_a: f64, significance: f64) -> Self {
        match (p_a_to_b < significance, p_b_to_a < significance) {
            (true, true) => CausalDirection::Bidirectional,
            (true, false) => CausalDirection::AToB,
            (false, true) => CausalDirection::BToA,
            (false, false) => CausalDirection::None,
        }
    }
}

impl std::fmt::Display for CausalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CausalDirection::None => "none",
            CausalDirection::AToB => "A_to_B",
            CausalDirection::BToA => "B_to_A",
            CausalDirection::Bidirectional => "bidirectional",
        };
        write!(f, "{}", s)
    }
}

/// F-test of one causal direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrangerStatistic {
    pub f_statistic: f64,
    pub p_value: f64,
    /// Numerator degrees of freedom (the lag order)
    pub df1: usize,
    /// Denominator degrees of freedom of the unrestricted model
    pub df2: usize,
}

/// Bidirectional Granger causality test at a fixed lag order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrangerResult {
    /// Label of series A (candidate cause)
    pub series_a: String,
    /// Label of series B (candidate effect)
    pub series_b: String,
    /// Lag order p
    pub lag_order: usize,
    /// Number of aligned observations
    pub n: usize,
    /// Does past A help predict B
    pub a_to_b: GrangerStatistic,
    /// Does past B help predict A
    pub b_to_a: GrangerStatistic,
    pub direction: CausalDirection,
}
