use serde::{Deserialize, Serialize};

/// Summary of a simulated BG trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlucoseStats {
    pub average: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl GlucoseStats {
    /// Returns `None` for an empty trajectory.
    pub fn from_series(bg: &[f64]) -> Option<Self> {
        if bg.is_empty() {
            return None;
        }

        let min = bg.iter().copied().fold(f64::INFINITY, f64::min);
        let max = bg.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            average: mean(bg),
            std_dev: std_dev(bg),
            min,
            max,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation.
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean_val = mean(values);
    let variance = values.iter()
        .map(|v| (v - mean_val).powi(2))
        .sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
