use std::fmt;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use crate::config::TargetRange;
use crate::error::{GlucodynError, GDResult};
use crate::models::{BasalRate, UserProfile};
use super::statistics::GlucoseStats;

/// Suggested action to bring the trajectory back into range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DoseAdvice {
    Bolus { units: f64 },
    Eat { grams: f64 },
    TempBasal { percent: f64, hours: f64 },
}

impl fmt::Display for DoseAdvice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoseAdvice::Bolus { units } => write!(f, "Bolus: {:.1}U", units),
            DoseAdvice::Eat { grams } => write!(f, "Eat: {:.0}g", grams),
            DoseAdvice::TempBasal { percent, hours } => {
                write!(f, "TempBasal: {:.0}% for {} hours", percent, hours)
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendation {
    /// Trajectory ends in range.
    None,
    Dose { advice: DoseAdvice },
    /// Trajectory ends out of range but no sensible dose could be derived.
    Unavailable { reason: String },
}

impl Recommendation {
    /// Text for display, `None` when there is nothing to show.
    pub fn display_text(&self) -> Option<String> {
        match self {
            Recommendation::None => None,
            Recommendation::Dose { advice } => Some(advice.to_string()),
            Recommendation::Unavailable { reason } => Some(format!("No recommendation: {}", reason)),
        }
    }
}

/// Everything the dosing rules look at besides the trajectory itself.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInputs<'a> {
    pub profile: &'a UserProfile,
    pub basal: BasalRate,
    pub target: TargetRange,
    pub max_temp_basal_percent: f64,
}

/// Compare the end of the trajectory with the target range and pick a
/// correction. Corrections are sized from the trajectory minimum.
pub fn recommend(stats: &GlucoseStats, final_bg: f64, inputs: &RecommendationInputs<'_>) -> Recommendation {
    match dose_advice(stats, final_bg, inputs) {
        Ok(recommendation) => recommendation,
        Err(err) => {
            warn!("Recommendation unavailable: {}", err);
            Recommendation::Unavailable { reason: err.to_string() }
        },
    }
}

fn dose_advice(stats: &GlucoseStats, final_bg: f64, inputs: &RecommendationInputs<'_>) -> GDResult<Recommendation> {
    let profile = inputs.profile;
    let target = inputs.target;
    let initial = profile.initial_bg;
    let basal = inputs.basal.units_per_hour;
    let sensitivity = profile.sensitivity_factor;

    if final_bg > target.max {
        let value = (stats.min - target.max) / sensitivity;
        if value <= 0.0 {
            return Ok(Recommendation::Unavailable {
                reason: format!(
                    "trajectory ends high but already dips to {:.0} mg/dL on the way",
                    stats.min
                ),
            });
        }

        if initial > target.max {
            debug!("Correction bolus of {:.2} U", value);
            let units = (value * 10.0).round() / 10.0;
            if units <= 0.0 {
                return Ok(Recommendation::Unavailable {
                    reason: format!("correction of {:.2} U is below the 0.1 U bolus step", value),
                });
            }
            return Ok(Recommendation::Dose { advice: DoseAdvice::Bolus { units } });
        }

        let max_hourly_rate = basal * (inputs.max_temp_basal_percent / 100.0) - basal;
        let advice = temp_basal(value, max_hourly_rate, basal)?;
        return Ok(Recommendation::Dose { advice });
    }

    if final_bg < target.min {
        if initial < target.min {
            let grams = (target.min - initial) / sensitivity * profile.carb_ratio;
            debug!("Correction carbs of {:.1} g", grams);
            return Ok(Recommendation::Dose { advice: DoseAdvice::Eat { grams } });
        }

        let min_hourly_rate = -basal;
        let value = (stats.min - target.min) / sensitivity;
        let advice = temp_basal(value, min_hourly_rate, basal)?;
        return Ok(Recommendation::Dose { advice });
    }

    Ok(Recommendation::None)
}

/// Temp basal that delivers `value` extra units at no more than
/// `hourly_limit` U/h, in half-hour steps.
fn temp_basal(value: f64, hourly_limit: f64, basal: f64) -> GDResult<DoseAdvice> {
    if hourly_limit == 0.0 || basal == 0.0 {
        return Err(GlucodynError::DivisionByZero(format!(
            "temp basal has no room to adjust (basal {} U/h, limit {} U/h)",
            basal, hourly_limit
        )));
    }

    let hours = (value / hourly_limit * 2.0).ceil() / 2.0;
    if hours == 0.0 {
        return Err(GlucodynError::DivisionByZero(format!(
            "correction of {:.2} U rounds to 0 hours of temp basal",
            value
        )));
    }
    if hours < 0.0 || !hours.is_finite() {
        return Err(GlucodynError::InvalidConfiguration(format!(
            "temp basal limit of {} U/h cannot deliver a correction of {:.2} U",
            hourly_limit, value
        )));
    }

    let hourly_value = value / hours;
    let percent = (hourly_value + basal) / basal * 100.0;
    debug!("Temp basal {:.1}% for {} h ({:.2} U extra)", percent, hours, value);

    Ok(DoseAdvice::TempBasal { percent: percent.round(), hours })
}
