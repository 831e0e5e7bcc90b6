//! Blood glucose contributions of single events, in mg/dL.
//!
//! `elapsed` is always minutes since the event started. Insulin terms are
//! negative, carb terms positive.

use crate::models::{cob, int_iob, iob, InsulinDuration, IntegrationRule};

/// Change from a bolus as its insulin is used up.
pub fn delta_bgi(elapsed: f64, bolus: f64, sensitivity: f64, duration: InsulinDuration) -> f64 {
    -bolus * sensitivity * (1.0 - iob(elapsed, duration) / 100.0)
}

/// Change from a carb load as it is absorbed.
pub fn delta_bgc(elapsed: f64, sensitivity: f64, carb_ratio: f64, grams: f64, carb_type: f64) -> f64 {
    sensitivity / carb_ratio * grams * cob(elapsed, carb_type)
}

/// Combined change from a bolus and a carb load taken together.
pub fn delta_bg(
    elapsed: f64,
    sensitivity: f64,
    carb_ratio: f64,
    grams: f64,
    carb_type: f64,
    bolus: f64,
    duration: InsulinDuration,
) -> f64 {
    delta_bgi(elapsed, bolus, sensitivity, duration) + delta_bgc(elapsed, sensitivity, carb_ratio, grams, carb_type)
}

/// Change from a basal rate offset of `rate_delta` U/min delivered over
/// `[t1, t2]` (minutes after the event start).
pub fn delta_temp_bgi(
    elapsed: f64,
    rate_delta: f64,
    sensitivity: f64,
    duration: InsulinDuration,
    t1: f64,
    t2: f64,
    rule: IntegrationRule,
) -> f64 {
    -rate_delta * sensitivity * ((t2 - t1) - int_iob(t1, t2, duration, elapsed, rule) / 100.0)
}
