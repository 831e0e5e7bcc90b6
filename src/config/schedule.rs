//! Time-of-day therapy schedules as programmed on an insulin pump.
//!
//! Each schedule is a list of entries keyed by minutes after midnight. The
//! value in force at a given time is the one from the last entry whose
//! offset has already passed.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use crate::error::{GlucodynError, GDResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Clock time at which the simulation starts.
    pub start_time: NaiveTime,
    #[serde(default)]
    pub carb_ratios: Vec<ScheduleEntry>,
    #[serde(default)]
    pub sensitivities: Vec<ScheduleEntry>,
    #[serde(default)]
    pub basal_rates: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub offset: f64, // minutes after midnight
    pub value: f64,
}

impl ScheduleConfig {
    pub fn carb_ratio_at_start(&self) -> GDResult<Option<f64>> {
        lookup("carb ratio", &self.carb_ratios, self.start_time)
    }

    pub fn sensitivity_at_start(&self) -> GDResult<Option<f64>> {
        lookup("sensitivity", &self.sensitivities, self.start_time)
    }

    pub fn basal_rate_at_start(&self) -> GDResult<Option<f64>> {
        lookup("basal rate", &self.basal_rates, self.start_time)
    }
}

pub fn minutes_after_midnight(time: NaiveTime) -> f64 {
    f64::from(time.num_seconds_from_midnight()) / 60.0
}

/// Value in force at `time`, or `None` if no entry has started yet.
pub fn value_at(schedule: &[ScheduleEntry], time: NaiveTime) -> Option<f64> {
    let minute = minutes_after_midnight(time);

    let mut sorted: Vec<&ScheduleEntry> = schedule.iter().collect();
    sorted.sort_by(|a, b| a.offset.total_cmp(&b.offset));

    sorted
        .into_iter()
        .take_while(|entry| entry.offset <= minute)
        .last()
        .map(|entry| entry.value)
}

fn lookup(name: &str, schedule: &[ScheduleEntry], time: NaiveTime) -> GDResult<Option<f64>> {
    if schedule.is_empty() {
        return Ok(None);
    }

    value_at(schedule, time).map(Some).ok_or_else(|| {
        GlucodynError::InvalidConfiguration(format!(
            "No {} scheduled at {} ({} min after midnight)",
            name,
            time.format("%H:%M"),
            minutes_after_midnight(time)
        ))
    })
}
