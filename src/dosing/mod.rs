use serde::{Deserialize, Serialize};
use crate::error::{GlucodynError, GDResult};

/// Something the user did that moves blood glucose. `time` is minutes after
/// the simulation start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DosingEvent {
    Bolus {
        time: f64,
        units: f64,
    },
    Carbs {
        time: f64,
        grams: f64,
        carb_type: f64, // absorption time, minutes
    },
    /// Bolus taken together with a meal.
    Meal {
        time: f64,
        units: f64,
        grams: f64,
        carb_type: f64,
    },
    TempBasal {
        time: f64,
        rate_percent: f64,
        duration: f64, // minutes
    },
}

impl DosingEvent {
    pub fn time(&self) -> f64 {
        match *self {
            DosingEvent::Bolus { time, .. }
            | DosingEvent::Carbs { time, .. }
            | DosingEvent::Meal { time, .. }
            | DosingEvent::TempBasal { time, .. } => time,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DosingEvent::Bolus { .. } => "bolus",
            DosingEvent::Carbs { .. } => "carbs",
            DosingEvent::Meal { .. } => "meal",
            DosingEvent::TempBasal { .. } => "temp_basal",
        }
    }

    pub fn validate(&self) -> GDResult<()> {
        check_non_negative(self.kind(), "time", self.time())?;

        match *self {
            DosingEvent::Bolus { units, .. } => {
                check_non_negative("bolus", "units", units)?;
            },
            DosingEvent::Carbs { grams, carb_type, .. } => {
                check_non_negative("carbs", "grams", grams)?;
                check_positive("carbs", "carb_type", carb_type)?;
            },
            DosingEvent::Meal { units, grams, carb_type, .. } => {
                check_non_negative("meal", "units", units)?;
                check_non_negative("meal", "grams", grams)?;
                check_positive("meal", "carb_type", carb_type)?;
            },
            DosingEvent::TempBasal { rate_percent, duration, .. } => {
                check_non_negative("temp_basal", "rate_percent", rate_percent)?;
                check_positive("temp_basal", "duration", duration)?;
            },
        }

        Ok(())
    }
}

fn check_non_negative(kind: &str, field: &str, value: f64) -> GDResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(GlucodynError::InvalidEvent(
            format!("{} {} must be a non-negative number, got {}", kind, field, value)
        ));
    }
    Ok(())
}

fn check_positive(kind: &str, field: &str, value: f64) -> GDResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GlucodynError::InvalidEvent(
            format!("{} {} must be positive, got {}", kind, field, value)
        ));
    }
    Ok(())
}

/// Validated events, ordered by time.
#[derive(Debug, Clone, Default)]
pub struct DosingRegimen {
    pub events: Vec<DosingEvent>,
}

impl DosingRegimen {
    pub fn new(events: &[DosingEvent]) -> GDResult<Self> {
        for event in events {
            event.validate()?;
        }

        let mut events = events.to_vec();
        events.sort_by(|a, b| a.time().total_cmp(&b.time()));

        Ok(Self { events })
    }

    /// Events that have started at or before `time`. Later events cannot
    /// have moved glucose yet.
    pub fn events_started_by(&self, time: f64) -> impl Iterator<Item = &DosingEvent> {
        self.events.iter().take_while(move |event| event.time() <= time)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
