pub mod insulin;
pub mod carbs;
pub mod integrate;

use crate::config::{BasalConfig, ProfileConfig};
use crate::config::schedule::ScheduleConfig;
use crate::error::{GlucodynError, GDResult};
use serde::{Deserialize, Serialize};

pub use carbs::cob;
pub use insulin::{int_iob, iob};
pub use integrate::IntegrationRule;

/// Insulin action time. Only the durations with a fitted activity curve exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InsulinDuration {
    Three,
    Four,
    Five,
    Six,
}

impl InsulinDuration {
    pub const ALL: [InsulinDuration; 4] = [
        InsulinDuration::Three,
        InsulinDuration::Four,
        InsulinDuration::Five,
        InsulinDuration::Six,
    ];

    pub fn hours(self) -> u8 {
        match self {
            InsulinDuration::Three => 3,
            InsulinDuration::Four => 4,
            InsulinDuration::Five => 5,
            InsulinDuration::Six => 6,
        }
    }

    pub fn minutes(self) -> f64 {
        f64::from(self.hours()) * 60.0
    }

    /// Quartic coefficients, highest power first.
    pub(crate) fn walsh_coefficients(self) -> [f64; 5] {
        match self {
            InsulinDuration::Three => [-3.203e-7, 1.354e-4, -1.759e-2, 9.255e-2, 99.951],
            InsulinDuration::Four => [-3.31e-8, 2.53e-5, -5.51e-3, -9.086e-2, 99.95],
            InsulinDuration::Five => [-2.95e-8, 2.32e-5, -5.55e-3, 4.49e-2, 99.3],
            InsulinDuration::Six => [-1.493e-8, 1.413e-5, -4.095e-3, 6.365e-2, 99.7],
        }
    }
}

impl TryFrom<u8> for InsulinDuration {
    type Error = GlucodynError;

    fn try_from(hours: u8) -> GDResult<Self> {
        InsulinDuration::ALL
            .into_iter()
            .find(|duration| duration.hours() == hours)
            .ok_or_else(|| GlucodynError::InvalidConfiguration(
                format!("Unsupported insulin duration: {} hours (expected 3, 4, 5 or 6)", hours)
            ))
    }
}

impl From<InsulinDuration> for u8 {
    fn from(duration: InsulinDuration) -> u8 {
        duration.hours()
    }
}

/// Per-user parameters, fixed for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub carb_ratio: f64,           // g per unit
    pub sensitivity_factor: f64,   // mg/dL per unit
    pub insulin_duration: InsulinDuration,
    pub initial_bg: f64,           // mg/dL
    pub simulation_length_hours: f64,
}

impl UserProfile {
    pub fn from_config(config: &ProfileConfig, schedule: Option<&ScheduleConfig>) -> GDResult<Self> {
        let mut profile = Self {
            carb_ratio: config.carb_ratio,
            sensitivity_factor: config.sensitivity_factor,
            insulin_duration: InsulinDuration::try_from(config.insulin_duration_hours)?,
            initial_bg: config.initial_bg,
            simulation_length_hours: config.simulation_length_hours,
        };

        if let Some(schedule) = schedule {
            if let Some(ratio) = schedule.carb_ratio_at_start()? {
                profile.carb_ratio = ratio;
            }
            if let Some(sensitivity) = schedule.sensitivity_at_start()? {
                profile.sensitivity_factor = sensitivity;
            }
        }

        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> GDResult<()> {
        let positive = [
            ("carb_ratio", self.carb_ratio),
            ("sensitivity_factor", self.sensitivity_factor),
            ("simulation_length_hours", self.simulation_length_hours),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GlucodynError::InvalidConfiguration(
                    format!("{} must be positive, got {}", name, value)
                ));
            }
        }

        if !self.initial_bg.is_finite() || self.initial_bg < 0.0 {
            return Err(GlucodynError::InvalidConfiguration(
                format!("initial_bg must be a non-negative number, got {}", self.initial_bg)
            ));
        }

        Ok(())
    }

    pub fn simulation_length_minutes(&self) -> f64 {
        self.simulation_length_hours * 60.0
    }
}

/// Background basal program, only used as the baseline for temp basals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasalRate {
    pub units_per_hour: f64,
}

impl BasalRate {
    pub fn from_config(config: &BasalConfig, schedule: Option<&ScheduleConfig>) -> GDResult<Self> {
        let scheduled = match schedule {
            Some(schedule) => schedule.basal_rate_at_start()?,
            None => None,
        };
        let basal = Self { units_per_hour: scheduled.unwrap_or(config.units_per_hour) };
        basal.validate()?;
        Ok(basal)
    }

    pub fn validate(&self) -> GDResult<()> {
        if !self.units_per_hour.is_finite() || self.units_per_hour < 0.0 {
            return Err(GlucodynError::InvalidConfiguration(
                format!("Basal rate must be non-negative, got {} U/h", self.units_per_hour)
            ));
        }
        Ok(())
    }

    /// Extra insulin per minute delivered by a temp basal at `percent` of this rate.
    pub fn temp_delta_per_minute(&self, percent: f64) -> f64 {
        self.units_per_hour * (percent / 100.0 - 1.0) / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_config() -> ProfileConfig {
        ProfileConfig {
            carb_ratio: 10.0,
            sensitivity_factor: 50.0,
            insulin_duration_hours: 4,
            initial_bg: 100.0,
            simulation_length_hours: 5.0,
        }
    }

    #[test]
    fn test_unsupported_duration_fails_fast() {
        for hours in [0u8, 1, 2, 7, 8] {
            let err = InsulinDuration::try_from(hours).unwrap_err();
            assert!(matches!(err, GlucodynError::InvalidConfiguration(_)));
        }
        assert_eq!(InsulinDuration::try_from(5u8).unwrap(), InsulinDuration::Five);
    }

    #[test]
    fn test_duration_deserializes_from_hours() {
        let d: InsulinDuration = serde_json::from_str("6").unwrap();
        assert_eq!(d, InsulinDuration::Six);
        assert!(serde_json::from_str::<InsulinDuration>("2").is_err());
    }

    #[test]
    fn test_profile_from_config() {
        let profile = UserProfile::from_config(&profile_config(), None).unwrap();
        assert_eq!(profile.insulin_duration, InsulinDuration::Four);
        assert_eq!(profile.simulation_length_minutes(), 300.0);
    }

    #[test]
    fn test_profile_rejects_non_positive_values() {
        let mut config = profile_config();
        config.simulation_length_hours = 0.0;
        assert!(UserProfile::from_config(&config, None).is_err());

        let mut config = profile_config();
        config.carb_ratio = -1.0;
        assert!(UserProfile::from_config(&config, None).is_err());

        let mut config = profile_config();
        config.initial_bg = f64::NAN;
        assert!(UserProfile::from_config(&config, None).is_err());
    }

    #[test]
    fn test_basal_validation() {
        assert!(BasalRate { units_per_hour: 0.0 }.validate().is_ok());
        for bad in [f64::NAN, f64::INFINITY, -0.1] {
            let err = BasalRate { units_per_hour: bad }.validate().unwrap_err();
            assert!(matches!(err, GlucodynError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn test_temp_delta_per_minute() {
        let basal = BasalRate { units_per_hour: 1.2 };
        assert_eq!(basal.temp_delta_per_minute(100.0), 0.0);
        assert!((basal.temp_delta_per_minute(200.0) - 0.02).abs() < 1e-12);
        assert!((basal.temp_delta_per_minute(0.0) + 0.02).abs() < 1e-12);
    }
}
