pub mod schedule;

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::dosing::DosingEvent;
use crate::error::{GlucodynError, GDResult};
use crate::models::{BasalRate, IntegrationRule, UserProfile};
use crate::simulation::SimulationSettings;
use self::schedule::ScheduleConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub profile: ProfileConfig,
    pub basal: BasalConfig,
    #[serde(default)]
    pub events: Vec<DosingEvent>,
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub schedule: Option<ScheduleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub carb_ratio: f64,
    pub sensitivity_factor: f64,
    pub insulin_duration_hours: u8, // 3, 4, 5 or 6
    pub initial_bg: f64,
    pub simulation_length_hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasalConfig {
    pub units_per_hour: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_grid_points")]
    pub grid_points: usize,
    #[serde(default)]
    pub target: TargetRange,
    #[serde(default = "default_max_temp_basal_percent")]
    pub max_temp_basal_percent: f64,
    #[serde(default)]
    pub integration: IntegrationRule,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_points: default_grid_points(),
            target: TargetRange::default(),
            max_temp_basal_percent: default_max_temp_basal_percent(),
            integration: IntegrationRule::default(),
        }
    }
}

/// Blood glucose band, in mg/dL, that needs no correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub min: f64,
    pub max: f64,
}

impl Default for TargetRange {
    fn default() -> Self {
        Self { min: 80.0, max: 120.0 }
    }
}

impl TargetRange {
    pub fn validate(&self) -> GDResult<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min >= self.max {
            return Err(GlucodynError::InvalidConfiguration(
                format!("Target range min ({}) must be below max ({})", self.min, self.max)
            ));
        }
        Ok(())
    }
}

fn default_grid_points() -> usize {
    75
}

fn default_max_temp_basal_percent() -> f64 {
    200.0
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> GDResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> GDResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GDResult<()> {
        let profile = UserProfile::from_config(&self.profile, self.schedule.as_ref())?;
        BasalRate::from_config(&self.basal, self.schedule.as_ref())?;

        let sim = &self.simulation;
        SimulationSettings::new(
            sim.grid_points,
            profile.simulation_length_minutes(),
            sim.target,
            sim.max_temp_basal_percent,
            sim.integration,
        )?;

        for event in &self.events {
            event.validate()?;
        }

        Ok(())
    }
}
