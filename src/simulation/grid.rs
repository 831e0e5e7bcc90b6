use serde::{Deserialize, Serialize};
use crate::error::{GlucodynError, GDResult};

/// `points` evenly spaced sample times starting at zero, `dt = length / points`.
///
/// The last sample sits one step short of the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationGrid {
    pub points: usize,
    pub length_minutes: f64,
}

impl SimulationGrid {
    pub fn new(points: usize, length_minutes: f64) -> GDResult<Self> {
        if points == 0 {
            return Err(GlucodynError::InvalidConfiguration(
                "Simulation grid needs at least one point".to_string()
            ));
        }
        if !length_minutes.is_finite() || length_minutes <= 0.0 {
            return Err(GlucodynError::InvalidConfiguration(
                format!("Simulation length must be positive, got {} min", length_minutes)
            ));
        }

        Ok(Self { points, length_minutes })
    }

    pub fn dt(&self) -> f64 {
        self.length_minutes / self.points as f64
    }

    pub fn time(&self, index: usize) -> f64 {
        index as f64 * self.dt()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.points).map(move |i| self.time(i))
    }
}
