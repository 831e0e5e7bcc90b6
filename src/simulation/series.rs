use serde::{Deserialize, Serialize};

/// Simulated trajectory, one value per grid sample, all in mg/dL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSeries {
    pub time: Vec<f64>,
    /// Cumulative effect of carbohydrates.
    pub carbs: Vec<f64>,
    /// Cumulative effect of insulin (boluses and temp basals).
    pub insulin: Vec<f64>,
    /// Initial BG plus both effects.
    pub bg: Vec<f64>,
}

/// One grid sample of a [`SimulationSeries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub time: f64,
    pub carbs: f64,
    pub insulin: f64,
    pub bg: f64,
}

impl SimulationSeries {
    pub fn with_capacity(points: usize) -> Self {
        Self {
            time: Vec::with_capacity(points),
            carbs: Vec::with_capacity(points),
            insulin: Vec::with_capacity(points),
            bg: Vec::with_capacity(points),
        }
    }

    pub fn push(&mut self, point: SeriesPoint) {
        self.time.push(point.time);
        self.carbs.push(point.carbs);
        self.insulin.push(point.insulin);
        self.bg.push(point.bg);
    }

    pub fn len(&self) -> usize {
        self.bg.len()
    }

    pub fn final_value(&self) -> Option<f64> {
        self.bg.last().copied()
    }

    pub fn points(&self) -> impl Iterator<Item = SeriesPoint> + '_ {
        (0..self.len()).map(move |i| SeriesPoint {
            time: self.time[i],
            carbs: self.carbs[i],
            insulin: self.insulin[i],
            bg: self.bg[i],
        })
    }
}
