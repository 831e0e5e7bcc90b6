pub mod delta;
pub mod grid;
pub mod series;
pub mod statistics;
pub mod recommendation;

use crate::config::{Config, TargetRange};
use crate::dosing::{DosingEvent, DosingRegimen};
use crate::error::{GlucodynError, GDResult};
use crate::models::{BasalRate, IntegrationRule, UserProfile};
use log::{info, debug};
use serde::{Deserialize, Serialize};

pub use delta::*;
pub use grid::SimulationGrid;
pub use series::{SeriesPoint, SimulationSeries};
pub use statistics::GlucoseStats;
pub use recommendation::{recommend, DoseAdvice, Recommendation, RecommendationInputs};

/// Knobs that do not describe the person: grid, target band, pump limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    pub grid: SimulationGrid,
    pub target: TargetRange,
    pub max_temp_basal_percent: f64,
    pub integration: IntegrationRule,
}

impl SimulationSettings {
    pub fn new(
        grid_points: usize,
        length_minutes: f64,
        target: TargetRange,
        max_temp_basal_percent: f64,
        integration: IntegrationRule,
    ) -> GDResult<Self> {
        let grid = SimulationGrid::new(grid_points, length_minutes)?;
        target.validate()?;

        // Below 100% a temp basal could never raise delivery.
        if !max_temp_basal_percent.is_finite() || max_temp_basal_percent < 100.0 {
            return Err(GlucodynError::InvalidConfiguration(
                format!("max_temp_basal_percent must be at least 100, got {}", max_temp_basal_percent)
            ));
        }

        Ok(Self {
            grid,
            target,
            max_temp_basal_percent,
            integration,
        })
    }
}

/// Validated input for one run.
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub profile: UserProfile,
    pub basal: BasalRate,
    pub regimen: DosingRegimen,
    pub settings: SimulationSettings,
}

impl SimulationRequest {
    pub fn new(
        profile: UserProfile,
        events: &[DosingEvent],
        basal: BasalRate,
        grid_points: usize,
        target: TargetRange,
        max_temp_basal_percent: f64,
        integration: IntegrationRule,
    ) -> GDResult<Self> {
        profile.validate()?;
        basal.validate()?;
        let settings = SimulationSettings::new(
            grid_points,
            profile.simulation_length_minutes(),
            target,
            max_temp_basal_percent,
            integration,
        )?;
        let regimen = DosingRegimen::new(events)?;

        Ok(Self {
            profile,
            basal,
            regimen,
            settings,
        })
    }

    pub fn from_config(config: &Config) -> GDResult<Self> {
        config.validate()?;

        let schedule = config.schedule.as_ref();
        if let Some(schedule) = schedule {
            info!("Resolving therapy schedule at {}", schedule.start_time.format("%H:%M"));
        }

        let profile = UserProfile::from_config(&config.profile, schedule)?;
        let basal = BasalRate::from_config(&config.basal, schedule)?;
        let sim = &config.simulation;

        Self::new(
            profile,
            &config.events,
            basal,
            sim.grid_points,
            sim.target,
            sim.max_temp_basal_percent,
            sim.integration,
        )
    }
}

/// Effect of one event on the insulin and carb series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EventContribution {
    pub insulin: f64,
    pub carbs: f64,
}

impl EventContribution {
    pub fn total(&self) -> f64 {
        self.insulin + self.carbs
    }
}

/// Net BG change an event has caused by the end of the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEffect {
    pub kind: String,
    pub time: f64,
    pub net_effect: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub profile: UserProfile,
    pub series: SimulationSeries,
    pub stats: GlucoseStats,
    pub recommendation: Recommendation,
    pub event_effects: Vec<EventEffect>,
}

pub fn event_contribution(
    event: &DosingEvent,
    elapsed: f64,
    profile: &UserProfile,
    basal: &BasalRate,
    rule: IntegrationRule,
) -> EventContribution {
    let sf = profile.sensitivity_factor;
    let idur = profile.insulin_duration;

    match *event {
        DosingEvent::Bolus { units, .. } => EventContribution {
            insulin: delta_bgi(elapsed, units, sf, idur),
            carbs: 0.0,
        },
        DosingEvent::Carbs { grams, carb_type, .. } => EventContribution {
            insulin: 0.0,
            carbs: delta_bgc(elapsed, sf, profile.carb_ratio, grams, carb_type),
        },
        DosingEvent::Meal { units, grams, carb_type, .. } => EventContribution {
            insulin: delta_bgi(elapsed, units, sf, idur),
            carbs: delta_bgc(elapsed, sf, profile.carb_ratio, grams, carb_type),
        },
        DosingEvent::TempBasal { rate_percent, duration, .. } => EventContribution {
            insulin: delta_temp_bgi(
                elapsed,
                basal.temp_delta_per_minute(rate_percent),
                sf,
                idur,
                0.0,
                duration,
                rule,
            ),
            carbs: 0.0,
        },
    }
}

fn net_effect(event: &DosingEvent, elapsed: f64, profile: &UserProfile, basal: &BasalRate, rule: IntegrationRule) -> f64 {
    match *event {
        DosingEvent::Meal { units, grams, carb_type, .. } => delta_bg(
            elapsed,
            profile.sensitivity_factor,
            profile.carb_ratio,
            grams,
            carb_type,
            units,
            profile.insulin_duration,
        ),
        _ => event_contribution(event, elapsed, profile, basal, rule).total(),
    }
}

/// Superpose every event onto the grid. Each sample is computed from
/// absolute elapsed times only, so samples are independent of each other.
pub fn build_series(request: &SimulationRequest) -> SimulationSeries {
    let grid = request.settings.grid;
    let rule = request.settings.integration;
    let mut series = SimulationSeries::with_capacity(grid.points);

    for time in grid.times() {
        let mut total = EventContribution::default();
        for event in request.regimen.events_started_by(time) {
            let c = event_contribution(event, time - event.time(), &request.profile, &request.basal, rule);
            total.insulin += c.insulin;
            total.carbs += c.carbs;
        }

        series.push(SeriesPoint {
            time,
            carbs: total.carbs,
            insulin: total.insulin,
            bg: request.profile.initial_bg + total.insulin + total.carbs,
        });
    }

    series
}

pub fn run_simulation(request: &SimulationRequest) -> GDResult<SimulationResult> {
    let settings = &request.settings;
    info!(
        "Simulating {} h on {} points with {} events",
        request.profile.simulation_length_hours,
        settings.grid.points,
        request.regimen.len()
    );
    if request.regimen.is_empty() {
        debug!("No events recorded, trajectory stays at {} mg/dL", request.profile.initial_bg);
    }

    let series = build_series(request);

    let stats = GlucoseStats::from_series(&series.bg).ok_or_else(|| {
        GlucodynError::InvalidConfiguration("Simulation produced no samples".to_string())
    })?;
    let final_bg = series.final_value().unwrap_or(request.profile.initial_bg);

    let inputs = RecommendationInputs {
        profile: &request.profile,
        basal: request.basal,
        target: settings.target,
        max_temp_basal_percent: settings.max_temp_basal_percent,
    };
    let recommendation = recommend(&stats, final_bg, &inputs);

    let horizon = settings.grid.length_minutes;
    let event_effects = request.regimen.events.iter()
        .map(|event| {
            let effect = net_effect(event, horizon - event.time(), &request.profile, &request.basal, settings.integration);
            debug!("{} at {} min: {:+.1} mg/dL by end of run", event.kind(), event.time(), effect);
            EventEffect {
                kind: event.kind().to_string(),
                time: event.time(),
                net_effect: effect,
            }
        })
        .collect();

    info!(
        "Simulation completed: avg {:.0}, min {:.0}, max {:.0} mg/dL",
        stats.average, stats.min, stats.max
    );

    Ok(SimulationResult {
        profile: request.profile.clone(),
        series,
        stats,
        recommendation,
        event_effects,
    })
}

/// Config-driven entry point used by the binary.
pub struct Simulator {
    request: SimulationRequest,
}

impl Simulator {
    pub fn new(config: &Config) -> GDResult<Self> {
        let request = SimulationRequest::from_config(config)?;
        Ok(Self { request })
    }

    pub fn request(&self) -> &SimulationRequest {
        &self.request
    }

    pub fn run(&self) -> GDResult<SimulationResult> {
        run_simulation(&self.request)
    }
}
