use crate::simulation::SimulationResult;
use crate::error::GDResult;
use std::path::Path;
use std::fs::File;
use log::info;

pub fn save_results<P: AsRef<Path>>(result: &SimulationResult, output_dir: P) -> GDResult<()> {
    let output_path = output_dir.as_ref();

    save_series(result, &output_path.join("series.csv"))?;
    save_summary(result, &output_path.join("summary.json"))?;

    info!("All results saved to {:?}", output_path);
    Ok(())
}

fn save_series<P: AsRef<Path>>(result: &SimulationResult, path: P) -> GDResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(["TIME", "BG_CARBS", "BG_INSULIN", "BG"])?;

    for point in result.series.points() {
        writer.write_record(&[
            point.time.to_string(),
            point.carbs.to_string(),
            point.insulin.to_string(),
            point.bg.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn save_summary<P: AsRef<Path>>(result: &SimulationResult, path: P) -> GDResult<()> {
    let summary = serde_json::json!({
        "stats": result.stats,
        "recommendation": result.recommendation,
        "dose": result.recommendation.display_text(),
        "event_effects": result.event_effects,
    });

    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &summary)?;
    Ok(())
}

/// Human-readable summary of one run.
pub fn generate_report<P: AsRef<Path>>(result: &SimulationResult, output_dir: P) -> GDResult<()> {
    let report_path = output_dir.as_ref().join("report.md");
    let profile = &result.profile;
    let stats = &result.stats;

    let effects = if result.event_effects.is_empty() {
        "- none\n".to_string()
    } else {
        result.event_effects.iter()
            .map(|e| format!("- {} at {} min: {:+.1} mg/dL\n", e.kind, e.time, e.net_effect))
            .collect::<String>()
    };

    let report_content = format!(
        r#"# Blood Glucose Simulation Report

Generated: {}

## Profile
- **Carb ratio**: {} g/U
- **Sensitivity factor**: {} mg/dL/U
- **Insulin duration**: {} h
- **Initial BG**: {} mg/dL
- **Simulated**: {} h

## Trajectory
- Average: {:.0} mg/dL
- SD: {:.0} mg/dL
- Min: {:.0} mg/dL
- Max: {:.0} mg/dL
- Final: {:.0} mg/dL

## Events (net effect by end of run)
{}
## Recommendation
{}
"#,
        chrono::Local::now().format("%Y-%m-%d %H:%M"),
        profile.carb_ratio,
        profile.sensitivity_factor,
        profile.insulin_duration.hours(),
        profile.initial_bg,
        profile.simulation_length_hours,
        stats.average,
        stats.std_dev,
        stats.min,
        stats.max,
        result.series.final_value().unwrap_or(profile.initial_bg),
        effects,
        result.recommendation.display_text().unwrap_or_else(|| "None, trajectory ends in range".to_string()),
    );

    std::fs::write(report_path, report_content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetRange;
    use crate::dosing::DosingEvent;
    use crate::models::{BasalRate, InsulinDuration, IntegrationRule, UserProfile};
    use crate::simulation::{run_simulation, SimulationRequest};

    fn result() -> SimulationResult {
        let profile = UserProfile {
            carb_ratio: 10.0,
            sensitivity_factor: 50.0,
            insulin_duration: InsulinDuration::Four,
            initial_bg: 100.0,
            simulation_length_hours: 5.0,
        };
        let request = SimulationRequest::new(
            profile,
            &[DosingEvent::Bolus { time: 0.0, units: 10.0 }],
            BasalRate { units_per_hour: 1.0 },
            75,
            TargetRange::default(),
            200.0,
            IntegrationRule::Simpson,
        )
        .unwrap();
        run_simulation(&request).unwrap()
    }

    #[test]
    fn test_save_results_writes_series_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        save_results(&result(), dir.path()).unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join("series.csv")).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["TIME", "BG_CARBS", "BG_INSULIN", "BG"]);
        assert_eq!(reader.records().count(), 75);

        let summary: serde_json::Value =
            serde_json::from_reader(File::open(dir.path().join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["recommendation"]["status"], "dose");
        assert_eq!(summary["dose"], "TempBasal: 4% for 10 hours");
        assert_eq!(summary["stats"]["min"], -400.0);
    }

    #[test]
    fn test_generate_report() {
        let dir = tempfile::tempdir().unwrap();
        generate_report(&result(), dir.path()).unwrap();

        let report = std::fs::read_to_string(dir.path().join("report.md")).unwrap();
        assert!(report.contains("- Min: -400 mg/dL"));
        assert!(report.contains("- bolus at 0 min: -500.0 mg/dL"));
        assert!(report.contains("TempBasal: 4% for 10 hours"));
    }
}
