use super::integrate::{simpson, IntegrationRule, SIMPSON_INTERVALS};
use super::InsulinDuration;

/// Percent of a bolus still active `elapsed` minutes after delivery.
///
/// Walsh activity curves: one quartic fit per supported duration. Some fits
/// rise above their starting level in the first minutes, so the value is
/// capped at the fitted constant term.
pub fn iob(elapsed: f64, duration: InsulinDuration) -> f64 {
    if elapsed <= 0.0 {
        return 100.0;
    }
    if elapsed >= duration.minutes() {
        return 0.0;
    }

    let [c4, c3, c2, c1, c0] = duration.walsh_coefficients();
    let g = elapsed;
    let remaining = c4 * g.powi(4) + c3 * g.powi(3) + c2 * g.powi(2) + c1 * g + c0;

    remaining.clamp(0.0, c0)
}

/// Integral of `iob(now - x)` for delivery times `x` in `[x1, x2]`.
///
/// Units are percent·minutes. Used for continuous deliveries such as a
/// temporary basal, where every instant in the window is its own bolus.
pub fn int_iob(x1: f64, x2: f64, duration: InsulinDuration, now: f64, rule: IntegrationRule) -> f64 {
    simpson(|x| iob(now - x, duration), x1, x2, SIMPSON_INTERVALS, rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_iob_endpoints() {
        for duration in InsulinDuration::ALL {
            assert_eq!(iob(0.0, duration), 100.0);
            assert_eq!(iob(-15.0, duration), 100.0);
            assert_eq!(iob(duration.minutes(), duration), 0.0);
            assert_eq!(iob(duration.minutes() + 60.0, duration), 0.0);
        }
    }

    #[test]
    fn test_iob_stays_in_percent_range_and_decays() {
        for duration in InsulinDuration::ALL {
            let end = duration.minutes() as usize;
            let mut previous = iob(0.0, duration);
            for minute in 1..=end {
                let value = iob(minute as f64, duration);
                assert!((0.0..=100.0).contains(&value));
                assert!(value <= previous, "{:?} rose at {} min", duration, minute);
                previous = value;
            }
            assert!(iob(duration.minutes() / 2.0, duration) < iob(10.0, duration));
        }
    }

    #[test]
    fn test_iob_four_hour_midpoint() {
        let g: f64 = 120.0;
        let expected = -3.31e-8 * g.powi(4) + 2.53e-5 * g.powi(3) - 5.51e-3 * g.powi(2) - 9.086e-2 * g + 99.95;
        assert_relative_eq!(iob(g, InsulinDuration::Four), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_int_iob_bounds() {
        let d = InsulinDuration::Four;
        assert_eq!(int_iob(30.0, 30.0, d, 90.0, IntegrationRule::Simpson), 0.0);

        // Window entirely in the future: nothing absorbed yet.
        let pending = int_iob(60.0, 120.0, d, 0.0, IntegrationRule::Simpson);
        assert_relative_eq!(pending, 100.0 * 60.0, epsilon = 1e-9);

        // Window long past: everything absorbed.
        let spent = int_iob(0.0, 60.0, d, 400.0, IntegrationRule::Simpson);
        assert_eq!(spent, 0.0);

        for now in [0.0, 45.0, 90.0, 200.0, 300.0] {
            assert!(int_iob(0.0, 120.0, d, now, IntegrationRule::Simpson) >= 0.0);
        }
    }

    #[test]
    fn test_int_iob_legacy_undercounts_pending_window() {
        let d = InsulinDuration::Three;
        let legacy = int_iob(0.0, 60.0, d, 0.0, IntegrationRule::Legacy);
        assert_relative_eq!(legacy, 100.0 * 60.0 * 146.0 / 150.0, epsilon = 1e-9);
    }
}
