use serde::{Deserialize, Serialize};

/// Number of subintervals used for every quadrature. Must stay even.
pub const SIMPSON_INTERVALS: usize = 50;

/// Summation rule used by [`simpson`].
///
/// `Simpson` is the composite Simpson's rule over all subintervals.
/// `Legacy` reproduces the older web calculator, whose loop stopped two
/// nodes early and so dropped the `4·f(x[n-1])` term. It exists only for
/// output parity with that tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationRule {
    #[default]
    Simpson,
    Legacy,
}

/// Definite integral of `f` over `[x1, x2]` with `intervals` subintervals.
pub fn simpson<F>(f: F, x1: f64, x2: f64, intervals: usize, rule: IntegrationRule) -> f64
where
    F: Fn(f64) -> f64,
{
    debug_assert!(intervals >= 2 && intervals % 2 == 0, "interval count must be even");

    let dx = (x2 - x1) / intervals as f64;
    if dx == 0.0 {
        return 0.0;
    }

    let node = |i: usize| f(x1 + i as f64 * dx);

    // Odd nodes weigh 4, even interior nodes weigh 2.
    let last_odd = match rule {
        IntegrationRule::Simpson => intervals - 1,
        IntegrationRule::Legacy => intervals.saturating_sub(3),
    };

    let mut sum = node(0) + node(intervals);
    let mut i = 1;
    while i <= last_odd {
        sum += 4.0 * node(i);
        if i + 1 < intervals {
            sum += 2.0 * node(i + 1);
        }
        i += 2;
    }

    sum * dx / 3.0
}
