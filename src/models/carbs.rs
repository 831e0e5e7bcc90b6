/// Fraction of a carb load absorbed `elapsed` minutes after eating.
///
/// Triangular absorption rate peaking at `carb_type / 2`, so the cumulative
/// curve is two quadratic pieces meeting at 0.5.
pub fn cob(elapsed: f64, carb_type: f64) -> f64 {
    let g = elapsed;
    let ct = carb_type;

    if g <= 0.0 {
        0.0
    } else if g >= ct {
        1.0
    } else if g <= ct / 2.0 {
        2.0 / ct.powi(2) * g.powi(2)
    } else {
        -1.0 + 4.0 / ct * (g - g.powi(2) / (2.0 * ct))
    }
}
