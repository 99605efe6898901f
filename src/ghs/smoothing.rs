//! Thinning of dense Monte Carlo curves for marker plots.

/// Average runs of consecutive points so successive output points sit
/// roughly `dpath` apart along the curve.
///
/// A run starts at the last emitted boundary and closes at the first point at
/// least `dpath` away from it (or at the final point); the closing point
/// itself belongs to the next run.
pub fn avg_points(x: &[f64], y: &[f64], dpath: f64) -> (Vec<f64>, Vec<f64>) {
    let n = x.len().min(y.len());
    let mut new_x = Vec::new();
    let mut new_y = Vec::new();
    let mut start = 0;
    for i in 1..n {
        let dist = (x[i] - x[start]).hypot(y[i] - y[start]);
        if dist >= dpath || i == n - 1 {
            new_x.push(mean(&x[start..i]));
            new_y.push(mean(&y[start..i]));
            start = i;
        }
    }
    (new_x, new_y)
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}
