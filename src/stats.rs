//! Statistics primitives shared by the detectors

/// Arithmetic mean. Empty input yields 0; callers guard on length first.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, defined as 0 for fewer than two points
pub fn stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Absolute z-score of `value` against a baseline.
///
/// A zero standard deviation is replaced by 1 so a constant baseline
/// never divides by zero.
pub fn z_score(value: f64, mean: f64, stddev: f64) -> f64 {
    let denom = if stddev == 0.0 { 1.0 } else { stddev };
    (value - mean).abs() / denom
}
