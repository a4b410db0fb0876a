use super::error::InvalidMetricValue;

/// Converts a (target, actual) pair into an attainment percentage.
///
/// A non-positive target means nothing is measurable and yields 0. Normal
/// metrics are not clamped above 100; inverse metrics are floored at 0.
pub fn normalize(target: f64, actual: f64, inverse: bool) -> Result<f64, InvalidMetricValue> {
    if !actual.is_finite() || actual < 0.0 {
        return Err(InvalidMetricValue { actual });
    }

    // NaN targets fall under the zero-target policy.
    if target.is_nan() || target <= 0.0 {
        return Ok(0.0);
    }

    if inverse {
        Ok(((target - actual) / target * 100.0).max(0.0))
    } else {
        Ok(actual / target * 100.0)
    }
}
