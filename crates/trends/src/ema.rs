//! Exponentially weighted moving average.
//!
//! Matches pandas `Series.ewm(span=n).mean()` with the default adjust=True
//! weighting: each value is the weighted mean of all observations so far,
//! with weights (1-alpha)^age and alpha = 2 / (span + 1).

/// Smooth a series of counts with span-parameterized EMA weighting.
pub fn ema(values: &[f32], span: u32) -> Vec<f32> {
    let alpha = 2.0 / (span as f32 + 1.0);
    let decay = 1.0 - alpha;

    let mut out = Vec::with_capacity(values.len());
    let mut num = 0.0f32;
    let mut den = 0.0f32;
    for &v in values {
        num = v + decay * num;
        den = 1.0 + decay * den;
        out.push(num / den);
    }
    out
}

/// First difference of a series; the first element maps to 0.0
pub fn diff(values: &[f32]) -> Vec<f32> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| if i == 0 { 0.0 } else { v - values[i - 1] })
        .collect()
}
