//! Two-decimal normalisation shared by the sampler, the interval notation and the validators.
//!
//! Every coordinate the engine exposes is either rounded (grid x values, interval bounds) or
//! truncated (reported extrema) to hundredths, and membership sets are compared as integer
//! hundredths so that `0.1 + 0.2` and `0.3` land in the same bucket.

/// round to 2 decimals, `-0.0` becomes `0.0`; infinities pass through
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// truncate towards zero at 2 decimals.
/// The nudge absorbs representation error: 0.29 * 100 is 28.999999999999996.
pub fn trunc2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scaled = value * 100.0;
    let truncated = (scaled + scaled.signum() * 1e-7).trunc() / 100.0;
    if truncated == 0.0 { 0.0 } else { truncated }
}

/// integer hundredths used as a hashable key for a coordinate; ±inf map to the i64 extremes
pub fn hundredths(value: f64) -> i64 {
    if value == f64::INFINITY {
        i64::MAX
    } else if value == f64::NEG_INFINITY {
        i64::MIN
    } else {
        (value * 100.0).round() as i64
    }
}

/// Float text the way exercise answers are written: integral values keep one decimal (`1.0`),
/// everything else uses the shortest representation (`0.25`), infinities are signed.
pub fn float_repr(value: f64) -> String {
    if value == f64::INFINITY {
        return "+inf".to_string();
    }
    if value == f64::NEG_INFINITY {
        return "-inf".to_string();
    }
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Grid `round(start + i*step, 2)` for i = 0, 1, ... while the value stays <= end.
pub fn grid(start: f64, end: f64, step: f64) -> Vec<f64> {
    assert!(step > 0.0, "grid step must be positive, got {}", step);
    if !(start.is_finite() && end.is_finite()) || end < start {
        return Vec::new();
    }
    let n = ((end - start) / step + 1e-9).floor() as usize;
    (0..=n)
        .map(|i| round2(start + i as f64 * step))
        .filter(|&x| x <= end)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.001), 0.0);
        assert!(round2(-0.001).is_sign_positive());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
        assert_eq!(round2(0.1 + 0.2), 0.3);
    }

    #[test]
    fn test_trunc2() {
        assert_eq!(trunc2(0.29), 0.29);
        assert_eq!(trunc2(1.999), 1.99);
        assert_eq!(trunc2(-1.999), -1.99);
        assert_eq!(trunc2(5.4756), 5.47);
    }

    #[test]
    fn test_hundredths_keys() {
        assert_eq!(hundredths(-5.0), -500);
        assert_eq!(hundredths(-0.01), -1);
        assert_eq!(hundredths(4.99), 499);
        assert_eq!(hundredths(f64::INFINITY), i64::MAX);
        assert_eq!(hundredths(f64::NEG_INFINITY), i64::MIN);
        assert_eq!(hundredths(0.1 + 0.2), 30);
    }

    #[test]
    fn test_float_repr() {
        assert_eq!(float_repr(1.0), "1.0");
        assert_eq!(float_repr(-1.0), "-1.0");
        assert_eq!(float_repr(-0.0), "0.0");
        assert_eq!(float_repr(0.25), "0.25");
        assert_eq!(float_repr(-2.5), "-2.5");
        assert_eq!(float_repr(f64::NEG_INFINITY), "-inf");
        assert_eq!(float_repr(f64::INFINITY), "+inf");
    }

    #[test]
    fn test_grid() {
        let xs = grid(-1.0, 1.0, 0.1);
        assert_eq!(xs.len(), 21);
        assert_eq!(xs[0], -1.0);
        assert_eq!(xs[10], 0.0);
        assert_eq!(xs[20], 1.0);
        assert_eq!(grid(0.0, 0.05, 0.01), vec![0.0, 0.01, 0.02, 0.03, 0.04, 0.05]);
        assert!(grid(1.0, 0.0, 0.1).is_empty());
        // off-grid end is not reached
        assert_eq!(*grid(0.0, 0.25, 0.1).last().unwrap(), 0.2);
    }
}
