//! Percentile with linear interpolation between order statistics

/// q-th quantile (q in [0, 1]) of `values`
///
/// Uses rank h = (n − 1)·q and interpolates linearly between the two
/// neighbouring order statistics. `None` for empty input or q outside [0, 1].
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;

    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interpolates() {
        let v = [4.0, 1.0, 3.0, 2.0];
        // h = 3 * 0.7 = 2.1 -> 3 + 0.1 * (4 - 3)
        assert_relative_eq!(percentile(&v, 0.7).unwrap(), 3.1, epsilon = 1e-12);
        assert_relative_eq!(percentile(&v, 0.5).unwrap(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_bounds() {
        let v = [10.0, 20.0, 30.0];
        assert_eq!(percentile(&v, 0.0), Some(10.0));
        assert_eq!(percentile(&v, 1.0), Some(30.0));
        assert_eq!(percentile(&[7.0], 0.7), Some(7.0));
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(percentile(&[], 0.5), None);
        assert_eq!(percentile(&[1.0], 1.2), None);
    }
}
