//! Square-root scaling of raw magnitudes into a bounded visual range
//!
//! The square root compresses the dynamic range so a handful of very large
//! donations do not dwarf every other node or edge in the rendered diagram.

/// Closed output interval for a visual dimension (node size, edge thickness)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleRange {
    /// Value assigned to the smallest input
    pub min: f64,
    /// Value assigned to the largest input
    pub max: f64,
}

impl ScaleRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the interval
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp a value into the interval
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// Map `values` into `range` through a square-root transform.
///
/// `scaled(v) = min + span * (sqrt(v) - sqrt(lo)) / (sqrt(hi) - sqrt(lo))`
/// where `lo`/`hi` are the smallest and largest inputs. The output is aligned
/// by index with the input.
///
/// When every input is equal the denominator vanishes; every value then maps
/// to `range.min`. An empty input yields an empty output. Negative inputs are
/// treated as zero.
pub fn sqrt_scale(values: &[f64], range: ScaleRange) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let roots: Vec<f64> = values.iter().map(|v| v.max(0.0).sqrt()).collect();
    let lo = roots.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = roots.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let denom = hi - lo;

    if denom <= 0.0 || !denom.is_finite() {
        return vec![range.min; values.len()];
    }

    roots
        .into_iter()
        .map(|root| range.clamp(range.min + range.span() * (root - lo) / denom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZES: ScaleRange = ScaleRange::new(10.0, 100.0);
    const THICKNESS: ScaleRange = ScaleRange::new(1.0, 10.0);

    #[test]
    fn test_endpoints_map_to_bounds() {
        let scaled = sqrt_scale(&[400.0, 100.0, 2500.0, 900.0], SIZES);
        assert_eq!(scaled[1], 10.0);
        assert_eq!(scaled[2], 100.0);
        for v in &scaled {
            assert!(*v >= 10.0 && *v <= 100.0);
        }
    }

    #[test]
    fn test_square_root_curve() {
        // sqrt: 0, 5, 10 -> halfway point sits at the sqrt midpoint
        let scaled = sqrt_scale(&[0.0, 25.0, 100.0], THICKNESS);
        assert_eq!(scaled[0], 1.0);
        assert!((scaled[1] - 5.5).abs() < 1e-9);
        assert_eq!(scaled[2], 10.0);
    }

    #[test]
    fn test_degenerate_input_maps_to_min() {
        assert_eq!(sqrt_scale(&[100.0], SIZES), vec![10.0]);
        assert_eq!(sqrt_scale(&[7.0, 7.0, 7.0], THICKNESS), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(sqrt_scale(&[], SIZES).is_empty());
    }

    #[test]
    fn test_bounds_hold_for_wide_ranges() {
        let values: Vec<f64> = (0..200).map(|i| (i as f64).powi(3) * 1.5).collect();
        let scaled = sqrt_scale(&values, SIZES);
        assert_eq!(scaled.len(), values.len());
        assert!(scaled.iter().all(|v| (10.0..=100.0).contains(v)));
        assert!(scaled.windows(2).all(|w| w[0] <= w[1]));
    }
}
