//! Cell value trait for rasters

use num_traits::{Float, NumCast};
use std::fmt::Debug;

/// Floating point types that can be stored in a raster cell.
///
/// Interpolated grids carry a no-data sentinel chosen by the caller, so
/// no-data matching is exact; NaN always counts as no-data.
pub trait RasterElement: Float + NumCast + Debug + Default + Send + Sync + 'static {
    /// Check if this value represents no-data
    fn is_nodata(&self, nodata: Option<Self>) -> bool {
        self.is_nan() || nodata.is_some_and(|nd| *self == nd)
    }

    /// Lossy conversion from an `f64` estimate
    fn cast_from(value: f64) -> Self {
        <Self as NumCast>::from(value).unwrap_or_else(Self::nan)
    }

    /// Widening conversion to `f64`
    fn as_f64(self) -> f64 {
        <f64 as NumCast>::from(self).unwrap_or(f64::NAN)
    }
}

impl RasterElement for f32 {}
impl RasterElement for f64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodata_matching_is_exact() {
        assert!(RasterElement::is_nodata(&-9999.0f32, Some(-9999.0)));
        assert!(!RasterElement::is_nodata(&-9998.99f32, Some(-9999.0)));
        assert!(RasterElement::is_nodata(&f64::NAN, None));
        assert!(!RasterElement::is_nodata(&0.0f64, None));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(<f32 as RasterElement>::cast_from(1.5), 1.5f32);
        assert_eq!(RasterElement::as_f64(2.25f32), 2.25);
    }
}
