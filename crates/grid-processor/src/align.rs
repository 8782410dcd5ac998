//! Resampling a grid onto a reference raster's pixel grid.

use et_common::RasterGrid;
use ndarray::Array2;
use projection::CrsTransform;
use tracing::{debug, instrument};

use crate::config::GridProcessorConfig;
use crate::error::{GridProcessorError, Result};
use crate::interpolation::interpolate;
use crate::types::InterpolationMethod;

/// Resamples grids onto the exact transform, shape and CRS of a reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridAligner {
    method: InterpolationMethod,
}

impl GridAligner {
    pub fn new(method: InterpolationMethod) -> Self {
        Self { method }
    }

    pub fn from_config(config: &GridProcessorConfig) -> Self {
        Self::new(config.interpolation)
    }

    pub fn method(&self) -> InterpolationMethod {
        self.method
    }

    /// Sample `source` at the center of every reference pixel.
    ///
    /// When the two CRS differ, each reference pixel center is transformed
    /// into the source CRS before sampling. Pixels falling outside the
    /// source, or whose center cannot be transformed, are NaN.
    #[instrument(skip_all, fields(method = %self.method))]
    pub fn align(&self, source: &RasterGrid, reference: &RasterGrid) -> Result<RasterGrid> {
        let src_crs = source
            .crs
            .ok_or_else(|| GridProcessorError::misaligned("source grid has no CRS"))?;
        let ref_crs = reference
            .crs
            .ok_or_else(|| GridProcessorError::misaligned("reference raster has no supported CRS"))?;

        let to_source = CrsTransform::new(ref_crs, src_crs);
        let src_data = source.data.view();

        let data = Array2::from_shape_fn((reference.height(), reference.width()), |(row, col)| {
            let (x, y) = reference.transform.pixel_center(col, row);
            match to_source.transform(x, y) {
                Ok((sx, sy)) => {
                    let (c, r) = source.transform.world_to_pixel(sx, sy);
                    // Shift corner-based positions to center-based indices.
                    interpolate(self.method, src_data, c - 0.5, r - 0.5)
                }
                Err(_) => f32::NAN,
            }
        });

        debug!(
            from_crs = %src_crs,
            to_crs = %ref_crs,
            width = reference.width(),
            height = reference.height(),
            "Aligned grid onto reference"
        );

        Ok(RasterGrid::new(data, reference.transform, Some(ref_crs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use et_common::{CrsCode, GeoTransform};
    use ndarray::array;

    fn reference() -> RasterGrid {
        RasterGrid::new(
            Array2::zeros((4, 4)),
            GeoTransform::new(2_499_000.0, 1_118_000.0, 500.0, -500.0),
            Some(CrsCode::Epsg2056),
        )
    }

    #[test]
    fn test_output_matches_reference_grid() {
        let source = RasterGrid::new(
            array![[10.0, 20.0], [30.0, 40.0]],
            GeoTransform::new(2_499_000.0, 1_118_000.0, 1000.0, -1000.0),
            Some(CrsCode::Epsg2056),
        );
        let reference = reference();

        let aligned = GridAligner::new(InterpolationMethod::Nearest)
            .align(&source, &reference)
            .unwrap();
        assert_eq!(aligned.transform, reference.transform);
        assert_eq!(aligned.data.dim(), (4, 4));
        assert_eq!(aligned.crs, Some(CrsCode::Epsg2056));
        assert_eq!(aligned.data[[0, 0]], 10.0);
        assert_eq!(aligned.data[[3, 3]], 40.0);
    }

    #[test]
    fn test_bilinear_stays_within_source_range() {
        let source = RasterGrid::new(
            array![[10.0, 20.0], [30.0, 40.0]],
            GeoTransform::new(2_499_000.0, 1_118_000.0, 1000.0, -1000.0),
            Some(CrsCode::Epsg2056),
        );
        let aligned = GridAligner::default().align(&source, &reference()).unwrap();
        assert!(aligned.data.iter().all(|v| (10.0..=40.0).contains(v)));
        assert!(aligned.data[[0, 0]] < aligned.data[[3, 3]]);
    }

    #[test]
    fn test_reprojects_lv03_source() {
        // Same area expressed in LV03.
        let source = RasterGrid::new(
            array![[5.0]],
            GeoTransform::new(499_000.0, 118_000.0, 2000.0, -2000.0),
            Some(CrsCode::Epsg21781),
        );
        let aligned = GridAligner::default().align(&source, &reference()).unwrap();
        assert!(aligned.data.iter().all(|&v| v == 5.0));
    }

    #[test]
    fn test_outside_source_is_nan() {
        let source = RasterGrid::new(
            array![[1.0]],
            GeoTransform::new(2_600_000.0, 1_200_000.0, 1000.0, -1000.0),
            Some(CrsCode::Epsg2056),
        );
        let aligned = GridAligner::default().align(&source, &reference()).unwrap();
        assert!(aligned.data.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_missing_crs_is_misaligned() {
        let source = RasterGrid::new(array![[1.0]], GeoTransform::new(0.0, 1.0, 1.0, -1.0), None);
        let err = GridAligner::default().align(&source, &reference()).unwrap_err();
        assert!(matches!(err, GridProcessorError::MisalignedGrid(_)));

        let source = RasterGrid::new(array![[1.0]], GeoTransform::new(0.0, 1.0, 1.0, -1.0), Some(CrsCode::Epsg2056));
        let mut reference = reference();
        reference.crs = None;
        let err = GridAligner::default().align(&source, &reference).unwrap_err();
        assert!(matches!(err, GridProcessorError::MisalignedGrid(_)));
    }
}
