//! Raster readers.

pub mod geotiff_reader;

use et_common::{BoundingBox, CrsCode, GeoTransform, RasterGrid};
use ndarray::Array2;

pub use geotiff_reader::read_geotiff;

/// A multi-band raster as read from disk.
#[derive(Debug, Clone)]
pub struct RasterDataset {
    /// One array per band, all with the same shape.
    pub bands: Vec<Array2<f32>>,
    pub transform: GeoTransform,
    pub crs: Option<CrsCode>,
    pub nodata: Option<f32>,
}

impl RasterDataset {
    pub fn width(&self) -> usize {
        self.bands.first().map_or(0, |b| b.ncols())
    }

    pub fn height(&self) -> usize {
        self.bands.first().map_or(0, |b| b.nrows())
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn bounds(&self) -> BoundingBox {
        self.transform.bounds(self.width(), self.height())
    }

    /// `true` where at least one band holds a value that is neither NaN nor
    /// the declared nodata value.
    pub fn dataset_mask(&self) -> Array2<bool> {
        let mut mask = Array2::from_elem((self.height(), self.width()), false);
        for band in &self.bands {
            let grid = self.band_grid(band.clone());
            mask.zip_mut_with(&grid.validity_mask(), |m, &v| *m |= v);
        }
        mask
    }

    /// Band `index` (zero-based) as a georeferenced grid.
    pub fn band(&self, index: usize) -> Option<RasterGrid> {
        self.bands.get(index).map(|b| self.band_grid(b.clone()))
    }

    fn band_grid(&self, data: Array2<f32>) -> RasterGrid {
        let grid = RasterGrid::new(data, self.transform, self.crs);
        match self.nodata {
            Some(nodata) => grid.with_nodata(nodata),
            None => grid,
        }
    }
}
