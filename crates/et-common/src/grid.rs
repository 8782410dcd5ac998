//! Georeferenced grid value types.
//!
//! Every grid carries its CRS as an explicit field so it survives each
//! transformation step; derived grids copy it forward unless they are
//! explicitly reprojected.

use chrono::{NaiveDate, NaiveDateTime};
use ndarray::{s, Array2, Array3, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{BoundingBox, CrsCode};

/// North-up affine pixel-to-world transform.
///
/// `origin_x`/`origin_y` is the outer corner of pixel (0, 0). For north-up
/// rasters `pixel_height` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// World coordinates of a (fractional) pixel position.
    pub fn pixel_to_world(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width,
            self.origin_y + row * self.pixel_height,
        )
    }

    /// Fractional pixel position of a world coordinate.
    ///
    /// Integer values fall on pixel corners; pixel centers are at `n + 0.5`.
    pub fn world_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.origin_x) / self.pixel_width,
            (y - self.origin_y) / self.pixel_height,
        )
    }

    /// World coordinates of the center of pixel (`col`, `row`).
    pub fn pixel_center(&self, col: usize, row: usize) -> (f64, f64) {
        self.pixel_to_world(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Bounding box of a `width` x `height` raster using this transform.
    pub fn bounds(&self, width: usize, height: usize) -> BoundingBox {
        let (x0, y0) = self.pixel_to_world(0.0, 0.0);
        let (x1, y1) = self.pixel_to_world(width as f64, height as f64);
        BoundingBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    /// Transform of a window starting at (`col_off`, `row_off`).
    pub fn window(&self, col_off: usize, row_off: usize) -> Self {
        let (origin_x, origin_y) = self.pixel_to_world(col_off as f64, row_off as f64);
        Self {
            origin_x,
            origin_y,
            ..*self
        }
    }

    /// Pixel window `(rows, cols)` of cells intersecting `bbox`, clipped to the raster.
    ///
    /// Returns `None` when the box misses the raster entirely.
    pub fn window_for_bounds(
        &self,
        bbox: &BoundingBox,
        width: usize,
        height: usize,
    ) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
        let (c0, r0) = self.world_to_pixel(bbox.min_x, bbox.max_y);
        let (c1, r1) = self.world_to_pixel(bbox.max_x, bbox.min_y);

        let col_start = c0.min(c1).floor().max(0.0) as usize;
        let col_end = (c0.max(c1).ceil().max(0.0) as usize).min(width);
        let row_start = r0.min(r1).floor().max(0.0) as usize;
        let row_end = (r0.max(r1).ceil().max(0.0) as usize).min(height);

        if col_start >= col_end || row_start >= row_end {
            return None;
        }
        Some((row_start..row_end, col_start..col_end))
    }
}

/// A single-band raster: samples, transform, CRS and nodata convention.
#[derive(Debug, Clone)]
pub struct RasterGrid {
    /// Samples in row-major order, row 0 at the top.
    pub data: Array2<f32>,
    pub transform: GeoTransform,
    /// `None` when the source carried no (or an unsupported) CRS.
    pub crs: Option<CrsCode>,
    /// Declared nodata value; NaN is always treated as nodata.
    pub nodata: Option<f32>,
}

impl RasterGrid {
    pub fn new(data: Array2<f32>, transform: GeoTransform, crs: Option<CrsCode>) -> Self {
        Self {
            data,
            transform,
            crs,
            nodata: None,
        }
    }

    pub fn with_nodata(mut self, nodata: f32) -> Self {
        self.nodata = Some(nodata);
        self
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn bounds(&self) -> BoundingBox {
        self.transform.bounds(self.width(), self.height())
    }

    /// Whether a sample holds data under this grid's nodata convention.
    pub fn is_valid(&self, value: f32) -> bool {
        !value.is_nan() && self.nodata.map_or(true, |nodata| value != nodata)
    }

    /// `true` where the grid holds data.
    pub fn validity_mask(&self) -> Array2<bool> {
        self.data.mapv(|v| self.is_valid(v))
    }
}

/// A stack of grids along a time axis, shaped `(time, row, col)`.
#[derive(Debug, Clone)]
pub struct TimeSeriesGrid {
    pub data: Array3<f32>,
    pub times: Vec<NaiveDateTime>,
    pub transform: GeoTransform,
    pub crs: CrsCode,
}

impl TimeSeriesGrid {
    pub fn len(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn height(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn width(&self) -> usize {
        self.data.shape()[2]
    }

    pub fn bounds(&self) -> BoundingBox {
        self.transform.bounds(self.width(), self.height())
    }

    /// Keep every cell intersecting `bbox` (no masking inside the window).
    pub fn crop_to_bounds(&self, bbox: &BoundingBox) -> Option<Self> {
        let (rows, cols) = self
            .transform
            .window_for_bounds(bbox, self.width(), self.height())?;
        let transform = self.transform.window(cols.start, rows.start);

        Some(Self {
            data: self.data.slice(s![.., rows, cols]).to_owned(),
            times: self.times.clone(),
            transform,
            crs: self.crs,
        })
    }
}

/// Monthly mean temperatures (°C), one slice per calendar month.
#[derive(Debug, Clone)]
pub struct MonthlyTemperatureSeries {
    /// Shaped `(month, row, col)`.
    pub data: Array3<f32>,
    /// First day of each month, ascending and contiguous.
    pub months: Vec<NaiveDate>,
    pub transform: GeoTransform,
    pub crs: CrsCode,
}

impl MonthlyTemperatureSeries {
    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn height(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn width(&self) -> usize {
        self.data.shape()[2]
    }

    /// Temperature grid for month index `i`.
    pub fn month(&self, i: usize) -> ArrayView2<'_, f32> {
        self.data.slice(s![i, .., ..])
    }
}
