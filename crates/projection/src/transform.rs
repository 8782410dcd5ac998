//! Point and bounding-box transforms between supported CRS codes.

use et_common::{BoundingBox, CrsCode};
use thiserror::Error;

use crate::mercator;
use crate::swiss::{lv03_to_lv95, lv95_to_lv03, SwissGrid};

/// Errors raised while transforming coordinates.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The point cannot be represented in the requested CRS.
    #[error("point ({x}, {y}) is outside the domain of {crs}")]
    OutOfDomain { crs: CrsCode, x: f64, y: f64 },
}

/// A transform from one CRS to another.
///
/// LV03 and LV95 are related by a constant shift; every other pair goes
/// through WGS84 longitude/latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrsTransform {
    pub from: CrsCode,
    pub to: CrsCode,
}

impl CrsTransform {
    pub fn new(from: CrsCode, to: CrsCode) -> Self {
        Self { from, to }
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    /// Transform a single point.
    pub fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::OutOfDomain {
                crs: self.from,
                x,
                y,
            });
        }

        match (self.from, self.to) {
            (from, to) if from == to => Ok((x, y)),
            (CrsCode::Epsg21781, CrsCode::Epsg2056) => Ok(lv03_to_lv95(x, y)),
            (CrsCode::Epsg2056, CrsCode::Epsg21781) => Ok(lv95_to_lv03(x, y)),
            (from, to) => {
                let (lon, lat) = to_wgs84(from, x, y);
                from_wgs84(to, lon, lat)
            }
        }
    }

    /// Transform a bounding box, returning the box enclosing the transformed edges.
    ///
    /// Edges are sampled rather than just the corners because the projected
    /// outline of a rectangle is curved in general.
    pub fn transform_bounds(&self, bbox: &BoundingBox) -> Result<BoundingBox, ProjectionError> {
        if self.is_identity() {
            return Ok(*bbox);
        }

        const STEPS: usize = 10;
        let mut points = Vec::with_capacity(4 * (STEPS + 1));
        for t in 0..=STEPS {
            let frac = t as f64 / STEPS as f64;
            let x = bbox.min_x + frac * bbox.width();
            let y = bbox.min_y + frac * bbox.height();
            points.push(self.transform(x, bbox.min_y)?);
            points.push(self.transform(x, bbox.max_y)?);
            points.push(self.transform(bbox.min_x, y)?);
            points.push(self.transform(bbox.max_x, y)?);
        }

        // At least four points were pushed above.
        Ok(BoundingBox::from_points(points).unwrap_or(*bbox))
    }
}

fn to_wgs84(crs: CrsCode, x: f64, y: f64) -> (f64, f64) {
    match crs {
        CrsCode::Epsg4326 => (x, y),
        CrsCode::Epsg2056 => SwissGrid::Lv95.to_wgs84(x, y),
        CrsCode::Epsg21781 => SwissGrid::Lv03.to_wgs84(x, y),
        CrsCode::Epsg3857 => mercator::inverse(x, y),
    }
}

fn from_wgs84(crs: CrsCode, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
    match crs {
        CrsCode::Epsg4326 => Ok((lon, lat)),
        CrsCode::Epsg2056 => Ok(SwissGrid::Lv95.from_wgs84(lon, lat)),
        CrsCode::Epsg21781 => Ok(SwissGrid::Lv03.from_wgs84(lon, lat)),
        CrsCode::Epsg3857 => mercator::forward(lon, lat).ok_or(ProjectionError::OutOfDomain {
            crs,
            x: lon,
            y: lat,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let t = CrsTransform::new(CrsCode::Epsg2056, CrsCode::Epsg2056);
        assert!(t.is_identity());
        assert_eq!(t.transform(2_500_000.0, 1_117_000.0).unwrap(), (2_500_000.0, 1_117_000.0));
    }

    #[test]
    fn test_lv03_to_lv95_is_exact_shift() {
        let t = CrsTransform::new(CrsCode::Epsg21781, CrsCode::Epsg2056);
        assert_eq!(t.transform(499_500.0, 117_500.0).unwrap(), (2_499_500.0, 1_117_500.0));

        let bbox = BoundingBox::new(499_000.0, 117_000.0, 501_000.0, 119_000.0);
        let out = t.transform_bounds(&bbox).unwrap();
        assert_eq!(out, BoundingBox::new(2_499_000.0, 1_117_000.0, 2_501_000.0, 1_119_000.0));
    }

    #[test]
    fn test_lv95_to_mercator_and_back() {
        let there = CrsTransform::new(CrsCode::Epsg2056, CrsCode::Epsg3857);
        let back = CrsTransform::new(CrsCode::Epsg3857, CrsCode::Epsg2056);

        let (x, y) = there.transform(2_499_000.0, 1_117_500.0).unwrap();
        let (e, n) = back.transform(x, y).unwrap();
        assert!((e - 2_499_000.0).abs() < 5.0, "easting {}", e);
        assert!((n - 1_117_500.0).abs() < 5.0, "northing {}", n);
    }

    #[test]
    fn test_non_finite_rejected() {
        let t = CrsTransform::new(CrsCode::Epsg2056, CrsCode::Epsg4326);
        assert!(matches!(
            t.transform(f64::NAN, 1.0),
            Err(ProjectionError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_bounds_to_wgs84_contains_center() {
        let t = CrsTransform::new(CrsCode::Epsg2056, CrsCode::Epsg4326);
        let bbox = BoundingBox::new(2_497_000.0, 1_115_000.0, 2_501_000.0, 1_119_000.0);
        let out = t.transform_bounds(&bbox).unwrap();
        let (lon, lat) = t.transform(2_499_000.0, 1_117_000.0).unwrap();
        assert!(out.contains_point(lon, lat));
        assert!(out.width() > 0.0 && out.width() < 0.1);
    }
}
