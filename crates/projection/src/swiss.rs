//! Swiss national grids (CH1903 / LV03 and CH1903+ / LV95).
//!
//! Both grids use the same oblique Mercator projection on the Bessel ellipsoid;
//! LV95 only adds a false origin of 2 000 000 m east and 1 000 000 m north.
//!
//! Conversion to and from WGS84 uses the swisstopo approximate polynomials,
//! which are accurate to about one meter over Switzerland. That is far below
//! the resolution of the climate grids this crate reprojects.

/// LV95 minus LV03 false easting.
pub const LV95_EAST_OFFSET: f64 = 2_000_000.0;
/// LV95 minus LV03 false northing.
pub const LV95_NORTH_OFFSET: f64 = 1_000_000.0;

/// One of the two Swiss projected grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwissGrid {
    /// CH1903 / LV03 (EPSG:21781)
    Lv03,
    /// CH1903+ / LV95 (EPSG:2056)
    Lv95,
}

impl SwissGrid {
    /// Convert WGS84 longitude/latitude (degrees) to easting/northing in this grid.
    pub fn from_wgs84(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let (e, n) = wgs84_to_lv95(lon_deg, lat_deg);
        match self {
            SwissGrid::Lv95 => (e, n),
            SwissGrid::Lv03 => lv95_to_lv03(e, n),
        }
    }

    /// Convert easting/northing in this grid to WGS84 longitude/latitude (degrees).
    pub fn to_wgs84(&self, easting: f64, northing: f64) -> (f64, f64) {
        let (e, n) = match self {
            SwissGrid::Lv95 => (easting, northing),
            SwissGrid::Lv03 => lv03_to_lv95(easting, northing),
        };
        lv95_to_wgs84(e, n)
    }
}

/// Shift LV03 coordinates onto the LV95 false origin.
pub fn lv03_to_lv95(easting: f64, northing: f64) -> (f64, f64) {
    (easting + LV95_EAST_OFFSET, northing + LV95_NORTH_OFFSET)
}

/// Shift LV95 coordinates onto the LV03 false origin.
pub fn lv95_to_lv03(easting: f64, northing: f64) -> (f64, f64) {
    (easting - LV95_EAST_OFFSET, northing - LV95_NORTH_OFFSET)
}

/// WGS84 degrees to LV95 meters.
pub fn wgs84_to_lv95(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    // Auxiliary values in units of 10000 arc seconds relative to Bern.
    let phi = (lat_deg * 3600.0 - 169_028.66) / 10_000.0;
    let lambda = (lon_deg * 3600.0 - 26_782.5) / 10_000.0;

    let easting = 2_600_072.37 + 211_455.93 * lambda
        - 10_938.51 * lambda * phi
        - 0.36 * lambda * phi.powi(2)
        - 44.54 * lambda.powi(3);

    let northing = 1_200_147.07
        + 308_807.95 * phi
        + 3_745.25 * lambda.powi(2)
        + 76.63 * phi.powi(2)
        - 194.56 * lambda.powi(2) * phi
        + 119.79 * phi.powi(3);

    (easting, northing)
}

/// LV95 meters to WGS84 degrees.
pub fn lv95_to_wgs84(easting: f64, northing: f64) -> (f64, f64) {
    // Auxiliary values in units of 1000 km relative to Bern.
    let y = (easting - 2_600_000.0) / 1_000_000.0;
    let x = (northing - 1_200_000.0) / 1_000_000.0;

    let lambda = 2.6779094 + 4.728982 * y + 0.791484 * y * x + 0.1306 * y * x.powi(2)
        - 0.0436 * y.powi(3);

    let phi = 16.9023892 + 3.238272 * x
        - 0.270978 * y.powi(2)
        - 0.002528 * x.powi(2)
        - 0.0447 * y.powi(2) * x
        - 0.0140 * x.powi(3);

    // Results are in units of 10000 arc seconds.
    (lambda * 100.0 / 36.0, phi * 100.0 / 36.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Old Bern observatory, the origin of both Swiss grids.
    const BERN_LON: f64 = 26_779.07 / 3600.0;
    const BERN_LAT: f64 = 169_023.9 / 3600.0;

    #[test]
    fn test_bern_origin() {
        let (e, n) = wgs84_to_lv95(BERN_LON, BERN_LAT);
        assert!((e - 2_600_000.0).abs() < 1.0, "easting {}", e);
        assert!((n - 1_200_000.0).abs() < 1.0, "northing {}", n);

        let (e03, n03) = SwissGrid::Lv03.from_wgs84(BERN_LON, BERN_LAT);
        assert!((e03 - 600_000.0).abs() < 1.0);
        assert!((n03 - 200_000.0).abs() < 1.0);
    }

    #[test]
    fn test_geneva_roundtrip() {
        // Jonction, Geneva
        let (lon, lat) = (6.1296, 46.2012);
        let (e, n) = SwissGrid::Lv95.from_wgs84(lon, lat);
        assert!(e > 2_490_000.0 && e < 2_510_000.0, "easting {}", e);
        assert!(n > 1_110_000.0 && n < 1_125_000.0, "northing {}", n);

        let (lon2, lat2) = SwissGrid::Lv95.to_wgs84(e, n);
        // 5e-5 degrees is a few meters
        assert!((lon2 - lon).abs() < 5e-5, "lon {}", lon2);
        assert!((lat2 - lat).abs() < 5e-5, "lat {}", lat2);
    }

    #[test]
    fn test_lv03_lv95_shift() {
        let (e, n) = lv03_to_lv95(500_000.0, 117_000.0);
        assert_eq!((e, n), (2_500_000.0, 1_117_000.0));
        assert_eq!(lv95_to_lv03(e, n), (500_000.0, 117_000.0));
    }
}
