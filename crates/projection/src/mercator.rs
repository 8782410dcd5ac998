//! Spherical Web Mercator (EPSG:3857).

use std::f64::consts::PI;

/// WGS84 semi-major axis used as the sphere radius.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit where the projection is square (degrees).
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Project lon/lat (degrees) to Web Mercator meters.
///
/// Returns `None` outside the projection's latitude range.
pub fn forward(lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
    if lat_deg.abs() > MAX_LATITUDE {
        return None;
    }
    let x = EARTH_RADIUS * lon_deg.to_radians();
    let y = EARTH_RADIUS * (PI / 4.0 + lat_deg.to_radians() / 2.0).tan().ln();
    Some((x, y))
}

/// Unproject Web Mercator meters to lon/lat (degrees).
pub fn inverse(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}
