//! Coordinate Reference System codes understood by the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known CRS codes supported for reading, reprojecting and writing grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// Swiss CH1903+ / LV95 (meters)
    Epsg2056,
    /// Swiss CH1903 / LV03 (meters)
    Epsg21781,
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// Web Mercator (meters)
    Epsg3857,
}

impl CrsCode {
    /// Look up a CRS by its numeric EPSG code.
    pub fn from_epsg(code: u32) -> Result<Self, CrsParseError> {
        match code {
            2056 => Ok(CrsCode::Epsg2056),
            21781 => Ok(CrsCode::Epsg21781),
            4326 => Ok(CrsCode::Epsg4326),
            3857 | 900913 => Ok(CrsCode::Epsg3857),
            _ => Err(CrsParseError::UnsupportedCrs(format!("EPSG:{}", code))),
        }
    }

    /// Parse a CRS string.
    ///
    /// Accepts formats like:
    /// - "EPSG:2056"
    /// - "epsg:21781"
    /// - "+init=epsg:2056" (the form some climate products store)
    /// - "2056"
    pub fn parse(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();
        let code = normalized
            .strip_prefix("+INIT=")
            .unwrap_or(&normalized)
            .trim_start_matches("EPSG:");

        let code: u32 = code
            .parse()
            .map_err(|_| CrsParseError::UnsupportedCrs(s.to_string()))?;
        Self::from_epsg(code)
    }

    /// Numeric EPSG code.
    pub fn epsg(&self) -> u32 {
        match self {
            CrsCode::Epsg2056 => 2056,
            CrsCode::Epsg21781 => 21781,
            CrsCode::Epsg4326 => 4326,
            CrsCode::Epsg3857 => 3857,
        }
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326)
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
