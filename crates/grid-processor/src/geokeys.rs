//! GeoTIFF tag numbers and GeoKey directory encoding.

use et_common::CrsCode;
use tiff::tags::Tag;

/// GDAL's ASCII nodata tag.
pub const GDAL_NODATA_TAG: u16 = 42113;

pub const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
pub const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
pub const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
pub const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

pub const MODEL_TYPE_PROJECTED: u16 = 1;
pub const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
pub const RASTER_PIXEL_IS_AREA: u16 = 1;
pub const RASTER_PIXEL_IS_POINT: u16 = 2;

/// User-defined code; treated as "no usable CRS".
const USER_DEFINED: u16 = 32767;

pub fn gdal_nodata_tag() -> Tag {
    Tag::from_u16_exhaustive(GDAL_NODATA_TAG)
}

/// Decoded GeoKeys this crate cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeoKeys {
    pub model_type: Option<u16>,
    pub raster_type: Option<u16>,
    pub geographic_type: Option<u16>,
    pub projected_type: Option<u16>,
}

impl GeoKeys {
    /// Parse a GeoKeyDirectoryTag payload.
    ///
    /// Only keys stored inline (TIFFTagLocation 0) are read; everything this
    /// crate needs is a SHORT.
    pub fn parse(directory: &[u16]) -> Self {
        let mut keys = Self::default();
        if directory.len() < 4 {
            return keys;
        }

        let count = directory[3] as usize;
        for entry in directory[4..].chunks_exact(4).take(count) {
            let (id, location, value) = (entry[0], entry[1], entry[3]);
            if location != 0 {
                continue;
            }
            match id {
                GT_MODEL_TYPE_GEO_KEY => keys.model_type = Some(value),
                GT_RASTER_TYPE_GEO_KEY => keys.raster_type = Some(value),
                GEOGRAPHIC_TYPE_GEO_KEY => keys.geographic_type = Some(value),
                PROJECTED_CS_TYPE_GEO_KEY => keys.projected_type = Some(value),
                _ => {}
            }
        }
        keys
    }

    /// CRS named by the projected or geographic type key.
    pub fn crs(&self) -> Option<CrsCode> {
        let code = match self.model_type {
            Some(MODEL_TYPE_GEOGRAPHIC) => self.geographic_type,
            _ => self.projected_type.or(self.geographic_type),
        }?;
        if code == USER_DEFINED {
            return None;
        }
        CrsCode::from_epsg(code as u32).ok()
    }

    pub fn is_pixel_is_point(&self) -> bool {
        self.raster_type == Some(RASTER_PIXEL_IS_POINT)
    }
}

/// GeoKey directory declaring `crs` with PixelIsArea raster space.
pub fn encode_geokeys(crs: CrsCode) -> Vec<u16> {
    // EPSG codes of every supported CRS fit in a SHORT.
    let code = crs.epsg() as u16;
    let (model, crs_key) = if crs.is_geographic() {
        (MODEL_TYPE_GEOGRAPHIC, GEOGRAPHIC_TYPE_GEO_KEY)
    } else {
        (MODEL_TYPE_PROJECTED, PROJECTED_CS_TYPE_GEO_KEY)
    };

    vec![
        1, 1, 0, 3, // version, revision, minor revision, key count
        GT_MODEL_TYPE_GEO_KEY, 0, 1, model,
        GT_RASTER_TYPE_GEO_KEY, 0, 1, RASTER_PIXEL_IS_AREA,
        crs_key, 0, 1, code,
    ]
}
