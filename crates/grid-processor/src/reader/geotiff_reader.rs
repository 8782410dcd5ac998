//! GeoTIFF reader.
//!
//! Reads the first image of a (Geo)TIFF into per-band `f32` arrays together
//! with its affine transform, EPSG code and GDAL nodata value.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use et_common::GeoTransform;
use ndarray::Array2;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::{debug, instrument, warn};

use super::RasterDataset;
use crate::error::{GridProcessorError, Result};
use crate::geokeys::{gdal_nodata_tag, GeoKeys};

/// Read a GeoTIFF from disk.
#[instrument(fields(path = %path.display()))]
pub fn read_geotiff(path: &Path) -> Result<RasterDataset> {
    let file = File::open(path).map_err(|e| {
        GridProcessorError::read_failed(format!("cannot open {}: {}", path.display(), e))
    })?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    let pixel_scale = decoder
        .find_tag(Tag::ModelPixelScaleTag)?
        .map(|v| v.into_f64_vec())
        .transpose()?
        .ok_or_else(|| GridProcessorError::invalid_metadata("missing ModelPixelScaleTag"))?;
    let tiepoint = decoder
        .find_tag(Tag::ModelTiepointTag)?
        .map(|v| v.into_f64_vec())
        .transpose()?
        .ok_or_else(|| GridProcessorError::invalid_metadata("missing ModelTiepointTag"))?;
    let geokeys = decoder
        .find_tag_unsigned_vec::<u16>(Tag::GeoKeyDirectoryTag)?
        .map(|dir| GeoKeys::parse(&dir))
        .unwrap_or_default();
    let nodata = decoder
        .find_tag(gdal_nodata_tag())?
        .map(|v| v.into_string())
        .transpose()?
        .and_then(|s| parse_nodata(&s));

    let transform = transform_from_tags(&pixel_scale, &tiepoint, geokeys.is_pixel_is_point())?;
    let crs = geokeys.crs();
    if crs.is_none() {
        warn!("GeoTIFF carries no supported EPSG code");
    }

    let samples = decoding_result_to_f32(decoder.read_image()?)?;
    let bands = split_bands(samples, width, height)?;

    debug!(
        width,
        height,
        bands = bands.len(),
        crs = ?crs,
        nodata = ?nodata,
        "Read GeoTIFF"
    );

    Ok(RasterDataset {
        bands,
        transform,
        crs,
        nodata,
    })
}

/// Affine transform from ModelPixelScale and the first ModelTiepoint.
fn transform_from_tags(scale: &[f64], tiepoint: &[f64], pixel_is_point: bool) -> Result<GeoTransform> {
    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err(GridProcessorError::invalid_metadata(format!(
            "malformed georeferencing tags: scale {:?}, tiepoint {:?}",
            scale, tiepoint
        )));
    }
    let (sx, sy) = (scale[0], scale[1]);
    if sx == 0.0 || sy == 0.0 {
        return Err(GridProcessorError::invalid_metadata("zero pixel size"));
    }

    let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
    let mut origin_x = x - i * sx;
    let mut origin_y = y + j * sy;
    if pixel_is_point {
        // Tiepoint refers to the pixel center.
        origin_x -= 0.5 * sx;
        origin_y += 0.5 * sy;
    }
    Ok(GeoTransform::new(origin_x, origin_y, sx, -sy))
}

fn parse_nodata(s: &str) -> Option<f32> {
    let s = s.trim_matches(char::from(0)).trim();
    match s.to_lowercase().as_str() {
        "" => None,
        "nan" | "-nan" => Some(f32::NAN),
        other => other.parse().ok(),
    }
}

fn decoding_result_to_f32(result: DecodingResult) -> Result<Vec<f32>> {
    Ok(match result {
        DecodingResult::F32(v) => v,
        DecodingResult::F64(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::U8(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f32).collect(),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(GridProcessorError::read_failed(
                "unsupported GeoTIFF sample format",
            ))
        }
    })
}

/// De-interleave chunky (pixel-interleaved) samples into one array per band.
fn split_bands(samples: Vec<f32>, width: usize, height: usize) -> Result<Vec<Array2<f32>>> {
    let pixels = width * height;
    if pixels == 0 || samples.len() % pixels != 0 {
        return Err(GridProcessorError::read_failed(format!(
            "{} samples do not fill a {}x{} image",
            samples.len(),
            width,
            height
        )));
    }
    let band_count = samples.len() / pixels;
    if band_count == 1 {
        return Array2::from_shape_vec((height, width), samples)
            .map(|a| vec![a])
            .map_err(|e| GridProcessorError::read_failed(e.to_string()));
    }

    Ok((0..band_count)
        .map(|b| {
            Array2::from_shape_fn((height, width), |(r, c)| {
                samples[(r * width + c) * band_count + b]
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_from_tags() {
        let t = transform_from_tags(&[1000.0, 1000.0, 0.0], &[0.0, 0.0, 0.0, 2_499_000.0, 1_118_000.0, 0.0], false)
            .unwrap();
        assert_eq!(t, GeoTransform::new(2_499_000.0, 1_118_000.0, 1000.0, -1000.0));

        let p = transform_from_tags(&[10.0, 10.0, 0.0], &[0.0, 0.0, 0.0, 105.0, 195.0, 0.0], true).unwrap();
        assert_eq!(p, GeoTransform::new(100.0, 200.0, 10.0, -10.0));
    }

    #[test]
    fn test_transform_rejects_malformed() {
        assert!(transform_from_tags(&[1.0], &[0.0; 6], false).is_err());
        assert!(transform_from_tags(&[0.0, 1.0], &[0.0; 6], false).is_err());
    }

    #[test]
    fn test_parse_nodata() {
        assert_eq!(parse_nodata("-9999\0"), Some(-9999.0));
        assert!(parse_nodata("nan").unwrap().is_nan());
        assert_eq!(parse_nodata(""), None);
    }

    #[test]
    fn test_split_bands() {
        // 1x2 image, 2 bands interleaved
        let bands = split_bands(vec![1.0, 10.0, 2.0, 20.0], 2, 1).unwrap();
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].as_slice().unwrap(), &[1.0, 2.0]);
        assert_eq!(bands[1].as_slice().unwrap(), &[10.0, 20.0]);
        assert!(split_bands(vec![1.0; 3], 2, 1).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = read_geotiff(Path::new("/nonexistent/ref.tif")).unwrap_err();
        assert!(matches!(err, GridProcessorError::ReadFailed(_)));
    }
}
