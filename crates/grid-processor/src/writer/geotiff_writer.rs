//! Single-band float32 GeoTIFF writer.
//!
//! The image is written to a temporary file next to the destination and
//! renamed over it once complete, so a failed run never leaves a partial
//! raster behind.

use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use et_common::{CrsCode, RasterGrid};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;
use tracing::{debug, instrument};

use crate::error::{GridProcessorError, Result};
use crate::geokeys::{encode_geokeys, gdal_nodata_tag};

/// Outcome of a GeoTIFF write.
#[derive(Debug, Clone)]
pub struct GeoTiffWriteResult {
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub crs: CrsCode,
    pub bytes_written: u64,
}

/// Writes CRS-tagged single-band float32 GeoTIFFs. NaN is declared as nodata.
#[derive(Debug, Clone, Default)]
pub struct GeoTiffWriter;

impl GeoTiffWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write `grid` to `path`, replacing any existing file.
    #[instrument(skip(self, grid), fields(path = %path.display(), width = grid.width(), height = grid.height()))]
    pub fn write(&self, grid: &RasterGrid, path: &Path) -> Result<GeoTiffWriteResult> {
        let crs = grid
            .crs
            .ok_or_else(|| GridProcessorError::invalid_metadata("grid has no CRS"))?;
        if grid.width() == 0 || grid.height() == 0 {
            return Err(GridProcessorError::write_failed("grid is empty"));
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut temp = tempfile::Builder::new()
            .prefix(".ref-et-")
            .suffix(".tif.part")
            .tempfile_in(&dir)
            .map_err(|e| {
                GridProcessorError::write_failed(format!(
                    "cannot create temporary file in {}: {}",
                    dir.display(),
                    e
                ))
            })?;

        {
            let mut out = BufWriter::new(temp.as_file_mut());
            encode(grid, crs, &mut out)?;
            out.flush()
                .map_err(|e| GridProcessorError::write_failed(e.to_string()))?;
        }

        let bytes_written = temp
            .as_file()
            .metadata()
            .map(|m| m.len())
            .unwrap_or_default();

        temp.persist(path).map_err(|e| {
            GridProcessorError::write_failed(format!("cannot move raster to {}: {}", path.display(), e.error))
        })?;

        debug!(bytes_written, crs = %crs, "Wrote GeoTIFF");

        Ok(GeoTiffWriteResult {
            path: path.to_path_buf(),
            width: grid.width(),
            height: grid.height(),
            crs,
            bytes_written,
        })
    }
}

fn encode<W: Write + Seek>(grid: &RasterGrid, crs: CrsCode, out: &mut W) -> Result<()> {
    let write_err = |e: tiff::TiffError| GridProcessorError::write_failed(e.to_string());

    let t = &grid.transform;
    let pixel_scale = [t.pixel_width, -t.pixel_height, 0.0];
    let tiepoint = [0.0, 0.0, 0.0, t.origin_x, t.origin_y, 0.0];
    let geokeys = encode_geokeys(crs);

    // Row-major, row 0 at the top, as the TIFF strips expect.
    let samples: Vec<f32> = grid.data.iter().copied().collect();

    let mut encoder = TiffEncoder::new(out).map_err(write_err)?;
    let mut image = encoder
        .new_image::<colortype::Gray32Float>(grid.width() as u32, grid.height() as u32)
        .map_err(write_err)?;

    let dir = image.encoder();
    dir.write_tag(Tag::ModelPixelScaleTag, &pixel_scale[..])
        .map_err(write_err)?;
    dir.write_tag(Tag::ModelTiepointTag, &tiepoint[..])
        .map_err(write_err)?;
    dir.write_tag(Tag::GeoKeyDirectoryTag, &geokeys[..])
        .map_err(write_err)?;
    dir.write_tag(gdal_nodata_tag(), "nan").map_err(write_err)?;

    image.write_data(&samples).map_err(write_err)?;
    Ok(())
}
