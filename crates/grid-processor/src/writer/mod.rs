//! GeoTIFF writer for persisting PET grids.

mod geotiff_writer;

pub use geotiff_writer::{GeoTiffWriteResult, GeoTiffWriter};
