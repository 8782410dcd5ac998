//! Raster processing for the reference evapotranspiration pipeline.
//!
//! This crate covers everything that touches the reference raster and the
//! final PET raster:
//!
//! - **Reading**: GeoTIFF into per-band arrays with transform, CRS and nodata
//! - **Extent extraction**: vectorize the validity mask into a footprint polygon
//! - **Alignment**: resample a grid onto a reference pixel grid
//! - **Writing**: atomic single-band float32 GeoTIFF output
//!
//! # Architecture
//!
//! ```text
//! reference.tif
//!      │
//!      ▼
//! read_geotiff() ──► RasterDataset::dataset_mask()
//!      │                    │
//!      │                    ▼
//!      │             extract_extent() ──► ExtentGeometry (buffered bounds)
//!      │
//!      ▼
//! GridAligner::align(pet, reference band)
//!      │
//!      ▼
//! GeoTiffWriter::write(pet, destination)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{extract_extent, read_geotiff};
//!
//! let reference = read_geotiff(Path::new("ref.tif"))?;
//! let extent = extract_extent(&reference)?;
//! let query = extent.buffered_bounds(2000.0);
//! ```

pub mod align;
pub mod config;
pub mod error;
pub mod extent;
pub mod geokeys;
pub mod interpolation;
pub mod reader;
pub mod types;
pub mod writer;

// Re-export commonly used types at crate root
pub use align::GridAligner;
pub use config::GridProcessorConfig;
pub use error::{GridProcessorError, Result};
pub use extent::{extract_extent, vectorize_mask, ExtentGeometry};
pub use interpolation::{bilinear_interpolate, interpolate, nearest_interpolate};
pub use reader::{read_geotiff, RasterDataset};
pub use types::InterpolationMethod;
pub use writer::{GeoTiffWriteResult, GeoTiffWriter};
