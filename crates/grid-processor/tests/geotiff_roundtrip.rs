//! GeoTIFF reader/writer integration tests against fixture rasters.

use et_common::{CrsCode, GeoTransform, RasterGrid};
use grid_processor::{extract_extent, read_geotiff, GeoTiffWriter, GridAligner, GridProcessorError};
use ndarray::{array, Array2};
use test_utils::{
    assert_approx_eq, fixture_dir, fully_masked_reference_raster, jonction_reference_raster,
    write_reference_geotiff, FixtureGeoreference, JONCTION_LV95_TRANSFORM,
};

// =============================================================================
// Reading fixtures
// =============================================================================

#[test]
fn test_read_jonction_reference() {
    let dir = fixture_dir();
    let ds = read_geotiff(&jonction_reference_raster(dir.path())).unwrap();

    assert_eq!(ds.width(), 1);
    assert_eq!(ds.height(), 1);
    assert_eq!(ds.band_count(), 1);
    assert_eq!(ds.crs, Some(CrsCode::Epsg2056));
    assert_eq!(ds.nodata, Some(-9999.0));
    assert_eq!(ds.transform, JONCTION_LV95_TRANSFORM);
}

#[test]
fn test_read_without_geokeys_has_no_crs() {
    let dir = fixture_dir();
    let path = dir.path().join("nocrs.tif");
    let georef = FixtureGeoreference {
        transform: JONCTION_LV95_TRANSFORM,
        epsg: None,
        nodata: None,
    };
    write_reference_geotiff(&path, &array![[1.0, 2.0]], georef);

    let ds = read_geotiff(&path).unwrap();
    assert_eq!(ds.crs, None);
    assert!(ds.dataset_mask().iter().all(|&v| v));
}

#[test]
fn test_unknown_epsg_is_dropped() {
    let dir = fixture_dir();
    let path = dir.path().join("utm.tif");
    let georef = FixtureGeoreference {
        transform: JONCTION_LV95_TRANSFORM,
        epsg: Some(32632),
        nodata: None,
    };
    write_reference_geotiff(&path, &array![[1.0]], georef);

    assert_eq!(read_geotiff(&path).unwrap().crs, None);
}

// =============================================================================
// Extent
// =============================================================================

#[test]
fn test_extent_of_jonction_reference() {
    let dir = fixture_dir();
    let ds = read_geotiff(&jonction_reference_raster(dir.path())).unwrap();
    let extent = extract_extent(&ds).unwrap();

    let bounds = extent.bounds();
    assert_approx_eq!(bounds.min_x, 2_499_000.0, 1e-6);
    assert_approx_eq!(bounds.max_y, 1_118_000.0, 1e-6);
    assert_approx_eq!(extent.area(), 1.0e6, 1e-3);
    assert_eq!(extent.crs, Some(CrsCode::Epsg2056));
}

#[test]
fn test_fully_masked_reference_is_empty_extent() {
    let dir = fixture_dir();
    let ds = read_geotiff(&fully_masked_reference_raster(dir.path())).unwrap();
    assert!(matches!(
        extract_extent(&ds),
        Err(GridProcessorError::EmptyExtent)
    ));
}

// =============================================================================
// Write / read back
// =============================================================================

#[test]
fn test_write_then_read_preserves_georeferencing() {
    let dir = fixture_dir();
    let path = dir.path().join("pet.tif");
    let transform = GeoTransform::new(499_000.0, 118_000.0, 250.0, -250.0);
    let data = Array2::from_shape_fn((3, 4), |(r, c)| (r * 4 + c) as f32);
    let mut grid = RasterGrid::new(data.clone(), transform, Some(CrsCode::Epsg21781));
    grid.data[[1, 1]] = f32::NAN;

    GeoTiffWriter::new().write(&grid, &path).unwrap();
    let ds = read_geotiff(&path).unwrap();

    assert_eq!(ds.transform, transform);
    assert_eq!(ds.crs, Some(CrsCode::Epsg21781));
    assert!(ds.nodata.unwrap().is_nan());
    let band = &ds.bands[0];
    assert!(band[[1, 1]].is_nan());
    assert_eq!(band[[2, 3]], 11.0);
    assert_eq!(band[[0, 1]], 1.0);
}

#[test]
fn test_write_overwrites_destination() {
    let dir = fixture_dir();
    let path = dir.path().join("pet.tif");
    std::fs::write(&path, b"stale").unwrap();

    let grid = RasterGrid::new(array![[3.5]], JONCTION_LV95_TRANSFORM, Some(CrsCode::Epsg2056));
    GeoTiffWriter::new().write(&grid, &path).unwrap();

    assert_eq!(read_geotiff(&path).unwrap().bands[0][[0, 0]], 3.5);
}

#[test]
fn test_write_geographic_crs() {
    let dir = fixture_dir();
    let path = dir.path().join("wgs84.tif");
    let grid = RasterGrid::new(
        array![[1.0, 2.0]],
        GeoTransform::new(6.0, 46.3, 0.01, -0.01),
        Some(CrsCode::Epsg4326),
    );
    GeoTiffWriter::new().write(&grid, &path).unwrap();
    assert_eq!(read_geotiff(&path).unwrap().crs, Some(CrsCode::Epsg4326));
}

// =============================================================================
// Alignment against a read reference
// =============================================================================

#[test]
fn test_align_onto_read_reference() {
    let dir = fixture_dir();
    let path = dir.path().join("ref4.tif");
    let transform = GeoTransform::new(2_499_000.0, 1_118_000.0, 500.0, -500.0);
    write_reference_geotiff(
        &path,
        &Array2::from_elem((2, 2), 1.0),
        FixtureGeoreference::lv95(transform),
    );
    let reference = read_geotiff(&path).unwrap().band(0).unwrap();

    let pet = RasterGrid::new(array![[120.0]], JONCTION_LV95_TRANSFORM, Some(CrsCode::Epsg2056));
    let aligned = GridAligner::default().align(&pet, &reference).unwrap();

    assert_eq!(aligned.transform, reference.transform);
    assert_eq!(aligned.data.dim(), reference.data.dim());
    assert!(aligned.data.iter().all(|&v| v == 120.0));
}
