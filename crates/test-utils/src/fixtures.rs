//! Reference raster and climate product fixtures.
//!
//! Small GeoTIFFs written with the `tiff` encoder directly, so readers can be
//! tested against files they did not produce themselves.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use et_common::GeoTransform;
use ndarray::Array2;
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

/// Site latitude of Jonction, Geneva, in radians.
pub const JONCTION_LAT_RAD: f64 = 0.8063630583724042;

/// 1 km cell over Jonction in LV95.
pub const JONCTION_LV95_TRANSFORM: GeoTransform = GeoTransform {
    origin_x: 2_499_000.0,
    origin_y: 1_118_000.0,
    pixel_width: 1000.0,
    pixel_height: -1000.0,
};

/// Georeferencing written into a fixture GeoTIFF.
#[derive(Debug, Clone, Copy)]
pub struct FixtureGeoreference {
    pub transform: GeoTransform,
    /// EPSG code, or `None` to omit the GeoKey directory.
    pub epsg: Option<u16>,
    /// Written as the GDAL_NODATA tag when set.
    pub nodata: Option<f32>,
}

impl FixtureGeoreference {
    pub fn lv95(transform: GeoTransform) -> Self {
        Self {
            transform,
            epsg: Some(2056),
            nodata: None,
        }
    }

    pub fn with_nodata(mut self, nodata: f32) -> Self {
        self.nodata = Some(nodata);
        self
    }
}

/// Write a single-band float32 GeoTIFF.
pub fn write_reference_geotiff(path: &Path, data: &Array2<f32>, georef: FixtureGeoreference) {
    let file = File::create(path).expect("create fixture file");
    let mut out = BufWriter::new(file);
    let mut encoder = TiffEncoder::new(&mut out).expect("tiff encoder");
    let mut image = encoder
        .new_image::<colortype::Gray32Float>(data.ncols() as u32, data.nrows() as u32)
        .expect("tiff image");

    let t = georef.transform;
    let dir = image.encoder();
    dir.write_tag(Tag::ModelPixelScaleTag, &[t.pixel_width, -t.pixel_height, 0.0][..])
        .expect("pixel scale");
    dir.write_tag(
        Tag::ModelTiepointTag,
        &[0.0, 0.0, 0.0, t.origin_x, t.origin_y, 0.0][..],
    )
    .expect("tiepoint");
    if let Some(epsg) = georef.epsg {
        // projected, PixelIsArea
        let keys: [u16; 16] = [1, 1, 0, 3, 1024, 0, 1, 1, 1025, 0, 1, 1, 3072, 0, 1, epsg];
        dir.write_tag(Tag::GeoKeyDirectoryTag, &keys[..])
            .expect("geokeys");
    }
    if let Some(nodata) = georef.nodata {
        dir.write_tag(Tag::from_u16_exhaustive(42113), nodata.to_string().as_str())
            .expect("nodata");
    }

    let samples: Vec<f32> = data.iter().copied().collect();
    image.write_data(&samples).expect("tiff data");
}

/// 1x1 valid reference raster over Jonction in LV95.
pub fn jonction_reference_raster(dir: &Path) -> PathBuf {
    let path = dir.join("ref.tif");
    write_reference_geotiff(
        &path,
        &Array2::from_elem((1, 1), 1.0),
        FixtureGeoreference::lv95(JONCTION_LV95_TRANSFORM).with_nodata(-9999.0),
    );
    path
}

/// Reference raster whose every pixel is nodata.
pub fn fully_masked_reference_raster(dir: &Path) -> PathBuf {
    let path = dir.join("masked.tif");
    write_reference_geotiff(
        &path,
        &Array2::from_elem((2, 2), -9999.0),
        FixtureGeoreference::lv95(JONCTION_LV95_TRANSFORM).with_nodata(-9999.0),
    );
    path
}

/// A fresh temporary directory for fixture files.
pub fn fixture_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("temp dir")
}

/// Packing of the [`write_tabsd_netcdf`] fixture: `value = raw * scale + offset`.
pub const TABSD_SCALE_FACTOR: f32 = 0.01;
pub const TABSD_ADD_OFFSET: f32 = 10.0;
pub const TABSD_FILL_VALUE: i16 = -32768;

/// Raw packed sample of the TabsD fixture at `(time, south_row, col)`.
///
/// `south_row` counts from the southernmost row, the order the file stores
/// them in. Sample `(0, 0, 0)` holds the fill value.
pub fn tabsd_raw(time: usize, south_row: usize, col: usize) -> i16 {
    if (time, south_row, col) == (0, 0, 0) {
        TABSD_FILL_VALUE
    } else {
        100 * (time * 6 + south_row * 2 + col) as i16
    }
}

/// Write a small MeteoSwiss-style `TabsD(time, N, E)` file.
///
/// Two days (2019-01-01 and 2019-01-02, `days since 1900-01-01`), three
/// rows stored south to north at 1 km spacing and two columns, packed as
/// `short` with scale/offset and a `_FillValue`. With `grid_mapping` the
/// variable points to a mapping variable carrying `epsg_code = "EPSG:2056"`;
/// without it the CRS can only come from the axis names.
pub fn write_tabsd_netcdf(path: &Path, grid_mapping: bool) {
    let mut file = netcdf::create(path).expect("create netcdf");
    file.add_dimension("time", 2).expect("time dim");
    file.add_dimension("N", 3).expect("N dim");
    file.add_dimension("E", 2).expect("E dim");

    let mut time = file.add_variable::<f64>("time", &["time"]).expect("time var");
    time.put_attribute("units", "days since 1900-01-01 00:00:00")
        .expect("time units");
    time.put_values(&[43464.0, 43465.0], ..).expect("time values");

    let mut north = file.add_variable::<f64>("N", &["N"]).expect("N var");
    north
        .put_values(&[1_117_500.0, 1_118_500.0, 1_119_500.0], ..)
        .expect("N values");

    let mut east = file.add_variable::<f64>("E", &["E"]).expect("E var");
    east.put_values(&[2_499_500.0, 2_500_500.0], ..)
        .expect("E values");

    if grid_mapping {
        let mut mapping = file
            .add_variable::<i32>("swiss_lv95_coordinates", &[])
            .expect("grid mapping var");
        mapping
            .put_attribute("epsg_code", "EPSG:2056")
            .expect("epsg_code");
    }

    let mut tabsd = file
        .add_variable::<i16>("TabsD", &["time", "N", "E"])
        .expect("TabsD var");
    tabsd
        .put_attribute("_FillValue", TABSD_FILL_VALUE)
        .expect("fill value");
    tabsd
        .put_attribute("scale_factor", TABSD_SCALE_FACTOR)
        .expect("scale factor");
    tabsd
        .put_attribute("add_offset", TABSD_ADD_OFFSET)
        .expect("add offset");
    tabsd.put_attribute("units", "degC").expect("units");
    if grid_mapping {
        tabsd
            .put_attribute("grid_mapping", "swiss_lv95_coordinates")
            .expect("grid_mapping");
    }

    let mut raw = Vec::with_capacity(12);
    for t in 0..2 {
        for row in 0..3 {
            for col in 0..2 {
                raw.push(tabsd_raw(t, row, col));
            }
        }
    }
    tabsd.put_values(&raw, ..).expect("TabsD values");
}
