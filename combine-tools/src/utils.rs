//! Utilities to create, read and write raster datasets.

use gdal::DatasetOptions;
use gdal::GdalOpenFlags;
use rastercomb::Result;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

pub struct OutputArgs {
    pub path: PathBuf,
    pub driver: String,
}

use anyhow::Context;
use gdal::{Dataset, DriverManager};

pub fn read_dataset(path: &Path) -> Result<Dataset> {
    Ok(Dataset::open(&path).with_context(|| format!("reading dataset {}", path.display()))?)
}

pub fn edit_dataset(path: &Path) -> Result<Dataset> {
    Ok(Dataset::open_ex(
        &path,
        DatasetOptions {
            open_flags: GdalOpenFlags::GDAL_OF_UPDATE,
            ..Default::default()
        },
    )
    .with_context(|| format!("editing dataset {}", path.display()))?)
}

use gdal::raster::GdalType;
pub fn create_output_raster<T: GdalType>(
    arg: &OutputArgs,
    ds: &Dataset,
    num_bands: isize,
    no_val: Option<f64>,
) -> Result<Dataset> {
    let mut out_ds = {
        let driver = DriverManager::get_driver_by_name(&arg.driver)?;
        let (width, height) = ds.raster_size();
        driver
            .create_with_band_type::<T, _>(&arg.path, width as isize, height as isize, num_bands)
            .with_context(|| format!("creating dataset {}", arg.path.display()))?
    };
    if let Some(no_val) = no_val {
        for i in 1..=num_bands {
            out_ds.rasterband(i)?.set_no_data_value(Some(no_val))?;
        }
    }
    if let Ok(gt) = ds.geo_transform() {
        out_ds.set_geo_transform(&gt)?;
    }
    out_ds.set_projection(&ds.projection())?;
    Ok(out_ds)
}


use serde::Serialize;
pub fn write_json<T: Serialize>(path: &Path, json: &T) -> Result<()> {
    let file = File::create(path)?;
    let buf = std::io::BufWriter::with_capacity(0x100000, file);
    Ok(serde_json::to_writer(buf, json)?)
}

pub fn print_json<T: Serialize>(json: &T) -> Result<()> {
    let writer = std::io::BufWriter::new(std::io::stdout());
    Ok(serde_json::to_writer(writer, json)?)
}
