use clap::*;
use combine_tools::{utils::*, *};

use rastercomb::combine::DEFAULT_CHUNK_PIXELS;
use std::path::PathBuf;

/// One input layer: a raster path and a band index.
pub struct LayerArg {
    pub path: PathBuf,
    pub band: isize,
}

/// Program arguments
pub struct Args {
    /// Input layers to combine
    pub inputs: Vec<LayerArg>,
    /// Optional combination id raster
    pub output: Option<OutputArgs>,
    /// Path to write the JSON table (default: stdout)
    pub table: Option<PathBuf>,
    /// Pixel budget per processing chunk
    pub chunk_size: u64,
}

/// Parse `PATH` or `PATH:BAND`. A suffix that does not
/// parse as a band index is treated as part of the path.
fn parse_layer(spec: &str) -> LayerArg {
    if let Some(idx) = spec.rfind(':') {
        let (path, band) = spec.split_at(idx);
        if !path.is_empty() {
            if let Ok(band) = band[1..].parse::<isize>() {
                return LayerArg {
                    path: PathBuf::from(path),
                    band,
                };
            }
        }
    }
    LayerArg {
        path: PathBuf::from(spec),
        band: 1,
    }
}

pub fn parse_cmd_line() -> Args {
    let matches = args_parser!("raster-combine")
        .about("Tabulate unique combinations of raster values.")
        .arg(
            arg!("inputs")
                .required(true)
                .multiple(true)
                .help("Input paths (raster dataset, optionally PATH:BAND)"),
        )
        .arg(opt!("output").help("Output path for the combination id raster"))
        .arg(
            opt!("driver")
                .requires("output")
                .help("Output driver (default: GTIFF)"),
        )
        .arg(opt!("table").help("Write the combination table as JSON (default: stdout)"))
        .arg(
            opt!("chunk size")
                .short("c")
                .help("Read chunk size (default: 64k pixels)"),
        )
        .get_matches();

    let inputs = values_t!(matches, "inputs", String)
        .unwrap_or_else(|e| e.exit())
        .iter()
        .map(|spec| parse_layer(spec))
        .collect();

    let output = if matches.is_present("output") {
        let o = value_t!(matches, "output", PathBuf).unwrap_or_else(|e| e.exit());
        let driver = value_t!(matches, "driver", String).unwrap_or_else(|_| String::from("GTIFF"));
        Some(OutputArgs { path: o, driver })
    } else {
        None
    };

    let table = value_t!(matches, "table", PathBuf).ok();
    let chunk_size = value_t!(matches, "chunk size", u64).unwrap_or_else(|_| DEFAULT_CHUNK_PIXELS);

    Args {
        inputs,
        output,
        table,
        chunk_size,
    }
}
