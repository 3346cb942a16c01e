use args::*;
use combine_tools::{utils::*, *};
use rastercomb::prelude::*;

mod args;
mod outputs;

// Main function
combine_tools::sync_main!(run());

fn run() -> Result<()> {
    // Parse command line
    let args = args::parse_cmd_line();

    // Open input layers
    let mut readers = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        readers.push(DatasetReader(read_dataset(&input.path)?, input.band));
    }

    // Create the id raster before the readers are consumed;
    // it shares the first input's georeferencing.
    let mut writer = if let Some(out) = &args.output {
        let src = read_dataset(&args.inputs[0].path)?;
        let out_ds = create_output_raster::<f64>(out, &src, 1, None)?;
        Some(DatasetWriter(out_ds, 1))
    } else {
        None
    };

    let combiner = Combiner::new(readers)?.with_chunk_pixels(args.chunk_size);
    let tracker = Tracker::new("chunks", combiner.num_chunks());

    let table = combiner.run_with_progress(
        writer.as_mut().map(|w| w as &mut dyn ChunkWriter),
        |_, _| tracker.increment(),
    )?;
    drop(tracker);

    let layers = args
        .inputs
        .iter()
        .map(|input| {
            let stem = input
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.path.display().to_string());
            format!("{}:{}", stem, input.band)
        })
        .collect();

    let output = outputs::CombineOutput {
        layers,
        total_pixels: table.total_count(),
        combinations: table.sorted_records(),
    };
    match &args.table {
        Some(path) => write_json(path, &output)?,
        None => print_json(&output)?,
    }
    Ok(())
}
