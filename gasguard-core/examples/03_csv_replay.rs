//! Replaying a Logger Export
//!
//! Reads a CSV export from the field logger and prints the calibrated,
//! gated series in the configured variant.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 03_csv_replay -- fan_nodrone_2.csv [config.json]
//! ```
//!
//! The optional JSON file overrides any subset of the configuration, e.g.
//! `{ "offset": 226.0, "sensitivity": 0.3, "resilient": true }`.

use std::error::Error;

use gasguard_core::{source::CsvSource, Pipeline, PipelineConfig};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: 03_csv_replay <recording.csv> [config.json]");
        std::process::exit(2);
    };

    let config = match args.next() {
        Some(config_path) => PipelineConfig::from_json_str(&std::fs::read_to_string(config_path)?)?,
        None => PipelineConfig::default(),
    };

    let pipeline = Pipeline::new(config)?;
    let mut source = CsvSource::open(&path)?;
    let output = pipeline.run_source(&mut source)?;

    let stats = source.stats();
    println!(
        "{}: {} rows ({} lit), {} blank line(s)",
        path, stats.rows, stats.illuminated_rows, stats.blank_lines
    );

    for (position, value) in output.calibrated().iter_indexed() {
        let timestamp = output.timestamp(position).unwrap_or_default();
        match value {
            Some(value) => println!("{},{:.4}", timestamp, value),
            None => println!("{},", timestamp),
        }
    }

    let summary = output.summary;
    println!(
        "# {} s, {} placeholder s, {} blackout(s), coverage {:.3}",
        summary.total_seconds, summary.placeholder_seconds, summary.blackouts, summary.coverage
    );

    Ok(())
}
