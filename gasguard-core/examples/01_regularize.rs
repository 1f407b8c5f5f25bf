//! Regularizing an Irregular Recording
//!
//! Shows how duplicate rows collapse into one second and how gaps become
//! explicit placeholder seconds.
//!
//! ## What You'll Learn
//!
//! - Feeding samples to the streaming [`Aggregator`]
//! - Reading placeholder seconds and aggregation counters
//! - Computing trailing window statistics over a channel
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_regularize
//! ```

use gasguard_core::{
    moving_mean, moving_std,
    sample::{channel_values, Channel},
    Aggregator, PipelineError, RawSample,
};

fn main() -> Result<(), PipelineError> {
    println!("GasGuard Regularization Example");
    println!("===============================\n");

    // Two rows in second 0, none in 3 and 4
    let samples = [
        RawSample::new(0, 231.0, 228.4, 24.1, false),
        RawSample::new(0, 231.4, 228.6, 24.1, false),
        RawSample::new(1, 231.2, 228.5, 24.1, false),
        RawSample::new(2, 231.1, 228.5, 24.2, true),
        RawSample::new(5, 231.6, 228.7, 24.2, true),
        RawSample::new(5, 231.8, 228.7, 24.2, false),
        RawSample::new(6, 231.5, 228.6, 24.2, true),
        RawSample::new(7, 231.3, 228.6, 24.3, true),
    ];

    let mut aggregator = Aggregator::new();
    let mut seconds = Vec::new();
    for sample in &samples {
        aggregator.push(sample, &mut seconds)?;
        println!(
            "t={} pushed, {} second(s) closed so far",
            sample.timestamp,
            seconds.len()
        );
    }
    let stats = aggregator.finish(&mut seconds)?;

    println!("\nAggregated series:");
    for second in &seconds {
        match second.mean_we {
            Some(we) => println!(
                "  t={} n={} WE={:.2} mV lit={:?}",
                second.timestamp, second.sample_count, we, second.illuminated_all
            ),
            None => println!("  t={} placeholder", second.timestamp),
        }
    }

    println!("\nCounters:");
    println!("  samples:      {}", stats.samples);
    println!("  seconds:      {}", stats.seconds);
    println!("  placeholders: {} in {} gap(s)", stats.placeholders, stats.gaps);
    println!("  folded:       {}", stats.folded);

    let we = channel_values(&seconds, Channel::WorkingElectrode);
    let mean = moving_mean(&we, 2)?;
    let std = moving_std(&we, 2)?;

    println!("\nTrailing statistics (window 2):");
    for (position, value) in mean.iter_indexed() {
        println!("  [{}] mean={:?} std={:?}", position, value, std.at(position));
    }

    Ok(())
}
