//! Quality Gate and Calibration
//!
//! Runs a synthetic ten-minute recording with a noise burst through the full
//! pipeline and prints what the gate blanked.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_quality_gate
//! ```

use gasguard_core::{Pipeline, PipelineConfig, PipelineError, RawSample};

fn main() -> Result<(), PipelineError> {
    println!("GasGuard Quality Gate Example");
    println!("=============================\n");

    let samples: Vec<RawSample> = (0..600)
        .map(|t| {
            // Deterministic ripple, with a burst between 200 s and 215 s
            let ripple = ((t * 7) % 11) as f64 * 0.01;
            let burst = if (200..215).contains(&t) { 3.0 * (t % 2) as f64 } else { 0.0 };
            RawSample::new(t, 231.0 + ripple + burst, 228.5, 24.0, t >= 400)
        })
        .collect();

    let config = PipelineConfig::default()
        .with_calibration(226.0, 0.3)
        .with_windows(15, 60, 60)
        .with_gate(0.8, 120);
    let output = Pipeline::new(config)?.run(&samples)?;

    println!("Blackouts:");
    for blackout in output.gated.blackouts() {
        println!(
            "  [{}, {}) = {} s, t={:?}",
            blackout.start,
            blackout.end,
            blackout.len(),
            output.timestamp(blackout.start)
        );
    }

    println!("\nLight source:");
    for transition in &output.transitions {
        println!("  {:?} at t={}", transition.kind, transition.timestamp);
    }

    println!("\nCalibrated (every minute):");
    for position in (60..600).step_by(60) {
        println!(
            "  [{:3}] moving={:?} gated={:?} resilient={:?}",
            position,
            output.calibrated_moving.standard.at(position),
            output.calibrated_gated.standard.at(position),
            output.calibrated_gated.resilient.at(position)
        );
    }

    let summary = output.summary;
    println!("\nSummary:");
    println!("  seconds:  {}", summary.total_seconds);
    println!("  blanked:  {} s in {} blackout(s)", summary.blanked_seconds, summary.blackouts);
    println!("  coverage: {:.1}%", summary.coverage * 100.0);

    Ok(())
}
