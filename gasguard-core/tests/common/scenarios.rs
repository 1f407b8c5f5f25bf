//! Named recordings used across integration tests

use gasguard_core::{PipelineConfig, RawSample};

use super::generators::RecordingGenerator;

/// A recording plus the configuration it is meant to be run with
pub struct Scenario {
    pub name: &'static str,
    pub samples: Vec<RawSample>,
    pub config: PipelineConfig,
}

/// Small windows so short recordings still leave plenty of output
pub fn short_windows() -> PipelineConfig {
    PipelineConfig::default()
        .with_calibration(226.0, 0.3)
        .with_windows(5, 10, 20)
        .with_gate(0.8, 30)
}

/// Ten minutes of quiet signal, one row per second
pub fn quiet() -> Scenario {
    Scenario {
        name: "quiet",
        samples: RecordingGenerator::new(7, 600).generate(),
        config: short_windows(),
    }
}

/// Quiet signal with a 20 s noise burst at 300 s
pub fn single_burst() -> Scenario {
    Scenario {
        name: "single_burst",
        samples: RecordingGenerator::new(11, 600).burst(300, 20, 5.0).generate(),
        config: short_windows(),
    }
}

/// Duplicated rows, two gaps and a lit period; the field recording shape
pub fn field_recording() -> Scenario {
    Scenario {
        name: "field_recording",
        samples: RecordingGenerator::new(23, 1_800)
            .duplicates(0.3)
            .gap(400, 12)
            .gap(1_200, 3)
            .light(600, 300)
            .burst(1_500, 10, 4.0)
            .generate(),
        config: PipelineConfig::default().with_calibration(226.0, 0.3),
    }
}

pub fn all() -> Vec<Scenario> {
    vec![quiet(), single_burst(), field_recording()]
}
