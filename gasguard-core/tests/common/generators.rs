//! Deterministic recording generators
//!
//! Produces logger-like sample streams: a slowly drifting working electrode
//! with uniform noise, sub-second duplicates, dropped seconds, noise bursts
//! and light source switching. Everything is driven by a seeded LCG so every
//! test run sees the same data.

use gasguard_core::{RawSample, Timestamp};

/// Linear congruential generator, same constants as Numerical Recipes
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Uniform in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform in `[-amplitude, amplitude)`
    pub fn noise(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() - 0.5) * 2.0 * amplitude
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Builder for a synthetic recording
pub struct RecordingGenerator {
    rng: Lcg,
    start: Timestamp,
    seconds: u32,
    we_level: f64,
    aux_level: f64,
    temperature: f64,
    noise: f64,
    duplicate_probability: f64,
    gaps: Vec<(u32, u32)>,
    bursts: Vec<(u32, u32, f64)>,
    light_on: Vec<(u32, u32)>,
}

impl RecordingGenerator {
    pub fn new(seed: u32, seconds: u32) -> Self {
        Self {
            rng: Lcg::new(seed),
            start: 1_623_665_702,
            seconds,
            we_level: 231.0,
            aux_level: 228.5,
            temperature: 24.0,
            noise: 0.05,
            duplicate_probability: 0.0,
            gaps: Vec::new(),
            bursts: Vec::new(),
            light_on: Vec::new(),
        }
    }

    pub fn start(mut self, start: Timestamp) -> Self {
        self.start = start;
        self
    }

    pub fn noise(mut self, amplitude: f64) -> Self {
        self.noise = amplitude;
        self
    }

    pub fn duplicates(mut self, probability: f64) -> Self {
        self.duplicate_probability = probability;
        self
    }

    /// Drop `length` seconds starting at relative second `at`
    pub fn gap(mut self, at: u32, length: u32) -> Self {
        self.gaps.push((at, length));
        self
    }

    /// Add ±`amplitude` alternating noise for `length` seconds from `at`
    pub fn burst(mut self, at: u32, length: u32, amplitude: f64) -> Self {
        self.bursts.push((at, length, amplitude));
        self
    }

    /// Light source on for `length` seconds from `at`
    pub fn light(mut self, at: u32, length: u32) -> Self {
        self.light_on.push((at, length));
        self
    }

    pub fn generate(mut self) -> Vec<RawSample> {
        let mut samples = Vec::with_capacity(self.seconds as usize);

        for s in 0..self.seconds {
            if in_range(&self.gaps, s) {
                continue;
            }

            let lit = in_range(&self.light_on, s);
            let burst = self
                .bursts
                .iter()
                .find(|&&(at, length, _)| s >= at && s < at + length)
                .map(|&(_, _, amplitude)| if s % 2 == 0 { amplitude } else { -amplitude })
                .unwrap_or(0.0);

            let repeats = if self.rng.chance(self.duplicate_probability) { 2 } else { 1 };
            for _ in 0..repeats {
                samples.push(RawSample::new(
                    self.start + s as Timestamp,
                    self.we_level + burst + self.rng.noise(self.noise),
                    self.aux_level + self.rng.noise(self.noise),
                    self.temperature + self.rng.noise(0.1),
                    lit,
                ));
            }
        }

        samples
    }
}

fn in_range(ranges: &[(u32, u32)], s: u32) -> bool {
    ranges.iter().any(|&(at, length)| s >= at && s < at + length)
}
