//! Raw and aggregated sample records
//!
//! A [`RawSample`] is one logger row: several may share the same second and
//! whole seconds may be absent. An [`AggregatedSecond`] is one position of the
//! regular 1 Hz series produced by the aggregator; placeholders synthesized for
//! gaps carry `sample_count == 0` and no values.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Measurement channels carried by every sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Channel {
    /// Working electrode (mV) - the gas-sensing channel
    WorkingElectrode,
    /// Auxiliary electrode (mV) - reference/compensation channel
    AuxElectrode,
    /// Board temperature (°C)
    Temperature,
}

impl Channel {
    /// All channels, in column order
    pub const ALL: [Channel; 3] = [
        Channel::WorkingElectrode,
        Channel::AuxElectrode,
        Channel::Temperature,
    ];

    /// Short label used in logs and reports
    pub fn label(self) -> &'static str {
        match self {
            Channel::WorkingElectrode => "WE",
            Channel::AuxElectrode => "AUX",
            Channel::Temperature => "Temp",
        }
    }
}

/// One reading as delivered by the logger
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawSample {
    /// Second the row was stamped with
    pub timestamp: Timestamp,
    /// Working electrode voltage in mV
    pub working_electrode: f64,
    /// Auxiliary electrode voltage in mV
    pub aux_electrode: f64,
    /// Temperature in °C
    pub temperature: f64,
    /// Whether the external light source was on
    pub illuminated: bool,
}

impl RawSample {
    /// Build a sample from its fields, in column order
    pub fn new(
        timestamp: Timestamp,
        working_electrode: f64,
        aux_electrode: f64,
        temperature: f64,
        illuminated: bool,
    ) -> Self {
        Self {
            timestamp,
            working_electrode,
            aux_electrode,
            temperature,
            illuminated,
        }
    }

    /// Reading for one channel
    pub fn channel(&self, channel: Channel) -> f64 {
        match channel {
            Channel::WorkingElectrode => self.working_electrode,
            Channel::AuxElectrode => self.aux_electrode,
            Channel::Temperature => self.temperature,
        }
    }

    /// True when every channel reading is a finite number
    pub fn is_finite(&self) -> bool {
        Channel::ALL.iter().all(|&c| self.channel(c).is_finite())
    }
}

/// One second of the regularized series
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AggregatedSecond {
    /// The second this entry covers
    pub timestamp: Timestamp,
    /// Raw samples folded into this second; zero for gap placeholders
    pub sample_count: u32,
    /// Mean working electrode voltage
    pub mean_we: Option<f64>,
    /// Mean auxiliary electrode voltage
    pub mean_aux: Option<f64>,
    /// Mean temperature
    pub mean_temp: Option<f64>,
    /// True iff every folded sample was illuminated
    pub illuminated_all: Option<bool>,
}

impl AggregatedSecond {
    /// Placeholder for a second with no samples
    pub fn placeholder(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            sample_count: 0,
            mean_we: None,
            mean_aux: None,
            mean_temp: None,
            illuminated_all: None,
        }
    }

    /// True if this entry was synthesized for a gap
    pub fn is_placeholder(&self) -> bool {
        self.sample_count == 0
    }

    /// Mean for one channel
    pub fn channel(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::WorkingElectrode => self.mean_we,
            Channel::AuxElectrode => self.mean_aux,
            Channel::Temperature => self.mean_temp,
        }
    }
}

/// Per-second values of one channel, missing seconds included
pub fn channel_values(seconds: &[AggregatedSecond], channel: Channel) -> Vec<Option<f64>> {
    seconds.iter().map(|s| s.channel(channel)).collect()
}

/// Per-second illumination state, missing seconds included
pub fn illumination(seconds: &[AggregatedSecond]) -> Vec<Option<bool>> {
    seconds.iter().map(|s| s.illuminated_all).collect()
}
