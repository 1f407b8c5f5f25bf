//! Sample sources
//!
//! The pipeline itself never performs I/O. A [`SampleSource`] hands it raw
//! samples one at a time, pull-based, in timestamp order:
//!
//! - [`MemorySource`]: replay a slice (tests, recorded data)
//! - [`CsvSource`](csv::CsvSource): the logger's comma-separated export
//!   (`source-csv` feature)
//!
//! ```rust
//! use gasguard_core::{MemorySource, RawSample, SampleSource};
//!
//! let samples = [RawSample::new(0, 1.0, 1.0, 20.0, false)];
//! let mut source = MemorySource::new(&samples);
//! assert!(matches!(source.next_sample(), Some(Ok(_))));
//! assert!(source.next_sample().is_none());
//! ```

use core::convert::Infallible;
use core::fmt;

use crate::sample::RawSample;

#[cfg(feature = "source-csv")]
pub mod csv;

#[cfg(feature = "source-csv")]
pub use self::csv::{CsvSource, CsvSourceConfig, CsvStats};

/// Pull-based supplier of raw samples
///
/// Returns `None` once exhausted. Implementations yield samples in the order
/// they were recorded; ordering is checked by the aggregator, not here.
pub trait SampleSource {
    /// Error produced when a sample cannot be read
    type Error;

    /// Next sample, `None` when the source is exhausted
    fn next_sample(&mut self) -> Option<Result<RawSample, Self::Error>>;

    /// Bounds on the remaining number of samples
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

/// Errors raised by sources that read external data
#[derive(Debug)]
pub enum SourceError<E> {
    /// Underlying reader failed
    Transport(E),
    /// A row could not be turned into a sample
    Parse {
        /// 1-based line number in the input
        line: usize,
        /// What was wrong with it
        reason: &'static str,
    },
}

impl<E: fmt::Display> fmt::Display for SourceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Parse { line, reason } => write!(f, "Parse error on line {}: {}", line, reason),
        }
    }
}

#[cfg(feature = "std")]
impl<E: std::error::Error + 'static> std::error::Error for SourceError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Parse { .. } => None,
        }
    }
}

/// Replays samples from a slice
#[derive(Debug, Clone)]
pub struct MemorySource<'a> {
    samples: &'a [RawSample],
    position: usize,
}

impl<'a> MemorySource<'a> {
    /// Create a source over `samples`
    pub fn new(samples: &'a [RawSample]) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    /// Rewind to the first sample
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Samples handed out so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// True once every sample has been handed out
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.samples.len()
    }
}

impl<'a> SampleSource for MemorySource<'a> {
    type Error = Infallible;

    fn next_sample(&mut self) -> Option<Result<RawSample, Self::Error>> {
        let sample = *self.samples.get(self.position)?;
        self.position += 1;
        Some(Ok(sample))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len() - self.position;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_replays_in_order() {
        let samples = [
            RawSample::new(0, 1.0, 0.0, 20.0, false),
            RawSample::new(1, 2.0, 0.0, 20.0, true),
        ];
        let mut source = MemorySource::new(&samples);
        assert_eq!(source.size_hint(), (2, Some(2)));

        let first = source.next_sample().unwrap().unwrap();
        assert_eq!(first.working_electrode, 1.0);
        assert_eq!(source.size_hint(), (1, Some(1)));

        let second = source.next_sample().unwrap().unwrap();
        assert!(second.illuminated);
        assert!(source.is_exhausted());
        assert!(source.next_sample().is_none());

        source.reset();
        assert_eq!(source.position(), 0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn source_error_display() {
        let err: SourceError<&str> = SourceError::Transport("disk unplugged");
        assert_eq!(format!("{}", err), "Transport error: disk unplugged");

        let err: SourceError<&str> = SourceError::Parse { line: 7, reason: "bad date" };
        assert_eq!(format!("{}", err), "Parse error on line 7: bad date");
    }
}
