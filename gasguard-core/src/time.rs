//! Second-resolution time handling
//!
//! The logger stamps rows with wall-clock seconds. Everything downstream of the
//! aggregator works in elapsed-second positions, so the only time arithmetic
//! the core needs is classifying the step between two consecutive timestamps.

/// Timestamp in whole seconds (Unix epoch, or any fixed origin)
pub type Timestamp = i64;

/// Relationship between a bucket's second and the next sample's second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondStep {
    /// Same second - fold into the open bucket
    Same,
    /// Exactly one second later - close and reopen
    Next,
    /// More than one second later - `missing` placeholders are needed in between
    Gap {
        /// Number of whole seconds with no samples
        missing: u64,
    },
    /// Timestamp went backwards
    Backwards,
}

impl SecondStep {
    /// Placeholder buckets required before the next real bucket
    pub fn placeholders(self) -> u64 {
        match self {
            SecondStep::Gap { missing } => missing,
            _ => 0,
        }
    }
}

/// Classify the step from `previous` to `next`
pub fn classify_step(previous: Timestamp, next: Timestamp) -> SecondStep {
    if next < previous {
        return SecondStep::Backwards;
    }

    match next.abs_diff(previous) {
        0 => SecondStep::Same,
        1 => SecondStep::Next,
        delta => SecondStep::Gap { missing: delta - 1 },
    }
}

/// Number of placeholder seconds strictly between `previous` and `next`
///
/// Zero when the two are equal, adjacent, or out of order.
pub fn missing_seconds(previous: Timestamp, next: Timestamp) -> u64 {
    classify_step(previous, next).placeholders()
}

/// Number of seconds covered by the closed range `[first, last]`
///
/// Zero for a reversed range, `None` when the count does not fit in a `u64`.
pub fn span_seconds(first: Timestamp, last: Timestamp) -> Option<u64> {
    if last < first {
        return Some(0);
    }
    last.abs_diff(first).checked_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_classification() {
        assert_eq!(classify_step(100, 100), SecondStep::Same);
        assert_eq!(classify_step(100, 101), SecondStep::Next);
        assert_eq!(classify_step(100, 104), SecondStep::Gap { missing: 3 });
        assert_eq!(classify_step(100, 99), SecondStep::Backwards);
    }

    #[test]
    fn missing_seconds_between() {
        assert_eq!(missing_seconds(0, 0), 0);
        assert_eq!(missing_seconds(0, 1), 0);
        assert_eq!(missing_seconds(0, 2), 1);
        assert_eq!(missing_seconds(-5, 5), 9);
        // Backwards steps are an error elsewhere, never a fill count
        assert_eq!(missing_seconds(10, 3), 0);
    }

    #[test]
    fn span_is_inclusive() {
        assert_eq!(span_seconds(0, 0), Some(1));
        assert_eq!(span_seconds(0, 3), Some(4));
        assert_eq!(span_seconds(3, 0), Some(0));
        assert_eq!(span_seconds(i64::MIN, i64::MAX), None);
        assert_eq!(span_seconds(i64::MIN, i64::MAX - 1), Some(u64::MAX));
    }
}
