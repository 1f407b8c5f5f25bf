//! Common test utilities for integration tests
//!
//! - [`generators`]: seeded synthetic recordings
//! - [`scenarios`]: named recordings with matching configurations
//! - assertion helpers for series comparisons

#![allow(dead_code)]

use gasguard_core::Series;

pub mod generators;
pub mod scenarios;

/// Assert two optional values agree to within `tolerance`, missing matching missing
pub fn assert_close(actual: Option<f64>, expected: Option<f64>, tolerance: f64) {
    match (actual, expected) {
        (Some(a), Some(e)) => assert!(
            (a - e).abs() <= tolerance,
            "expected {} got {} (tolerance {})",
            e,
            a,
            tolerance
        ),
        (None, None) => {}
        _ => panic!("expected {:?} got {:?}", expected, actual),
    }
}

/// Assert two series cover the same positions with matching values
pub fn assert_series_close(actual: &Series, expected: &Series, tolerance: f64) {
    assert_eq!(actual.offset(), expected.offset(), "offset");
    assert_eq!(actual.len(), expected.len(), "length");
    for ((position, a), e) in actual.iter_indexed().zip(expected.iter()) {
        match (a, e) {
            (Some(a), Some(e)) => assert!(
                (a - e).abs() <= tolerance,
                "position {}: expected {} got {}",
                position,
                e,
                a
            ),
            (None, None) => {}
            _ => panic!("position {}: expected {:?} got {:?}", position, e, a),
        }
    }
}
