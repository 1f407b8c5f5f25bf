//! Light source switching points
//!
//! Lists the seconds at which the illumination state of the regularized
//! series changes. Gap placeholders have no illumination state and are
//! skipped, so a flip that happens inside a gap is reported at the first
//! known second after it.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{sample::AggregatedSecond, time::Timestamp};

/// Direction of a switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TransitionKind {
    /// Off to on
    SwitchedOn,
    /// On to off
    SwitchedOff,
}

/// A change of illumination state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IlluminationTransition {
    /// Position in the aggregated series of the first second in the new state
    pub index: usize,
    /// Timestamp of that second
    pub timestamp: Timestamp,
    /// Direction of the change
    pub kind: TransitionKind,
}

impl IlluminationTransition {
    /// State after the transition
    pub fn illuminated(&self) -> bool {
        self.kind == TransitionKind::SwitchedOn
    }
}

/// Find every illumination flip in `seconds`
///
/// The initial state is the first known one and is not itself a transition.
pub fn illumination_transitions(seconds: &[AggregatedSecond]) -> Vec<IlluminationTransition> {
    let mut transitions = Vec::new();
    let mut state: Option<bool> = None;

    for (index, second) in seconds.iter().enumerate() {
        let Some(lit) = second.illuminated_all else {
            continue;
        };
        if let Some(previous) = state {
            if previous != lit {
                transitions.push(IlluminationTransition {
                    index,
                    timestamp: second.timestamp,
                    kind: if lit {
                        TransitionKind::SwitchedOn
                    } else {
                        TransitionKind::SwitchedOff
                    },
                });
            }
        }
        state = Some(lit);
    }

    transitions
}
