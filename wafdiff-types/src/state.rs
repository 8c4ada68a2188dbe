//! Run-state of a measurement.

use std::fmt;
use std::str::FromStr;

/// Which side of the change a measurement was taken on.
///
/// A comparison always pairs a `Before` run with an `After` run that differ
/// only by the change under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RunState {
    Before,
    After,
}

impl RunState {
    /// Both states, in comparison order.
    pub const ALL: [RunState; 2] = [RunState::Before, RunState::After];

    /// The tag used in collector file names (`before_*`, `after_*`).
    pub fn tag(&self) -> &'static str {
        match self {
            RunState::Before => "before",
            RunState::After => "after",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for RunState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Ok(RunState::Before),
            "after" => Ok(RunState::After),
            other => Err(format!("unknown run state: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        for state in RunState::ALL {
            assert_eq!(state.tag().parse::<RunState>().unwrap(), state);
        }
        assert_eq!("AFTER".parse::<RunState>().unwrap(), RunState::After);
        assert!("during".parse::<RunState>().is_err());
    }
}
