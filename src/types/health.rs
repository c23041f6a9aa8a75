//! Traffic-light health of the most recent fetch cycle, tracked separately
//! for measurements and forecasts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality of the data the last fetch cycle left behind.
///
/// `Green` means fresh data, `Yellow` means the newest available remote data
/// is already more than an hour old, `Red` means the remote side offered
/// nothing usable and the cycle was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Green,
    Yellow,
    Red,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Green => "green",
            HealthState::Yellow => "yellow",
            HealthState::Red => "red",
        }
    }
}

impl Default for HealthState {
    /// A fresh client starts out green, before any fetch has run.
    fn default() -> Self {
        HealthState::Green
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
