//! Operating modes.
//!
//! `OperatingMode` is what the control logic reasons about. The console's
//! single-choice selector binds to a plain index; [`OperatingMode::from_index`]
//! and [`OperatingMode::index`] are the only places that index is interpreted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Active control strategy of the console. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Absolute positioning with velocity/acceleration profile.
    #[default]
    Position,
    /// Continuous rotation at a commanded velocity.
    Velocity,
    /// Reserved passthrough mode. Entering it has no hardware side effect.
    System,
}

impl OperatingMode {
    /// All modes in selector order.
    pub const ALL: [OperatingMode; 3] = [Self::Position, Self::Velocity, Self::System];

    /// Translate a selector-widget index into a mode.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Position),
            1 => Some(Self::Velocity),
            2 => Some(Self::System),
            _ => None,
        }
    }

    /// Selector-widget index of this mode.
    #[inline]
    pub const fn index(self) -> u8 {
        match self {
            Self::Position => 0,
            Self::Velocity => 1,
            Self::System => 2,
        }
    }

    /// Hardware mode the motor controller must be switched to, if any.
    #[inline]
    pub const fn drive_mode(self) -> Option<DriveMode> {
        match self {
            Self::Position => Some(DriveMode::Position),
            Self::Velocity => Some(DriveMode::Velocity),
            Self::System => None,
        }
    }

    /// Label shown on the selector.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Position => "Position Mode",
            Self::Velocity => "Velocity Mode",
            Self::System => "System",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Control mode understood by the motor controller itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveMode {
    Position,
    Velocity,
}
