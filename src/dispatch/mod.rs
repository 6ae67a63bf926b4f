//! Device command dispatch
//!
//! - `dispatcher`: per-device action -> signed API call -> status message
//! - `status`: single-slot, last-write-wins status sink

mod dispatcher;
mod status;

pub use self::dispatcher::Panel;
pub use self::status::{StatusBoard, StatusSink};

use std::fmt;
use std::str::FromStr;

/// Button a user can press on a device panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    On,
    Off,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::On => "on",
            Action::Off => "off",
        }
    }

    /// Command sent when the device's config does not name one
    pub fn default_command(&self) -> &'static str {
        match self {
            Action::On => "turnOn",
            Action::Off => "turnOff",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" => Ok(Action::On),
            "off" => Ok(Action::Off),
            other => Err(format!("Unknown action '{}', expected 'on' or 'off'", other)),
        }
    }
}
