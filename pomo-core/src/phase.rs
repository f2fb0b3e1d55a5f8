use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The three kinds of interval a Pomodoro cycle moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl PhaseKind {
    pub const ALL: [PhaseKind; 3] = [PhaseKind::Work, PhaseKind::ShortBreak, PhaseKind::LongBreak];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Work => "work",
            PhaseKind::ShortBreak => "short-break",
            PhaseKind::LongBreak => "long-break",
        }
    }

    pub fn default_label(&self) -> &'static str {
        match self {
            PhaseKind::Work => "Focus Time",
            PhaseKind::ShortBreak => "Short Break",
            PhaseKind::LongBreak => "Long Break",
        }
    }

    pub fn default_minutes(&self) -> u32 {
        match self {
            PhaseKind::Work => 25,
            PhaseKind::ShortBreak => 5,
            PhaseKind::LongBreak => 15,
        }
    }

    /// Body of the alert shown when a phase of this kind runs out.
    pub fn completion_message(&self) -> &'static str {
        match self {
            PhaseKind::Work => "Great work! Time for a break!",
            PhaseKind::ShortBreak => "Break's over! Ready to focus?",
            PhaseKind::LongBreak => "Long break finished! Let's get back to work!",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, PhaseKind::Work)
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "work" => Ok(PhaseKind::Work),
            "short-break" => Ok(PhaseKind::ShortBreak),
            "long-break" => Ok(PhaseKind::LongBreak),
            other => Err(ConfigError::invalid(
                "phase",
                format!("unknown phase '{other}'"),
            )),
        }
    }
}
