//! Phase durations and the thresholds that steer the session cycle.
//!
//! [`TimerSettings`] is the authored form (minutes, as written in the
//! `[timer]` table of the config file). [`SessionConfig`] is what a
//! controller actually holds once the settings have been validated.

use serde::Deserialize;
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::phase::PhaseKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSettings {
    pub duration_seconds: u32,
    pub label: String,
}

impl PhaseSettings {
    fn for_kind(kind: PhaseKind) -> Self {
        Self {
            duration_seconds: kind.default_minutes() * 60,
            label: kind.default_label().to_string(),
        }
    }
}

/// Duration and label for each [`PhaseKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseConfig {
    work: PhaseSettings,
    short_break: PhaseSettings,
    long_break: PhaseSettings,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            work: PhaseSettings::for_kind(PhaseKind::Work),
            short_break: PhaseSettings::for_kind(PhaseKind::ShortBreak),
            long_break: PhaseSettings::for_kind(PhaseKind::LongBreak),
        }
    }
}

impl PhaseConfig {
    pub fn get(&self, kind: PhaseKind) -> &PhaseSettings {
        match kind {
            PhaseKind::Work => &self.work,
            PhaseKind::ShortBreak => &self.short_break,
            PhaseKind::LongBreak => &self.long_break,
        }
    }

    fn get_mut(&mut self, kind: PhaseKind) -> &mut PhaseSettings {
        match kind {
            PhaseKind::Work => &mut self.work,
            PhaseKind::ShortBreak => &mut self.short_break,
            PhaseKind::LongBreak => &mut self.long_break,
        }
    }

    pub fn duration_seconds(&self, kind: PhaseKind) -> u32 {
        self.get(kind).duration_seconds
    }

    pub fn minutes(&self, kind: PhaseKind) -> u32 {
        self.get(kind).duration_seconds / 60
    }

    pub fn label(&self, kind: PhaseKind) -> &str {
        &self.get(kind).label
    }

    /// Stores `minutes` as the phase duration. Zero and values that do not
    /// fit in seconds are rejected and the old duration is kept.
    pub fn set_minutes(&mut self, kind: PhaseKind, minutes: u32) -> Result<()> {
        let seconds = minutes_to_seconds(field_for(kind), minutes)?;
        self.get_mut(kind).duration_seconds = seconds;
        Ok(())
    }

    pub fn set_label(&mut self, kind: PhaseKind, label: impl Into<String>) {
        self.get_mut(kind).label = label.into();
    }
}

fn field_for(kind: PhaseKind) -> &'static str {
    match kind {
        PhaseKind::Work => "work duration",
        PhaseKind::ShortBreak => "short break duration",
        PhaseKind::LongBreak => "long break duration",
    }
}

fn minutes_to_seconds(field: &'static str, minutes: u32) -> Result<u32> {
    let minutes = positive(field, minutes)?;
    minutes
        .checked_mul(60)
        .ok_or_else(|| ConfigError::invalid(field, format!("{minutes} minutes is too long")))
}

pub(crate) fn positive(field: &'static str, value: u32) -> Result<u32> {
    if value == 0 {
        Err(ConfigError::invalid(field, "must be a positive integer"))
    } else {
        Ok(value)
    }
}

/// Parses a settings input field into a positive integer.
///
/// Empty, non-numeric, negative and zero input all map to
/// [`ConfigError::InvalidConfiguration`].
pub fn parse_positive(field: &'static str, input: &str) -> Result<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid(field, "a value is required"));
    }
    let value: u32 = trimmed
        .parse()
        .map_err(|_| ConfigError::invalid(field, format!("'{trimmed}' is not a positive integer")))?;
    positive(field, value)
}

/// Validated configuration held by a [`SessionController`](crate::SessionController).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub phases: PhaseConfig,
    pub sessions_before_long_break: u32,
    pub focus_target: u32,
    pub auto_advance: bool,
    /// Wait between a phase completing and the next phase being shown.
    pub settle_delay: Duration,
    /// Extra wait before an auto-advanced break starts running.
    pub auto_start_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            phases: PhaseConfig::default(),
            sessions_before_long_break: 4,
            focus_target: 4,
            auto_advance: false,
            settle_delay: Duration::from_millis(1000),
            auto_start_delay: Duration::from_millis(500),
        }
    }
}

/// The `[timer]` table of the config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimerSettings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub work_label: Option<String>,
    pub short_break_label: Option<String>,
    pub long_break_label: Option<String>,
    pub sessions_before_long_break: u32,
    pub focus_target: u32,
    pub auto_advance: bool,
    pub settle_delay_ms: u64,
    pub auto_start_delay_ms: u64,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: PhaseKind::Work.default_minutes(),
            short_break_minutes: PhaseKind::ShortBreak.default_minutes(),
            long_break_minutes: PhaseKind::LongBreak.default_minutes(),
            work_label: None,
            short_break_label: None,
            long_break_label: None,
            sessions_before_long_break: 4,
            focus_target: 4,
            auto_advance: false,
            settle_delay_ms: 1000,
            auto_start_delay_ms: 500,
        }
    }
}

impl TimerSettings {
    pub fn validate(&self) -> Result<SessionConfig> {
        let mut phases = PhaseConfig::default();
        phases.set_minutes(PhaseKind::Work, self.work_minutes)?;
        phases.set_minutes(PhaseKind::ShortBreak, self.short_break_minutes)?;
        phases.set_minutes(PhaseKind::LongBreak, self.long_break_minutes)?;

        let labels = [
            (PhaseKind::Work, &self.work_label),
            (PhaseKind::ShortBreak, &self.short_break_label),
            (PhaseKind::LongBreak, &self.long_break_label),
        ];
        for (kind, label) in labels {
            if let Some(label) = label {
                if label.trim().is_empty() {
                    return Err(ConfigError::invalid("label", format!("{kind} label is empty")));
                }
                phases.set_label(kind, label.clone());
            }
        }

        Ok(SessionConfig {
            phases,
            sessions_before_long_break: positive(
                "sessions before long break",
                self.sessions_before_long_break,
            )?,
            focus_target: positive("focus target", self.focus_target)?,
            auto_advance: self.auto_advance,
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            auto_start_delay: Duration::from_millis(self.auto_start_delay_ms),
        })
    }
}
