//! Notifications pushed from the session core to whatever renders it.

use crate::phase::PhaseKind;

/// Receives every state change of a [`SessionController`](crate::SessionController).
///
/// All methods default to doing nothing so a presenter only implements the
/// notifications it renders. Implementations must not fail: an alert that
/// cannot be shown is the presenter's problem, never the timer's.
pub trait Presenter {
    /// Remaining time changed (a tick, a reset, or a new phase).
    fn on_tick(&mut self, _remaining_seconds: u32, _total_seconds: u32, _phase: PhaseKind) {}

    fn on_phase_changed(&mut self, _phase: PhaseKind, _label: &str) {}

    /// A phase ran out or was ended early. Drives the audible and visual alert.
    fn on_phase_complete(&mut self, _phase: PhaseKind) {}

    fn on_run_state_changed(&mut self, _is_running: bool) {}

    fn on_counter_changed(&mut self, _completed: u32, _target: u32) {}

    fn on_auto_advance_changed(&mut self, _enabled: bool) {}
}

/// Headless presenter.
impl Presenter for () {}
