//! The Pomodoro session state machine.
//!
//! ## Phase cycle
//!
//! ```text
//! Work -> ShortBreak -> Work -> ShortBreak -> ... -> Work -> LongBreak -> Work
//! ```
//!
//! Every N-th completed work session (N = `sessions_before_long_break`) is
//! followed by a long break, every other one by a short break. A completed
//! phase is replaced by the next one after the settle delay; breaks may
//! start on their own when auto-advance is on, work never does.
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = SessionController::new(SessionConfig::default(), presenter, scheduler);
//! controller.start();
//! // In the event loop:
//! controller.fire(firing);
//! ```

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::config::{positive, PhaseConfig, SessionConfig};
use crate::error::Result;
use crate::phase::PhaseKind;
use crate::presenter::Presenter;
use crate::scheduler::{Firing, Scheduler, TaskId};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub current_phase: PhaseKind,
    pub remaining_seconds: u32,
    /// Length of the current phase instance, fixed when the phase starts.
    pub total_seconds: u32,
    pub is_running: bool,
    pub completed_work_sessions: u32,
    pub auto_advance: bool,
    pub sessions_before_long_break: u32,
    pub focus_target: u32,
}

/// Work waiting for the settle delay to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    SwitchPhase(PhaseKind),
    AutoStart,
}

pub struct SessionController<P, S> {
    state: SessionState,
    phases: PhaseConfig,
    settle_delay: Duration,
    auto_start_delay: Duration,
    tick_task: Option<TaskId>,
    pending: Option<(TaskId, Deferred)>,
    presenter: P,
    scheduler: S,
}

impl<P: Presenter, S: Scheduler> SessionController<P, S> {
    pub fn new(config: SessionConfig, presenter: P, scheduler: S) -> Self {
        let total = config.phases.duration_seconds(PhaseKind::Work);
        Self {
            state: SessionState {
                current_phase: PhaseKind::Work,
                remaining_seconds: total,
                total_seconds: total,
                is_running: false,
                completed_work_sessions: 0,
                auto_advance: config.auto_advance,
                sessions_before_long_break: config.sessions_before_long_break,
                focus_target: config.focus_target,
            },
            phases: config.phases,
            settle_delay: config.settle_delay,
            auto_start_delay: config.auto_start_delay,
            tick_task: None,
            pending: None,
            presenter,
            scheduler,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase_config(&self) -> &PhaseConfig {
        &self.phases
    }

    pub fn current_label(&self) -> &str {
        self.phases.label(self.state.current_phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        if self.state.total_seconds == 0 {
            return 0.0;
        }
        let elapsed = self.state.total_seconds - self.state.remaining_seconds;
        f64::from(elapsed) / f64::from(self.state.total_seconds)
    }

    pub fn format_remaining(&self) -> String {
        format_clock(self.state.remaining_seconds)
    }

    /// `MM:SS - Label`, suitable for a window title.
    pub fn window_title(&self) -> String {
        format!("{} - {}", self.format_remaining(), self.current_label())
    }

    /// True while a completed phase waits to be replaced, or a break waits
    /// to auto-start.
    pub fn has_pending_transition(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_transition(&self) -> Option<Deferred> {
        self.pending.map(|(_, task)| task)
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Pushes the whole current state to the presenter, for a first render.
    pub fn announce(&mut self) {
        let phase = self.state.current_phase;
        self.presenter.on_phase_changed(phase, self.phases.label(phase));
        self.presenter
            .on_tick(self.state.remaining_seconds, self.state.total_seconds, phase);
        self.presenter.on_run_state_changed(self.state.is_running);
        self.presenter
            .on_counter_changed(self.state.completed_work_sessions, self.state.focus_target);
        self.presenter.on_auto_advance_changed(self.state.auto_advance);
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Starts the countdown of the current phase.
    ///
    /// While a completed phase waits for its switch, the switch happens now
    /// instead; the completed phase is never resumed. Whether the new phase
    /// then starts follows auto-advance, as for a regular switch.
    pub fn start(&mut self) {
        if self.state.is_running {
            return;
        }
        if let Some(Deferred::SwitchPhase(next)) = self.pending_transition() {
            debug!(%next, "start requested while switch pending; switching now");
            self.cancel_pending();
            self.run_deferred(Deferred::SwitchPhase(next));
            return;
        }
        if self.state.remaining_seconds == 0 {
            return;
        }
        self.cancel_pending();
        self.state.is_running = true;
        self.tick_task = Some(self.scheduler.start_ticking(TICK_PERIOD));
        debug!(phase = %self.state.current_phase, remaining = self.state.remaining_seconds, "timer started");
        self.presenter.on_run_state_changed(true);
    }

    pub fn pause(&mut self) {
        if !self.state.is_running {
            return;
        }
        self.state.is_running = false;
        if let Some(id) = self.tick_task.take() {
            self.scheduler.cancel(id);
        }
        debug!(phase = %self.state.current_phase, remaining = self.state.remaining_seconds, "timer paused");
        self.presenter.on_run_state_changed(false);
    }

    pub fn toggle_running(&mut self) {
        if self.state.is_running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// One second passed. Ignored unless running.
    pub fn tick(&mut self) {
        if !self.state.is_running {
            return;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        self.presenter.on_tick(
            self.state.remaining_seconds,
            self.state.total_seconds,
            self.state.current_phase,
        );
        if self.state.remaining_seconds == 0 {
            self.complete_phase();
        }
    }

    /// Restores the current phase to its full configured length. Phase,
    /// counter and auto-advance are left alone.
    pub fn reset(&mut self) {
        self.pause();
        self.cancel_pending();
        self.reload_current();
    }

    /// Ends the current phase now, counting it as completed.
    ///
    /// Ignored while a completed phase is still waiting for its switch, so a
    /// repeated request cannot count the same work session twice.
    pub fn end_early(&mut self) {
        if let Some(Deferred::SwitchPhase(next)) = self.pending_transition() {
            debug!(%next, "end requested while switch pending; ignored");
            return;
        }
        self.pause();
        self.complete_phase();
    }

    pub fn complete_phase(&mut self) {
        self.pause();
        self.cancel_pending();

        let finished = self.state.current_phase;
        self.presenter.on_phase_complete(finished);

        let next = match finished {
            PhaseKind::Work => {
                self.state.completed_work_sessions = self.state.completed_work_sessions.saturating_add(1);
                self.presenter
                    .on_counter_changed(self.state.completed_work_sessions, self.state.focus_target);
                next_break(self.state.completed_work_sessions, self.state.sessions_before_long_break)
            }
            PhaseKind::ShortBreak | PhaseKind::LongBreak => PhaseKind::Work,
        };
        info!(
            %finished,
            %next,
            completed = self.state.completed_work_sessions,
            "phase complete"
        );
        self.schedule(Deferred::SwitchPhase(next), self.settle_delay);
    }

    pub fn switch_phase(&mut self, phase: PhaseKind) {
        self.cancel_pending();
        self.state.current_phase = phase;
        self.reload_current();
        debug!(%phase, total = self.state.total_seconds, "switched phase");
        self.presenter.on_phase_changed(phase, self.phases.label(phase));
    }

    /// Sets a phase duration in minutes. When `phase` is current and idle the
    /// remaining time follows immediately; a running phase keeps its length.
    pub fn set_phase_duration(&mut self, phase: PhaseKind, minutes: u32) -> Result<()> {
        if let Err(e) = self.phases.set_minutes(phase, minutes) {
            warn!(%phase, minutes, "rejected duration: {}", e);
            return Err(e);
        }
        if phase == self.state.current_phase && !self.state.is_running {
            self.reload_current();
        }
        Ok(())
    }

    /// Takes effect from the next completed work session.
    pub fn set_sessions_before_long_break(&mut self, sessions: u32) -> Result<()> {
        let sessions = positive("sessions before long break", sessions).inspect_err(|e| {
            warn!(sessions, "rejected long break threshold: {}", e);
        })?;
        self.state.sessions_before_long_break = sessions;
        Ok(())
    }

    pub fn set_focus_target(&mut self, target: u32) -> Result<()> {
        let target = positive("focus target", target).inspect_err(|e| {
            warn!(target, "rejected focus target: {}", e);
        })?;
        self.state.focus_target = target;
        self.presenter
            .on_counter_changed(self.state.completed_work_sessions, target);
        Ok(())
    }

    pub fn toggle_auto_advance(&mut self) {
        self.state.auto_advance = !self.state.auto_advance;
        debug!(enabled = self.state.auto_advance, "auto-advance toggled");
        self.presenter.on_auto_advance_changed(self.state.auto_advance);
    }

    /// Dispatches a scheduler firing. Firings for tasks that were cancelled
    /// or replaced are dropped.
    pub fn fire(&mut self, firing: Firing) {
        match firing {
            Firing::Tick(id) if self.tick_task == Some(id) => self.tick(),
            Firing::Deferred(id) => match self.pending {
                Some((live, task)) if live == id => {
                    self.pending = None;
                    self.run_deferred(task);
                }
                _ => trace!(task = id.raw(), "stale deferred firing dropped"),
            },
            Firing::Tick(id) => trace!(task = id.raw(), "stale tick dropped"),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reload_current(&mut self) {
        let phase = self.state.current_phase;
        let total = self.phases.duration_seconds(phase);
        self.state.remaining_seconds = total;
        self.state.total_seconds = total;
        self.presenter.on_tick(total, total, phase);
    }

    fn schedule(&mut self, task: Deferred, delay: Duration) {
        if delay.is_zero() {
            self.run_deferred(task);
            return;
        }
        let id = self.scheduler.defer(delay);
        self.pending = Some((id, task));
    }

    fn run_deferred(&mut self, task: Deferred) {
        match task {
            Deferred::SwitchPhase(phase) => {
                self.switch_phase(phase);
                if phase.is_break() && self.state.auto_advance {
                    self.schedule(Deferred::AutoStart, self.auto_start_delay);
                }
            }
            Deferred::AutoStart => self.start(),
        }
    }

    fn cancel_pending(&mut self) {
        if let Some((id, task)) = self.pending.take() {
            debug!(?task, "pending transition cancelled");
            self.scheduler.cancel(id);
        }
    }
}

/// The break that follows the `completed`-th work session.
pub fn next_break(completed: u32, sessions_before_long_break: u32) -> PhaseKind {
    if sessions_before_long_break > 0 && completed % sessions_before_long_break == 0 {
        PhaseKind::LongBreak
    } else {
        PhaseKind::ShortBreak
    }
}

pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
