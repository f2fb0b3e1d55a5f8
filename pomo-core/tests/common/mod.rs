#![allow(dead_code)]

use pomo_core::{ManualScheduler, PhaseKind, Presenter, SessionConfig, SessionController, TimerSettings};

#[derive(Debug, Clone, PartialEq)]
pub enum Note {
    Tick(u32, u32, PhaseKind),
    PhaseChanged(PhaseKind, String),
    PhaseComplete(PhaseKind),
    RunState(bool),
    Counter(u32, u32),
    AutoAdvance(bool),
}

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub notes: Vec<Note>,
}

impl RecordingPresenter {
    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn completed_phases(&self) -> Vec<PhaseKind> {
        self.notes
            .iter()
            .filter_map(|n| match n {
                Note::PhaseComplete(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn on_tick(&mut self, remaining: u32, total: u32, phase: PhaseKind) {
        self.notes.push(Note::Tick(remaining, total, phase));
    }

    fn on_phase_changed(&mut self, phase: PhaseKind, label: &str) {
        self.notes.push(Note::PhaseChanged(phase, label.to_string()));
    }

    fn on_phase_complete(&mut self, phase: PhaseKind) {
        self.notes.push(Note::PhaseComplete(phase));
    }

    fn on_run_state_changed(&mut self, is_running: bool) {
        self.notes.push(Note::RunState(is_running));
    }

    fn on_counter_changed(&mut self, completed: u32, target: u32) {
        self.notes.push(Note::Counter(completed, target));
    }

    fn on_auto_advance_changed(&mut self, enabled: bool) {
        self.notes.push(Note::AutoAdvance(enabled));
    }
}

pub type Controller = SessionController<RecordingPresenter, ManualScheduler>;

pub fn controller() -> Controller {
    with_config(SessionConfig::default())
}

/// One-minute phases so a whole cycle runs in a few hundred ticks.
pub fn quick_controller() -> Controller {
    let config = TimerSettings {
        work_minutes: 1,
        short_break_minutes: 1,
        long_break_minutes: 1,
        ..TimerSettings::default()
    }
    .validate()
    .unwrap();
    with_config(config)
}

pub fn with_config(config: SessionConfig) -> Controller {
    SessionController::new(config, RecordingPresenter::default(), ManualScheduler::new())
}

/// Starts the current phase and ticks until it completes on its own.
pub fn run_out(c: &mut Controller) {
    c.start();
    assert!(c.state().is_running, "phase did not start");
    while c.state().is_running {
        c.tick();
    }
}

/// Lets the pending deferred task fire.
pub fn settle(c: &mut Controller) {
    let firing = c
        .scheduler_mut()
        .take_deferred()
        .expect("a deferred task should be pending");
    c.fire(firing);
}
