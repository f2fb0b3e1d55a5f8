//! Session core for the pomo timer.
//!
//! Holds the Pomodoro state machine and nothing else: no terminal, no
//! clock, no I/O. Rendering goes through [`Presenter`], timing through
//! [`Scheduler`], so the whole cycle can be driven and inspected in tests.

pub mod config;
pub mod error;
pub mod phase;
pub mod presenter;
pub mod scheduler;
pub mod session;

pub use config::{parse_positive, PhaseConfig, PhaseSettings, SessionConfig, TimerSettings};
pub use error::ConfigError;
pub use phase::PhaseKind;
pub use presenter::Presenter;
pub use scheduler::{Firing, ManualScheduler, Scheduler, TaskId};
pub use session::{format_clock, next_break, Deferred, SessionController, SessionState, TICK_PERIOD};
