use crate::config::Config;
use crossterm::event::{KeyCode, KeyEvent};
use pomo_core::{parse_positive, PhaseKind, Presenter, Scheduler, SessionController};
use ratatui::layout::Rect;
use std::io::{self, Write};
use tachyonfx::{fx, EffectManager, Motion};
use tracing::warn;

pub type Controller<S> = SessionController<App, S>;

/// View state of the terminal front-end. Mirrors what the session
/// controller reports and owns everything that only matters on screen.
pub struct App {
    pub config: Config,
    pub mode: AppMode,
    pub input_buffer: String,
    pub status: Option<String>,
    pub should_quit: bool,
    pub phase: PhaseKind,
    pub label: String,
    pub remaining_seconds: u32,
    pub total_seconds: u32,
    pub is_running: bool,
    pub completed: u32,
    pub target: u32,
    pub auto_advance: bool,
    /// Where the timer card was last drawn; effects are anchored to it.
    pub card_area: Rect,
    pub effect_manager: EffectManager<u32>,
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppMode {
    #[default]
    Normal,
    Settings(usize),
    Editing(SettingField),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SettingField {
    WorkMinutes,
    ShortBreakMinutes,
    LongBreakMinutes,
    SessionsBeforeLongBreak,
    FocusTarget,
}

impl SettingField {
    pub const ALL: [SettingField; 5] = [
        SettingField::WorkMinutes,
        SettingField::ShortBreakMinutes,
        SettingField::LongBreakMinutes,
        SettingField::SessionsBeforeLongBreak,
        SettingField::FocusTarget,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SettingField::WorkMinutes => "Focus (minutes)",
            SettingField::ShortBreakMinutes => "Short break (minutes)",
            SettingField::LongBreakMinutes => "Long break (minutes)",
            SettingField::SessionsBeforeLongBreak => "Sessions before long break",
            SettingField::FocusTarget => "Daily focus target",
        }
    }

    fn field_name(&self) -> &'static str {
        match self {
            SettingField::WorkMinutes => "work duration",
            SettingField::ShortBreakMinutes => "short break duration",
            SettingField::LongBreakMinutes => "long break duration",
            SettingField::SessionsBeforeLongBreak => "sessions before long break",
            SettingField::FocusTarget => "focus target",
        }
    }

    pub fn current<S: Scheduler>(&self, controller: &Controller<S>) -> u32 {
        let phases = controller.phase_config();
        let state = controller.state();
        match self {
            SettingField::WorkMinutes => phases.minutes(PhaseKind::Work),
            SettingField::ShortBreakMinutes => phases.minutes(PhaseKind::ShortBreak),
            SettingField::LongBreakMinutes => phases.minutes(PhaseKind::LongBreak),
            SettingField::SessionsBeforeLongBreak => state.sessions_before_long_break,
            SettingField::FocusTarget => state.focus_target,
        }
    }
}

/// Snapshot of the settings panel values, taken before each draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsView {
    pub values: [u32; 5],
}

impl SettingsView {
    pub fn capture<S: Scheduler>(controller: &Controller<S>) -> Self {
        Self {
            values: SettingField::ALL.map(|field| field.current(controller)),
        }
    }
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            status: None,
            should_quit: false,
            phase: PhaseKind::Work,
            label: PhaseKind::Work.default_label().to_string(),
            remaining_seconds: 0,
            total_seconds: 0,
            is_running: false,
            completed: 0,
            target: 0,
            auto_advance: false,
            card_area: Rect::default(),
            effect_manager: EffectManager::default(),
        }
    }

    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        f64::from(self.total_seconds - self.remaining_seconds) / f64::from(self.total_seconds)
    }

    fn ring_bell(&self) {
        if !self.config.alerts.bell {
            return;
        }
        let mut stdout = io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
            warn!("Failed to ring terminal bell: {}", e);
        }
    }

    fn send_notification(&self, title: &str, body: &str) {
        if !self.config.alerts.desktop {
            return;
        }
        if let Err(e) = notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .appname("pomo")
            .show()
        {
            warn!("Failed to send notification: {}", e);
        }
    }

    pub fn trigger_phase_change_effect(&mut self) {
        let effect = fx::slide_in(
            Motion::LeftToRight,
            8,
            4,
            self.config.theme.background,
            300,
        )
        .with_area(self.card_area);
        self.effect_manager.add_effect(effect);
    }

    pub fn trigger_celebration(&mut self) {
        let color = self.config.theme.accent;
        self.effect_manager
            .add_effect(fx::fade_to_fg(color, 600).with_area(self.card_area));
    }
}

impl Presenter for App {
    fn on_tick(&mut self, remaining_seconds: u32, total_seconds: u32, phase: PhaseKind) {
        self.remaining_seconds = remaining_seconds;
        self.total_seconds = total_seconds;
        self.phase = phase;
    }

    fn on_phase_changed(&mut self, phase: PhaseKind, label: &str) {
        self.phase = phase;
        self.label = label.to_string();
        self.trigger_phase_change_effect();
    }

    fn on_phase_complete(&mut self, phase: PhaseKind) {
        self.ring_bell();
        self.send_notification("Pomodoro Timer", phase.completion_message());
        if phase == PhaseKind::Work {
            self.trigger_celebration();
        }
    }

    fn on_run_state_changed(&mut self, is_running: bool) {
        self.is_running = is_running;
    }

    fn on_counter_changed(&mut self, completed: u32, target: u32) {
        self.completed = completed;
        self.target = target;
    }

    fn on_auto_advance_changed(&mut self, enabled: bool) {
        self.auto_advance = enabled;
    }
}

/// Routes a key press to the controller or to view state, depending on mode.
pub fn handle_key<S: Scheduler>(controller: &mut Controller<S>, key: KeyEvent) {
    let mode = controller.presenter().mode;
    match mode {
        AppMode::Normal => match key.code {
            KeyCode::Char('s') => open_settings(controller),
            _ => handle_command(controller, key.code),
        },
        AppMode::Settings(selected) => match key.code {
            KeyCode::Esc | KeyCode::Char('s') => controller.presenter_mut().mode = AppMode::Normal,
            KeyCode::Up | KeyCode::Char('k') => {
                controller.presenter_mut().mode = AppMode::Settings(selected.saturating_sub(1));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = SettingField::ALL.len() - 1;
                controller.presenter_mut().mode = AppMode::Settings((selected + 1).min(last));
            }
            KeyCode::Enter => {
                let field = SettingField::ALL[selected.min(SettingField::ALL.len() - 1)];
                let current = field.current(controller);
                let app = controller.presenter_mut();
                app.input_buffer = current.to_string();
                app.mode = AppMode::Editing(field);
            }
            code => handle_command(controller, code),
        },
        AppMode::Editing(field) => match key.code {
            KeyCode::Esc => close_editor(controller, field),
            KeyCode::Enter => {
                let input = std::mem::take(&mut controller.presenter_mut().input_buffer);
                commit_setting(controller, field, &input);
                close_editor(controller, field);
            }
            KeyCode::Backspace => {
                controller.presenter_mut().input_buffer.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                controller.presenter_mut().input_buffer.push(c);
            }
            _ => {}
        },
    }
}

fn handle_command<S: Scheduler>(controller: &mut Controller<S>, code: KeyCode) {
    match code {
        KeyCode::Char('q') => controller.presenter_mut().should_quit = true,
        KeyCode::Char(' ') => controller.toggle_running(),
        KeyCode::Char('r') => controller.reset(),
        KeyCode::Char('e') => controller.end_early(),
        KeyCode::Char('a') => controller.toggle_auto_advance(),
        _ => {}
    }
}

fn open_settings<S: Scheduler>(controller: &mut Controller<S>) {
    let app = controller.presenter_mut();
    app.mode = AppMode::Settings(0);
    app.status = None;
}

fn close_editor<S: Scheduler>(controller: &mut Controller<S>, field: SettingField) {
    let index = SettingField::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or(0);
    let app = controller.presenter_mut();
    app.input_buffer.clear();
    app.mode = AppMode::Settings(index);
}

/// Applies an edited settings field. A rejected value leaves the setting
/// untouched and is reported in the status line.
pub fn commit_setting<S: Scheduler>(controller: &mut Controller<S>, field: SettingField, input: &str) {
    let result = parse_positive(field.field_name(), input).and_then(|value| match field {
        SettingField::WorkMinutes => controller.set_phase_duration(PhaseKind::Work, value),
        SettingField::ShortBreakMinutes => controller.set_phase_duration(PhaseKind::ShortBreak, value),
        SettingField::LongBreakMinutes => controller.set_phase_duration(PhaseKind::LongBreak, value),
        SettingField::SessionsBeforeLongBreak => controller.set_sessions_before_long_break(value),
        SettingField::FocusTarget => controller.set_focus_target(value),
    });
    controller.presenter_mut().status = result.err().map(|e| e.to_string());
}
