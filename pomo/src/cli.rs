use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pomo")]
#[command(about = "A Pomodoro timer for the terminal", long_about = None)]
pub struct Cli {
    /// Focus session length in minutes
    #[arg(short, long, value_name = "MINUTES")]
    pub work: Option<u32>,
    /// Short break length in minutes
    #[arg(long, value_name = "MINUTES")]
    pub short_break: Option<u32>,
    /// Long break length in minutes
    #[arg(long, value_name = "MINUTES")]
    pub long_break: Option<u32>,
    /// Focus sessions before a long break
    #[arg(short, long, value_name = "COUNT")]
    pub sessions: Option<u32>,
    /// Focus sessions to aim for
    #[arg(short, long, value_name = "COUNT")]
    pub target: Option<u32>,
    /// Start breaks automatically
    #[arg(short, long)]
    pub auto: bool,
    /// Config file (defaults to pomo.toml in the config directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Log file (defaults to pomo.log in the data directory)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,
    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Flags win over the config file. Values are checked later, together
    /// with the rest of the timer settings.
    pub fn apply(&self, config: &mut Config) {
        let timer = &mut config.timer;
        if let Some(minutes) = self.work {
            timer.work_minutes = minutes;
        }
        if let Some(minutes) = self.short_break {
            timer.short_break_minutes = minutes;
        }
        if let Some(minutes) = self.long_break {
            timer.long_break_minutes = minutes;
        }
        if let Some(sessions) = self.sessions {
            timer.sessions_before_long_break = sessions;
        }
        if let Some(target) = self.target {
            timer.focus_target = target;
        }
        if self.auto {
            timer.auto_advance = true;
        }
        if self.no_notify {
            config.alerts.desktop = false;
        }
    }
}
