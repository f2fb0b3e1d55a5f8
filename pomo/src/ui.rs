use crate::app::{App, AppMode, SettingField, SettingsView};
use pomo_core::format_clock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, Paragraph},
    Frame,
};
use std::time::Duration;
use tachyonfx::Duration as TachyonDuration;

pub fn draw(f: &mut Frame, app: &mut App, settings: &SettingsView, delta: Duration) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(9),
            Constraint::Length(3),
        ])
        .split(area);

    draw_header(f, chunks[0], app);
    app.card_area = chunks[1];
    draw_timer_card(f, chunks[1], app);
    draw_status_bar(f, chunks[2], app);

    let delta = TachyonDuration::from_millis(delta.as_millis().min(u128::from(u32::MAX)) as u32);
    app.effect_manager
        .process_effects(delta, f.buffer_mut(), chunks[1]);

    match app.mode {
        AppMode::Settings(selected) => draw_settings_overlay(f, app, settings, selected),
        AppMode::Editing(field) => {
            let selected = SettingField::ALL
                .iter()
                .position(|candidate| *candidate == field)
                .unwrap_or(0);
            draw_settings_overlay(f, app, settings, selected);
            draw_input_overlay(f, field.title(), &app.input_buffer, app);
        }
        AppMode::Normal => {}
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let text = Line::from(vec![
        Span::raw(icons.header_left.clone()),
        Span::styled(
            "POMO",
            Style::default()
                .fg(theme.phase_color(app.phase))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(icons.header_right.clone()),
    ]);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.surface)),
        ),
        area,
    );
}

fn draw_timer_card(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let phase_color = theme.phase_color(app.phase);
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", app.label),
            Style::default().fg(phase_color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(phase_color));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    f.render_widget(
        Paragraph::new(format_clock(app.remaining_seconds))
            .style(
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
        v_chunks[0],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(phase_color).bg(theme.surface))
            .percent((app.progress() * 100.0).round().clamp(0.0, 100.0) as u16),
        v_chunks[1],
    );

    f.render_widget(
        Paragraph::new(session_dots(app))
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.accent)),
        v_chunks[3],
    );

    let (run_icon, run_text) = if app.is_running {
        (&icons.pause, "Pause")
    } else {
        (&icons.play, "Start")
    };
    let auto_style = if app.auto_advance {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted)
    };
    let controls = Line::from(vec![
        Span::styled(
            format!("{} {}", run_icon, run_text),
            Style::default().fg(theme.foreground),
        ),
        Span::styled(
            format!(" {} ", icons.separator),
            Style::default().fg(theme.muted),
        ),
        Span::styled(
            if app.auto_advance { "Auto: ON" } else { "Auto: OFF" },
            auto_style,
        ),
    ]);
    f.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center),
        v_chunks[4],
    );
}

/// Targets above this only show the `completed/target` count.
const MAX_SESSION_DOTS: u32 = 12;

/// `●●○○ 2/4`; the dots stop at the target, the count keeps going.
fn session_dots(app: &App) -> String {
    let count = format!("{}/{}", app.completed, app.target);
    if app.target > MAX_SESSION_DOTS {
        return count;
    }
    let icons = &app.config.icons;
    let done = app.completed.min(app.target) as usize;
    let pending = app.target.saturating_sub(app.completed) as usize;
    format!(
        "{}{} {}",
        icons.session_done.repeat(done),
        icons.session_pending.repeat(pending),
        count
    )
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let (mode_text, mode_color) = match app.mode {
        AppMode::Normal => ("TIMER", theme.phase_color(app.phase)),
        AppMode::Settings(_) => ("SETTINGS", theme.accent),
        AppMode::Editing(_) => ("EDIT", theme.accent),
    };
    let help = match app.mode {
        AppMode::Normal => "space:start/pause │ r:reset │ e:end │ a:auto │ s:settings │ q:quit",
        AppMode::Settings(_) => "↑↓:select │ enter:edit │ s/esc:close │ space:start/pause",
        AppMode::Editing(_) => "enter:confirm │ esc:cancel",
    };
    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode_text),
            Style::default()
                .bg(mode_color)
                .fg(theme.background)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];
    match &app.status {
        Some(message) => spans.push(Span::styled(
            message.clone(),
            Style::default().fg(theme.error),
        )),
        None => spans.push(Span::raw(help)),
    }
    f.render_widget(
        Paragraph::new(Line::from(spans))
            .block(Block::default().style(Style::default().bg(theme.surface).fg(theme.muted))),
        area,
    );
}

fn draw_settings_overlay(f: &mut Frame, app: &App, settings: &SettingsView, selected: usize) {
    let theme = &app.config.theme;
    let area = centered_rect(60, 50, f.area());
    f.render_widget(Clear, area);
    let items: Vec<ListItem> = SettingField::ALL
        .iter()
        .zip(settings.values.iter())
        .enumerate()
        .map(|(i, (field, value))| {
            let marker = if i == selected {
                Span::styled(
                    format!("{} ", app.config.icons.select),
                    Style::default().fg(theme.accent),
                )
            } else {
                Span::raw("  ")
            };
            ListItem::new(Line::from(vec![
                marker,
                Span::styled(field.title(), Style::default().fg(theme.foreground)),
                Span::styled(format!("  {}", value), Style::default().fg(theme.muted)),
            ]))
        })
        .collect();
    f.render_widget(
        List::new(items).block(
            Block::default()
                .title(" Settings ")
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(theme.accent))
                .style(Style::default().bg(theme.background)),
        ),
        area,
    );
}

fn draw_input_overlay(f: &mut Frame, title: &str, input: &str, app: &App) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.config.theme.accent))
        .border_type(BorderType::Double)
        .style(Style::default().bg(app.config.theme.background));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(app.config.theme.foreground)),
            Span::styled(input, Style::default().fg(app.config.theme.foreground)),
            Span::styled(
                &app.config.icons.input_cursor,
                Style::default()
                    .fg(app.config.theme.foreground)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ])),
        inner_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
