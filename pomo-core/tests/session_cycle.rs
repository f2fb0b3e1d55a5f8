mod common;

use common::{controller, quick_controller, run_out, settle, with_config, Note};
use pomo_core::{Deferred, Firing, PhaseKind, SessionConfig};
use std::time::Duration;

#[test]
fn four_work_sessions_end_with_a_long_break() {
    let mut c = quick_controller();
    let mut breaks = Vec::new();

    for _ in 0..4 {
        assert_eq!(c.state().current_phase, PhaseKind::Work);
        run_out(&mut c);
        settle(&mut c);
        breaks.push(c.state().current_phase);

        run_out(&mut c);
        settle(&mut c);
    }

    assert_eq!(
        breaks,
        vec![
            PhaseKind::ShortBreak,
            PhaseKind::ShortBreak,
            PhaseKind::ShortBreak,
            PhaseKind::LongBreak
        ]
    );
    assert_eq!(c.state().completed_work_sessions, 4);
    assert_eq!(c.state().current_phase, PhaseKind::Work);
}

#[test]
fn tick_while_paused_changes_nothing() {
    let mut c = controller();
    let before = c.state().clone();
    c.tick();
    assert_eq!(c.state(), &before);
    assert!(c.presenter().notes.is_empty());
}

#[test]
fn end_early_counts_the_work_session() {
    let mut c = controller();
    c.start();
    for _ in 0..1200 {
        c.tick();
    }
    assert_eq!(c.state().remaining_seconds, 300);

    c.end_early();
    assert!(!c.state().is_running);
    assert_eq!(c.state().completed_work_sessions, 1);
    assert_eq!(
        c.pending_transition(),
        Some(Deferred::SwitchPhase(PhaseKind::ShortBreak))
    );

    settle(&mut c);
    assert_eq!(c.state().current_phase, PhaseKind::ShortBreak);
    assert_eq!(c.state().remaining_seconds, 300);
}

#[test]
fn end_early_is_ignored_while_switch_is_pending() {
    let mut c = controller();
    c.end_early();
    c.end_early();
    assert_eq!(c.state().completed_work_sessions, 1);
    assert_eq!(c.scheduler().live_deferred(), 1);
}

#[test]
fn auto_advance_starts_the_break() {
    let mut c = quick_controller();
    c.toggle_auto_advance();
    run_out(&mut c);

    settle(&mut c);
    assert_eq!(c.state().current_phase, PhaseKind::ShortBreak);
    assert_eq!(c.pending_transition(), Some(Deferred::AutoStart));
    assert_eq!(c.scheduler().pending_delay(), Some(Duration::from_millis(500)));
    assert!(!c.state().is_running);

    settle(&mut c);
    assert!(c.state().is_running);
    assert_eq!(c.scheduler().live_ticks(), 1);
}

#[test]
fn without_auto_advance_the_break_waits() {
    let mut c = quick_controller();
    run_out(&mut c);
    settle(&mut c);
    assert_eq!(c.state().current_phase, PhaseKind::ShortBreak);
    assert!(!c.state().is_running);
    assert!(!c.has_pending_transition());
}

#[test]
fn auto_advance_is_read_when_the_switch_happens() {
    let mut c = quick_controller();
    run_out(&mut c);
    // Toggled during the settle window.
    c.toggle_auto_advance();
    settle(&mut c);
    assert_eq!(c.pending_transition(), Some(Deferred::AutoStart));
}

#[test]
fn breaks_always_return_to_idle_work() {
    for auto in [false, true] {
        let mut c = quick_controller();
        if auto {
            c.toggle_auto_advance();
        }
        c.switch_phase(PhaseKind::LongBreak);
        run_out(&mut c);
        assert_eq!(c.state().completed_work_sessions, 0);
        settle(&mut c);

        assert_eq!(c.state().current_phase, PhaseKind::Work);
        assert!(!c.state().is_running);
        assert!(!c.has_pending_transition());
    }
}

#[test]
fn duration_change_applies_to_idle_current_phase() {
    let mut c = controller();
    c.set_phase_duration(PhaseKind::Work, 50).unwrap();
    assert_eq!(c.state().remaining_seconds, 3000);
    assert_eq!(c.state().total_seconds, 3000);
}

#[test]
fn duration_change_leaves_running_phase_alone() {
    let mut c = controller();
    c.start();
    c.tick();
    c.set_phase_duration(PhaseKind::Work, 50).unwrap();
    assert_eq!(c.state().remaining_seconds, 1499);
    assert_eq!(c.state().total_seconds, 1500);

    c.reset();
    assert_eq!(c.state().remaining_seconds, 3000);
    assert_eq!(c.state().total_seconds, 3000);
}

#[test]
fn duration_change_for_other_phase_waits_for_switch() {
    let mut c = controller();
    c.set_phase_duration(PhaseKind::ShortBreak, 10).unwrap();
    assert_eq!(c.state().total_seconds, 1500);

    c.end_early();
    settle(&mut c);
    assert_eq!(c.state().current_phase, PhaseKind::ShortBreak);
    assert_eq!(c.state().total_seconds, 600);
}

#[test]
fn duration_change_during_settle_keeps_the_switch() {
    let mut c = controller();
    c.end_early();
    c.set_phase_duration(PhaseKind::Work, 30).unwrap();
    assert_eq!(c.state().total_seconds, 1800);
    assert!(c.has_pending_transition());
    settle(&mut c);
    assert_eq!(c.state().current_phase, PhaseKind::ShortBreak);
}

#[test]
fn reset_keeps_phase_counter_and_auto_advance() {
    let mut c = quick_controller();
    c.toggle_auto_advance();
    run_out(&mut c);
    settle(&mut c);
    settle(&mut c);
    assert!(c.state().is_running);
    c.tick();

    c.reset();
    let s = c.state();
    assert_eq!(s.current_phase, PhaseKind::ShortBreak);
    assert_eq!(s.completed_work_sessions, 1);
    assert!(s.auto_advance);
    assert!(!s.is_running);
    assert_eq!(s.remaining_seconds, 60);
}

#[test]
fn pause_then_start_loses_no_time() {
    let mut c = controller();
    c.start();
    for _ in 0..42 {
        c.tick();
    }
    c.pause();
    let at_pause = c.state().remaining_seconds;
    c.tick();
    c.start();
    assert_eq!(c.state().remaining_seconds, at_pause);
    c.tick();
    assert_eq!(c.state().remaining_seconds, at_pause - 1);
}

#[test]
fn toggle_running_flips_between_start_and_pause() {
    let mut c = controller();
    c.toggle_running();
    assert!(c.state().is_running);
    c.toggle_running();
    assert!(!c.state().is_running);
    assert_eq!(
        c.presenter().notes,
        vec![Note::RunState(true), Note::RunState(false)]
    );
}

#[test]
fn start_after_completion_skips_the_settle_wait() {
    let mut c = quick_controller();
    run_out(&mut c);
    assert_eq!(c.state().remaining_seconds, 0);
    c.start();
    assert_eq!(c.state().current_phase, PhaseKind::ShortBreak);
    assert_eq!(c.state().remaining_seconds, 60);
    assert!(!c.state().is_running);
    assert!(!c.has_pending_transition());
    assert_eq!(c.scheduler().live_deferred(), 0);
}

#[test]
fn start_during_settle_never_resumes_the_counted_session() {
    let mut c = controller();
    c.start();
    for _ in 0..1200 {
        c.tick();
    }
    c.end_early();
    assert_eq!(c.state().completed_work_sessions, 1);
    let stale = c.scheduler().pending_deferred().unwrap();

    c.start();
    assert_eq!(c.state().current_phase, PhaseKind::ShortBreak);
    assert!(!c.state().is_running);
    assert!(c.scheduler().cancelled().contains(&stale.task()));

    // Ticking what used to be the work phase must not count it again.
    for _ in 0..400 {
        c.tick();
    }
    c.fire(stale);
    assert_eq!(c.state().current_phase, PhaseKind::ShortBreak);
    assert_eq!(c.state().completed_work_sessions, 1);

    run_out(&mut c);
    settle(&mut c);
    assert_eq!(c.state().current_phase, PhaseKind::Work);
    assert_eq!(c.state().completed_work_sessions, 1);
}

#[test]
fn start_during_settle_with_auto_advance_starts_the_break() {
    let mut c = controller();
    c.toggle_auto_advance();
    c.end_early();

    c.start();
    assert_eq!(c.state().current_phase, PhaseKind::ShortBreak);
    assert_eq!(c.pending_transition(), Some(Deferred::AutoStart));
    settle(&mut c);
    assert!(c.state().is_running);
    assert_eq!(c.scheduler().live_ticks(), 1);
    assert_eq!(c.state().completed_work_sessions, 1);
}

#[test]
fn reset_during_settle_cancels_the_switch() {
    let mut c = controller();
    c.end_early();
    let stale = c.scheduler().pending_deferred().unwrap();

    c.reset();
    assert!(!c.has_pending_transition());
    assert_eq!(c.scheduler().cancelled(), &[stale.task()]);

    // A firing that raced with the cancellation must not switch phases.
    c.fire(stale);
    assert_eq!(c.state().current_phase, PhaseKind::Work);
    assert_eq!(c.state().remaining_seconds, 1500);
}

#[test]
fn start_during_auto_start_wait_replaces_it() {
    let mut c = quick_controller();
    c.toggle_auto_advance();
    run_out(&mut c);
    settle(&mut c);
    let auto_start = c.scheduler().pending_deferred().unwrap();

    c.start();
    assert!(c.state().is_running);
    assert!(!c.has_pending_transition());
    c.fire(auto_start);
    assert_eq!(c.scheduler().live_ticks(), 1);
}

#[test]
fn every_stop_path_releases_the_tick() {
    let stops: [fn(&mut common::Controller); 4] = [
        |c| c.pause(),
        |c| c.reset(),
        |c| c.end_early(),
        |c| c.complete_phase(),
    ];
    for stop in stops {
        let mut c = controller();
        c.start();
        let tick = c.scheduler().active_tick().unwrap();
        stop(&mut c);
        assert!(!c.state().is_running);
        assert_eq!(c.scheduler().live_ticks(), 0);

        let before = c.state().remaining_seconds;
        c.fire(tick);
        assert_eq!(c.state().remaining_seconds, before);
    }
}

#[test]
fn natural_completion_orders_notifications() {
    let mut c = quick_controller();
    c.start();
    for _ in 0..59 {
        c.tick();
    }
    c.presenter_mut().clear();
    c.tick();
    assert_eq!(
        c.presenter().notes,
        vec![
            Note::Tick(0, 60, PhaseKind::Work),
            Note::RunState(false),
            Note::PhaseComplete(PhaseKind::Work),
            Note::Counter(1, 4),
        ]
    );

    c.presenter_mut().clear();
    settle(&mut c);
    assert_eq!(
        c.presenter().notes,
        vec![
            Note::Tick(60, 60, PhaseKind::ShortBreak),
            Note::PhaseChanged(PhaseKind::ShortBreak, "Short Break".to_string()),
        ]
    );
}

#[test]
fn scheduled_ticks_drive_the_countdown() {
    let mut c = controller();
    c.start();
    let tick = c.scheduler().active_tick().unwrap();
    assert!(matches!(tick, Firing::Tick(_)));
    c.fire(tick);
    c.fire(tick);
    assert_eq!(c.state().remaining_seconds, 1498);
}

#[test]
fn zero_settle_delay_switches_immediately() {
    let config = SessionConfig {
        settle_delay: Duration::ZERO,
        auto_start_delay: Duration::ZERO,
        auto_advance: true,
        ..SessionConfig::default()
    };
    let mut c = with_config(config);
    c.end_early();
    assert_eq!(c.state().current_phase, PhaseKind::ShortBreak);
    assert!(c.state().is_running);
    assert_eq!(c.scheduler().live_deferred(), 0);
}

#[test]
fn changed_threshold_applies_to_next_completion() {
    let mut c = quick_controller();
    run_out(&mut c);
    settle(&mut c);
    assert_eq!(c.state().current_phase, PhaseKind::ShortBreak);
    c.switch_phase(PhaseKind::Work);

    c.set_sessions_before_long_break(2).unwrap();
    run_out(&mut c);
    settle(&mut c);
    assert_eq!(c.state().current_phase, PhaseKind::LongBreak);
}

#[test]
fn invalid_settings_keep_previous_values() {
    let mut c = controller();
    assert!(c.set_phase_duration(PhaseKind::Work, 0).is_err());
    assert!(c.set_sessions_before_long_break(0).is_err());
    assert!(c.set_focus_target(0).is_err());

    let s = c.state();
    assert_eq!(s.total_seconds, 1500);
    assert_eq!(s.sessions_before_long_break, 4);
    assert_eq!(s.focus_target, 4);
    assert!(c.presenter().notes.is_empty());
}

#[test]
fn focus_target_updates_the_counter_display() {
    let mut c = controller();
    c.set_focus_target(8).unwrap();
    assert_eq!(c.presenter().notes, vec![Note::Counter(0, 8)]);
}

#[test]
fn announce_pushes_the_full_state() {
    let mut c = controller();
    c.announce();
    assert_eq!(
        c.presenter().notes,
        vec![
            Note::PhaseChanged(PhaseKind::Work, "Focus Time".to_string()),
            Note::Tick(1500, 1500, PhaseKind::Work),
            Note::RunState(false),
            Note::Counter(0, 4),
            Note::AutoAdvance(false),
        ]
    );
}
