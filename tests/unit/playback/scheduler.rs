use super::*;

#[test]
fn play_schedules_exactly_one_tick() {
    let mut s = PlaybackScheduler::new(5, PlaybackSpeed::Normal);
    assert!(!s.is_playing());
    assert!(s.play(100.0));
    assert!(!s.play(200.0));
    assert_eq!(s.pending_ticks(), 1);
    assert_eq!(s.next_deadline(), Some(8_100.0));
    assert!(s.pause());
    assert!(!s.pause());
    assert_eq!(s.pending_ticks(), 0);
}

#[test]
fn empty_sequence_cannot_play() {
    let mut s = PlaybackScheduler::new(0, PlaybackSpeed::Normal);
    assert!(!s.play(0.0));
    assert_eq!(s.resolve_next(), None);
    assert_eq!(s.resolve_last(), None);
    assert!(!s.commit(0));
}

#[test]
fn poll_fires_only_when_due_and_wraps() {
    let mut s = PlaybackScheduler::new(3, PlaybackSpeed::Quadruple);
    s.commit(2);
    s.play(0.0);
    assert_eq!(s.poll(1_999.0), None);
    assert_eq!(s.poll(2_000.0), Some(0));
    assert_eq!(s.next_deadline(), Some(4_000.0));
    assert_eq!(s.poll(2_000.0), None);
}

#[test]
fn late_poll_does_not_burst() {
    let mut s = PlaybackScheduler::new(3, PlaybackSpeed::Quadruple);
    s.play(0.0);
    assert_eq!(s.poll(10_000.0), Some(1));
    assert_eq!(s.next_deadline(), Some(12_000.0));
}

#[test]
fn set_speed_replaces_the_pending_tick() {
    let mut s = PlaybackScheduler::new(4, PlaybackSpeed::Normal);
    s.play(0.0);
    s.set_speed(PlaybackSpeed::Double, 1_000.0);
    assert_eq!(s.pending_ticks(), 1);
    assert_eq!(s.next_deadline(), Some(5_000.0));
    assert_eq!(s.state().frame_interval_ms, 4_000);
    assert_eq!(s.state().speed_multiplier(), 2.0);

    s.pause();
    s.set_speed(PlaybackSpeed::Half, 2_000.0);
    assert_eq!(s.pending_ticks(), 0);
}

#[test]
fn cycle_speed_wraps() {
    let mut s = PlaybackScheduler::new(4, PlaybackSpeed::Quadruple);
    assert_eq!(s.cycle_speed(1, 0.0), PlaybackSpeed::Half);
    assert_eq!(s.cycle_speed(-1, 0.0), PlaybackSpeed::Quadruple);
}

#[test]
fn navigation_clamps_and_guards() {
    let mut s = PlaybackScheduler::new(3, PlaybackSpeed::Normal);
    assert_eq!(s.resolve_prev(), Some(0));
    s.commit(2);
    assert_eq!(s.resolve_next(), Some(2));
    assert_eq!(s.resolve_go_to(3), None);
    assert_eq!(s.resolve_go_to(1), Some(1));
    assert_eq!(s.resolve_first(), Some(0));
    assert_eq!(s.resolve_last(), Some(2));
    assert!(!s.commit(7));
    assert_eq!(s.current(), 2);
}

#[test]
fn toggle_flips_and_reset_stops() {
    let mut s = PlaybackScheduler::new(3, PlaybackSpeed::Normal);
    assert!(s.toggle(0.0));
    assert!(!s.toggle(0.0));
    s.play(0.0);
    s.commit(2);
    s.reset(5);
    assert!(!s.is_playing());
    assert_eq!(s.current(), 0);
    assert_eq!(s.len(), 5);
}
