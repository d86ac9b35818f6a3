use super::*;

#[test]
fn manual_clock_is_shared_and_monotonic() {
    let clock = ManualClock::new(100.0);
    let other = clock.clone();
    clock.advance(50.0);
    assert_eq!(other.now_ms(), 150.0);

    clock.set(20.0);
    assert_eq!(clock.now_ms(), 150.0);

    clock.advance(-10.0);
    assert_eq!(clock.now_ms(), 150.0);
}

#[test]
fn default_manual_clock_starts_at_zero() {
    assert_eq!(ManualClock::default().now_ms(), 0.0);
}

#[test]
fn monotonic_clock_does_not_go_backwards() {
    let clock = MonotonicClock::new();
    let a = clock.now_ms();
    let b = clock.now_ms();
    assert!(b >= a);
}
