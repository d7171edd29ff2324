use crate::shared::clock::{Clock, ManualClock, SystemClock};

#[test]
fn manual_clock_starts_where_told() {
    let clock = ManualClock::new(1_000);
    assert_eq!(clock.now_millis(), 1_000);
}

#[test]
fn manual_clock_advances_and_sets() {
    let clock = ManualClock::new(0);
    clock.advance(250);
    assert_eq!(clock.now_millis(), 250);
    clock.set(10_000);
    assert_eq!(clock.now_millis(), 10_000);
    clock.advance(1);
    assert_eq!(clock.now_millis(), 10_001);
}

#[test]
fn system_clock_is_monotonic_enough() {
    let clock = SystemClock;
    let a = clock.now_millis();
    let b = clock.now_millis();
    assert!(b >= a);
    // Sanity: later than 2020-01-01.
    assert!(a > 1_577_836_800_000);
}
