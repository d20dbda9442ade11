use super::*;

#[test]
fn format_iso_has_millisecond_precision_and_z_suffix() {
    let at = OffsetDateTime::from_unix_timestamp_nanos(1_705_311_000_123_456_789).unwrap();
    assert_eq!(format_iso(at), "2024-01-15T09:30:00.123Z");
}

#[test]
fn now_iso_parses_shape() {
    let s = now_iso();
    assert_eq!(s.len(), 24);
    assert!(s.ends_with('Z'));
    assert_eq!(&s[10..11], "T");
}

#[test]
fn next_after_uses_wall_clock_when_ahead() {
    let clock = IdClock::new();
    assert_eq!(clock.next_after(1_000), 1_000);
    assert_eq!(clock.next_after(2_000), 2_000);
}

#[test]
fn next_after_bumps_on_repeat() {
    let clock = IdClock::new();
    assert_eq!(clock.next_after(5_000), 5_000);
    assert_eq!(clock.next_after(5_000), 5_001);
    assert_eq!(clock.next_after(5_000), 5_002);
}

#[test]
fn next_after_never_goes_backwards() {
    let clock = IdClock::new();
    assert_eq!(clock.next_after(9_000), 9_000);
    assert_eq!(clock.next_after(8_000), 9_001);
}

#[test]
fn clones_share_the_sequence() {
    let a = IdClock::new();
    let b = a.clone();
    assert_eq!(a.next_after(100), 100);
    assert_eq!(b.next_after(100), 101);
}

#[test]
fn next_millis_is_strictly_increasing() {
    let clock = IdClock::new();
    let ids: Vec<i64> = (0..100).map(|_| clock.next_millis()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}
