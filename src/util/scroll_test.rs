use super::*;

#[test]
fn triggers_within_threshold() {
    assert!(near_bottom(1300.0, 900.0, 3000.0));
    assert!(near_bottom(2100.0, 900.0, 3000.0));
}

#[test]
fn stays_quiet_far_from_bottom() {
    assert!(!near_bottom(0.0, 900.0, 3000.0));
    assert!(!near_bottom(1299.0, 900.0, 3000.0));
}

#[test]
fn short_pages_are_always_near_bottom() {
    assert!(near_bottom(0.0, 900.0, 500.0));
}
