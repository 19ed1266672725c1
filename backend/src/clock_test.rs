use super::*;

// 2024-03-05T07:08:09.123Z
const SAMPLE_MS: i64 = 1_709_622_489_123;

#[test]
fn today_utc_formats_calendar_date() {
    assert_eq!(today_utc(SAMPLE_MS), "2024-03-05");
}

#[test]
fn iso_utc_uses_millis_and_z_suffix() {
    assert_eq!(iso_utc(SAMPLE_MS), "2024-03-05T07:08:09.123Z");
}

#[test]
fn epoch_formats_cleanly() {
    assert_eq!(today_utc(0), "1970-01-01");
    assert_eq!(iso_utc(0), "1970-01-01T00:00:00.000Z");
}

#[test]
fn now_ms_is_after_2020() {
    assert!(now_ms() > 1_577_836_800_000);
}
