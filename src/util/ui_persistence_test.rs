use backend::schema::MediaType;

use super::*;
use crate::services::prompts::TimeFilter;
use crate::state::browse::ExploreFilters;

#[test]
fn saved_filters_decode() {
    let filters: Option<ExploreFilters> = decode_json(r#"{"search":"neon","media_type":"video"}"#);
    let filters = filters.expect("filters");
    assert_eq!(filters.search, "neon");
    assert_eq!(filters.media_type, Some(MediaType::Video));
    assert_eq!(filters.category, None);
}

#[test]
fn unreadable_values_are_absent() {
    assert_eq!(decode_json::<ExploreFilters>("not json"), None);
    assert_eq!(decode_json::<ExploreFilters>(r#"{"media_type":"hologram"}"#), None);
    assert_eq!(decode_json::<String>("7"), None);
}

#[test]
fn content_time_filter_is_stored_as_its_key() {
    let raw = serde_json::to_string(TimeFilter::Week.as_str()).expect("encode");
    let restored = decode_json::<String>(&raw).as_deref().and_then(TimeFilter::parse);
    assert_eq!(restored, Some(TimeFilter::Week));
}
