use super::*;

#[test]
fn filters_report_when_active() {
    let mut filters = ExploreFilters::default();
    assert!(!filters.is_filtered());
    filters.search = "   ".to_owned();
    assert!(!filters.is_filtered());
    filters.media_type = Some(MediaType::Video);
    assert!(filters.is_filtered());
}

#[test]
fn first_page_replaces_and_later_pages_append() {
    let mut pager = Pager::new(2);
    let first = pager.begin_next().expect("first page");
    assert_eq!(first.page, 0);
    assert!(pager.apply_page(first, vec![1, 2]));

    let second = pager.begin_next().expect("second page");
    assert_eq!(second.page, 1);
    assert!(pager.apply_page(second, vec![3, 4]));
    assert_eq!(pager.items, [1, 2, 3, 4]);
    assert!(pager.has_more);
}

#[test]
fn short_page_ends_the_list() {
    let mut pager = Pager::new(3);
    let ticket = pager.begin_next().expect("page");
    pager.apply_page(ticket, vec![1]);
    assert!(!pager.has_more);
    assert!(pager.begin_next().is_none());
}

#[test]
fn only_one_load_in_flight() {
    let mut pager: Pager<u8> = Pager::new(3);
    assert!(pager.begin_next().is_some());
    assert!(pager.begin_next().is_none());
}

#[test]
fn reset_discards_pages_from_old_filters() {
    let mut pager = Pager::new(2);
    let stale = pager.begin_next().expect("page");
    pager.reset();

    assert!(!pager.apply_page(stale, vec![7, 8]));
    assert!(pager.items.is_empty());

    let fresh = pager.begin_next().expect("fresh page");
    assert!(pager.apply_page(fresh, vec![1]));
    assert_eq!(pager.items, [1]);
}

#[test]
fn failed_load_releases_the_ticket() {
    let mut pager: Pager<u8> = Pager::new(2);
    let ticket = pager.begin_next().expect("page");
    pager.fail(ticket);
    assert_eq!(pager.begin_next().map(|t| t.page), Some(0));
}

#[test]
fn refresh_reloads_everything_loaded_so_far() {
    let mut pager = Pager::new(2);
    for rows in [vec![1, 2], vec![3, 4]] {
        let ticket = pager.begin_next().expect("page");
        pager.apply_page(ticket, rows);
    }

    let refresh = pager.begin_refresh().expect("refresh");
    assert_eq!(refresh.range(), (0, 3));
    assert!(pager.begin_next().is_none());

    assert!(pager.apply_refresh(refresh, vec![1, 2, 3]));
    assert_eq!(pager.items, [1, 2, 3]);
    assert!(!pager.has_more);
    assert_eq!(pager.page, 2);
}

#[test]
fn refresh_before_any_page_covers_one_page() {
    let mut pager: Pager<u8> = Pager::new(5);
    let refresh = pager.begin_refresh().expect("refresh");
    assert_eq!(refresh.range(), (0, 4));
    pager.fail_refresh(refresh);
    assert!(!pager.loading);
}
