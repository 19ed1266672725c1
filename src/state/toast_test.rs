use super::*;

#[test]
fn push_puts_newest_first() {
    let mut state = ToastState::default();
    state.push(Notice::info("one", ""));
    state.push(Notice::info("two", ""));
    let titles: Vec<_> = state.toasts.iter().map(|t| t.notice.title.as_str()).collect();
    assert_eq!(titles, ["two", "one"]);
}

#[test]
fn push_drops_oldest_past_limit() {
    let mut state = ToastState::default();
    for n in 0..5 {
        state.push(Notice::info(format!("t{n}"), ""));
    }
    assert_eq!(state.toasts.len(), TOAST_LIMIT);
    assert_eq!(state.toasts[0].notice.title, "t4");
    assert_eq!(state.toasts[2].notice.title, "t2");
}

#[test]
fn dismiss_removes_only_matching_id() {
    let mut state = ToastState::default();
    let first = state.push(Notice::info("a", ""));
    let second = state.push(Notice::error("b", "boom"));
    assert_ne!(first, second);

    state.dismiss(first);
    assert_eq!(state.toasts.len(), 1);
    assert_eq!(state.toasts[0].id, second);
    assert_eq!(state.toasts[0].notice.variant, ToastVariant::Destructive);

    state.dismiss(999);
    assert_eq!(state.toasts.len(), 1);
}

#[test]
fn ids_stay_unique_after_clear() {
    let mut state = ToastState::default();
    let first = state.push(Notice::info("a", ""));
    state.clear();
    let second = state.push(Notice::info("b", ""));
    assert!(second > first);
}
