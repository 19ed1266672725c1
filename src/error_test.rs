use super::*;

#[test]
fn validation_message_is_shown_verbatim() {
    let err = ServiceError::Validation("Title is required.".to_owned());
    assert_eq!(err.user_message(), "Title is required.");
    assert_eq!(err.to_string(), "Title is required.");
}

#[test]
fn backend_errors_keep_server_message() {
    let err: ServiceError = BackendError::Api { status: 409, code: None, message: "duplicate key".to_owned() }.into();
    assert_eq!(err.user_message(), "duplicate key");
}

#[test]
fn timeout_matches_admin_form_copy() {
    assert_eq!(
        ServiceError::TimedOut.user_message(),
        "The operation is taking longer than expected. Please try again."
    );
}
