use super::*;

#[test]
fn api_error_reads_postgrest_body() {
    let body = r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#;
    let err = api_error(406, body);
    assert!(err.is_no_rows());
    assert_eq!(
        err,
        BackendError::Api {
            status: 406,
            code: Some("PGRST116".to_owned()),
            message: "JSON object requested, multiple (or no) rows returned".to_owned(),
        }
    );
}

#[test]
fn api_error_other_codes_are_not_no_rows() {
    let err = api_error(409, r#"{"code":"23505","message":"duplicate key value"}"#);
    assert!(!err.is_no_rows());
    assert_eq!(err.user_message(), "duplicate key value");
}

#[test]
fn api_error_falls_back_to_raw_body() {
    let err = api_error(502, "Bad Gateway");
    assert_eq!(err, BackendError::Api { status: 502, code: None, message: "Bad Gateway".to_owned() });
}

#[test]
fn api_error_empty_body_mentions_status() {
    let err = api_error(500, "  ");
    assert_eq!(err.user_message(), "request failed with status 500");
}

#[test]
fn auth_error_prefers_msg_then_description() {
    let err = auth_error(422, r#"{"code":422,"error_code":"user_already_exists","msg":"User already registered"}"#);
    assert_eq!(err, BackendError::Auth { status: 422, message: "User already registered".to_owned() });

    let err = auth_error(400, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#);
    assert_eq!(err.user_message(), "Invalid login credentials");
}

#[test]
fn storage_error_reads_message() {
    let err = storage_error(409, r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#);
    assert_eq!(err, BackendError::Storage { status: 409, message: "The resource already exists".to_owned() });
}

#[test]
fn transport_and_auth_messages_are_generic() {
    assert!(BackendError::Transport("dns".to_owned()).user_message().contains("Network error"));
    assert_eq!(BackendError::NotAuthenticated.user_message(), "You need to sign in first.");
    assert_eq!(
        BackendError::Decode("eof".to_owned()).user_message(),
        "Something went wrong. Please try again."
    );
}
