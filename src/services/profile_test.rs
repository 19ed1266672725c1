use std::sync::Arc;

use backend::Method;
use backend::testing::{self, MockTransport};

use super::*;

fn profile(full_name: Option<&str>) -> UserProfile {
    UserProfile {
        id: Uuid::from_u128(1),
        username: Some("ada".to_owned()),
        full_name: full_name.map(str::to_owned),
        avatar_url: None,
        role: None,
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn initial_prefers_full_name_then_email() {
    assert_eq!(initial(Some(&profile(Some("grace hopper"))), Some("ada@example.com")), 'G');
    assert_eq!(initial(Some(&profile(None)), Some("ada@example.com")), 'A');
    assert_eq!(initial(None, None), 'U');
}

#[test]
fn form_prefills_blank_for_missing_fields() {
    let form = ProfileForm::from_profile(&profile(Some("Ada")));
    assert_eq!(form, ProfileForm { full_name: "Ada".to_owned(), avatar_url: String::new() });
}

#[tokio::test]
async fn update_patches_own_row_only() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::empty(204));
    let backend = testing::backend(mock.clone());
    let form = ProfileForm { full_name: " Ada Lovelace ".to_owned(), avatar_url: String::new() };

    update_profile(&backend, Uuid::from_u128(1), &form).await.expect("update");

    let request = mock.last_request().expect("request");
    assert_eq!(request.method, Method::Patch);
    assert_eq!(testing::query_param(&request, "id"), [format!("eq.{}", Uuid::from_u128(1))]);
    assert_eq!(testing::json_body(&request), serde_json::json!({ "full_name": "Ada Lovelace", "avatar_url": "" }));
}

#[tokio::test]
async fn missing_role_defaults_to_user() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!({ "role": null })));
    let backend = testing::backend(mock.clone());

    assert_eq!(fetch_role(&backend, Uuid::from_u128(1)).await, Ok(UserRole::User));
    let request = mock.last_request().expect("request");
    assert_eq!(request.header_value("Accept"), Some("application/vnd.pgrst.object+json"));
}

#[tokio::test]
async fn missing_profile_is_a_no_rows_error() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::no_rows());
    let backend = testing::backend(mock);

    let err = fetch_profile(&backend, Uuid::from_u128(1)).await.expect_err("missing");
    assert!(matches!(err, ServiceError::Backend(ref e) if e.is_no_rows()));
}
