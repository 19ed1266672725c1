use super::*;

fn config() -> BackendConfig {
    BackendConfig {
        url: "https://abcd.example.co".to_owned(),
        anon_key: "anon".to_owned(),
        image_bucket: "prompt-images".to_owned(),
    }
}

#[test]
fn request_posts_arguments_to_named_function() {
    let id = Uuid::nil();
    let request = request(&config(), &SpendPromptCredit { in_prompt_id: id }).expect("request");
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "https://abcd.example.co/rest/v1/rpc/spend_prompt_credit");
    let Some(crate::transport::Body::Json(body)) = request.body else { panic!("expected json body") };
    assert_eq!(body, format!("{{\"in_prompt_id\":\"{id}\"}}"));
}

#[test]
fn void_procedures_accept_empty_body() {
    decode::<IncrementViewCount>("").expect("empty body");
    decode::<IncrementCopyCount>("null").expect("null body");
}

#[test]
fn spend_result_decodes_rows() {
    let rows = decode::<SpendPromptCredit>(r#"[{"success":true,"credits_left":4}]"#).expect("rows");
    assert_eq!(rows, vec![SpendResult { success: true, credits_left: Some(4) }]);

    let rows = decode::<SpendPromptCredit>(r#"[{"success":false}]"#).expect("rows");
    assert_eq!(rows[0].credits_left, None);
}

#[test]
fn mismatched_body_is_decode_error() {
    let err = decode::<SpendPromptCredit>(r#"{"oops":1}"#).expect_err("shape mismatch");
    assert!(matches!(err, BackendError::Decode(msg) if msg.starts_with("spend_prompt_credit")));
}
