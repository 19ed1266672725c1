use backend::testing;
use uuid::Uuid;

use super::*;

#[test]
fn key_is_scoped_to_project() {
    let store = LocalStorageSessionStore::new(&testing::config());
    assert_eq!(store.key(), "sb-abcd-auth-token");
}

#[test]
fn stored_session_decodes() {
    let session = testing::session(testing::user(Uuid::from_u128(1), "ada@example.com"));
    let raw = serde_json::to_string(&session).expect("encode");
    assert_eq!(decode_session(&raw), Some(session));
}

#[test]
fn garbage_reads_as_signed_out() {
    assert_eq!(decode_session("{not json"), None);
    assert_eq!(decode_session("{\"access_token\": 1}"), None);
}

#[test]
fn native_store_holds_nothing() {
    if cfg!(feature = "csr") {
        return;
    }
    let store = LocalStorageSessionStore::new(&testing::config());
    store.save(&testing::session(testing::user(Uuid::from_u128(1), "ada@example.com")));
    assert_eq!(store.load(), None);
}
