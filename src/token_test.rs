use super::*;
use uuid::Uuid;

fn scratch_store() -> CredentialStore {
    let path = std::env::temp_dir().join(format!("flamechat-test-{}.json", Uuid::new_v4()));
    CredentialStore::new(path)
}

// =============================================================================
// load / save
// =============================================================================

#[test]
fn missing_file_loads_none() {
    let store = scratch_store();
    assert_eq!(store.load(), None);
}

#[test]
fn save_then_load_round_trips() {
    let store = scratch_store();
    store.save("deadbeef").expect("save");
    assert_eq!(store.load().as_deref(), Some("deadbeef"));
    store.clear();
}

#[test]
fn save_overwrites_previous_token() {
    let store = scratch_store();
    store.save("first").expect("save");
    store.save("second").expect("save");
    assert_eq!(store.load().as_deref(), Some("second"));
    store.clear();
}

#[test]
fn expired_token_loads_none() {
    let store = scratch_store();
    let stored = StoredCredential {
        token: "stale".into(),
        expires_at: now_ms() - 1,
    };
    std::fs::write(store.path(), serde_json::to_string(&stored).unwrap()).unwrap();
    assert_eq!(store.load(), None);
    store.clear();
}

#[test]
fn malformed_file_loads_none() {
    let store = scratch_store();
    std::fs::write(store.path(), "not json at all").unwrap();
    assert_eq!(store.load(), None);
    store.clear();
}

#[test]
fn wire_field_is_camel_case() {
    let store = scratch_store();
    store.save("tok").expect("save");
    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("expiresAt"));
    store.clear();
}

// =============================================================================
// clear
// =============================================================================

#[test]
fn clear_is_total() {
    let store = scratch_store();
    store.clear();
    store.save("tok").expect("save");
    store.clear();
    assert_eq!(store.load(), None);
    store.clear();
}
