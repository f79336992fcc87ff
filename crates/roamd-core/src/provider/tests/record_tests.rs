use std::sync::Arc;

use crate::clock::SystemClock;
use crate::provider::config::RealmConfig;
use crate::provider::keys::{KeyMaterialStore, MemoryKeyStore};
use crate::provider::record::RealmProvider;

fn provider_with_store(key_store: Arc<MemoryKeyStore>) -> RealmProvider {
    RealmProvider::new(
        RealmConfig::new("realm.example.com"),
        key_store,
        Arc::new(SystemClock::new()),
        11,
        1000,
        Some("com.example.installer".to_string()),
        false,
        vec!["CA_11_0".to_string(), "CA_11_1".to_string()],
        Some("CLIENT_11".to_string()),
        Some("REMEDIATION_11".to_string()),
        false,
        false,
    )
}

#[test]
fn test_construction_defaults() {
    let provider = provider_with_store(Arc::new(MemoryKeyStore::new()));
    assert!(provider.is_trusted());
    assert!(!provider.is_restricted());
    assert!(!provider.is_shared());
    assert!(provider.connect_choice().is_none());
    assert_eq!(provider.connect_choice_rssi(), 0);
}

#[test]
fn test_connect_choice_is_set_as_a_unit() {
    let mut provider = provider_with_store(Arc::new(MemoryKeyStore::new()));
    provider.set_user_connect_choice(Some("\"other-network\"".to_string()), -58);
    assert_eq!(provider.connect_choice(), Some("\"other-network\""));
    assert_eq!(provider.connect_choice_rssi(), -58);

    provider.set_user_connect_choice(None, 0);
    assert!(provider.connect_choice().is_none());
    assert_eq!(provider.connect_choice_rssi(), 0);
}

#[test]
fn test_key_material_tracking() {
    let key_store = Arc::new(MemoryKeyStore::new());
    let provider = provider_with_store(key_store.clone());
    assert!(!provider.key_material_installed());

    key_store.insert_alias("CA_11_0");
    key_store.insert_alias("CA_11_1");
    key_store.insert_alias("CLIENT_11");
    key_store.insert_alias("REMEDIATION_11");
    assert!(provider.key_material_installed());

    provider.purge_key_material();
    assert!(!key_store.contains_alias("CA_11_0"));
    assert!(!key_store.contains_alias("CLIENT_11"));
    assert!(!key_store.contains_alias("REMEDIATION_11"));
}

#[test]
fn test_equality_ignores_collaborator_handles() {
    let a = provider_with_store(Arc::new(MemoryKeyStore::new()));
    let b = provider_with_store(Arc::new(MemoryKeyStore::new()));
    assert_eq!(a, b);

    let mut c = provider_with_store(Arc::new(MemoryKeyStore::new()));
    c.set_trusted(false);
    assert_ne!(a, c);
}
