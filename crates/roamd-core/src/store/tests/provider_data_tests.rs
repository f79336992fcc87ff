use std::sync::{Arc, Mutex};

use crate::clock::SystemClock;
use crate::codec::{SectionReader, SectionWriter};
use crate::provider::{MemoryKeyStore, RealmConfig, RealmProvider};
use crate::store::data::{MemoryProviderSource, ProviderDataSource, StoreData, StoreFile};
use crate::store::error::StoreError;
use crate::store::provider_data::ProviderStoreData;

fn new_store() -> (ProviderStoreData, Arc<Mutex<MemoryProviderSource>>) {
    let source = Arc::new(Mutex::new(MemoryProviderSource::new()));
    let data = ProviderStoreData::new(
        source.clone(),
        Arc::new(MemoryKeyStore::new()),
        Arc::new(SystemClock::new()),
    );
    (data, source)
}

fn providers_in(source: &Arc<Mutex<MemoryProviderSource>>) -> Vec<RealmProvider> {
    source.lock().unwrap().get_providers()
}

fn set_providers(source: &Arc<Mutex<MemoryProviderSource>>, providers: Vec<RealmProvider>) {
    source.lock().unwrap().set_providers(providers);
}

fn test_provider(id: i64) -> RealmProvider {
    let mut config = RealmConfig::new(format!("realm-{}.example.com", id));
    config.friendly_name = format!("Realm {}", id);
    config.realm = "aaa.example.com".to_string();
    config.roaming_consortium_ois = vec!["0x5a03ba".to_string()];
    let mut provider = RealmProvider::new(
        config,
        Arc::new(MemoryKeyStore::new()),
        Arc::new(SystemClock::new()),
        id,
        1000,
        Some("com.example.installer".to_string()),
        false,
        vec![format!("CA_{}", id)],
        Some(format!("CLIENT_{}", id)),
        Some(format!("REMEDIATION_{}", id)),
        true,
        false,
    );
    provider.set_user_connect_choice(Some("\"preferred\"WPA2".to_string()), -62);
    provider
}

fn suggestion_provider(id: i64) -> RealmProvider {
    let mut provider = RealmProvider::new(
        RealmConfig::new(format!("suggested-{}.example.com", id)),
        Arc::new(MemoryKeyStore::new()),
        Arc::new(SystemClock::new()),
        id,
        RealmProvider::UNSET_CREATOR_UID,
        None,
        true,
        Vec::new(),
        None,
        None,
        false,
        false,
    );
    provider.set_trusted(false);
    provider.set_restricted(true);
    provider
}

fn encode(data: &ProviderStoreData) -> String {
    let mut out = SectionWriter::new();
    data.serialize(&mut out).expect("serialize failed");
    out.finish().expect("unbalanced writer")
}

fn decode_into(data: &ProviderStoreData, text: &str) -> Result<(), StoreError> {
    let mut source = SectionReader::new(text).expect("lexing failed");
    data.deserialize(Some(&mut source), 0)
}

#[test]
fn test_round_trip_preserves_list_content_and_order() {
    let (data, source) = new_store();
    let original = vec![test_provider(1), suggestion_provider(2), test_provider(3)];
    set_providers(&source, original.clone());

    let text = encode(&data);
    let (data2, source2) = new_store();
    decode_into(&data2, &text).unwrap();

    assert_eq!(providers_in(&source2), original);
}

#[test]
fn test_encoding_is_idempotent() {
    let (data, source) = new_store();
    set_providers(&source, vec![test_provider(4), suggestion_provider(5)]);
    assert_eq!(encode(&data), encode(&data));
}

#[test]
fn test_empty_list_round_trip() {
    let (data, _source) = new_store();
    let text = encode(&data);
    // An empty list still writes its wrapping section.
    assert!(text.contains("ProviderList {"));

    let (data2, source2) = new_store();
    set_providers(&source2, vec![test_provider(9)]);
    decode_into(&data2, &text).unwrap();
    assert!(providers_in(&source2).is_empty());
}

#[test]
fn test_shared_flag_normalized_to_false() {
    let (data, source) = new_store();
    let shared = RealmProvider::new(
        RealmConfig::new("shared.example.com"),
        Arc::new(MemoryKeyStore::new()),
        Arc::new(SystemClock::new()),
        6,
        1000,
        None,
        false,
        Vec::new(),
        None,
        None,
        false,
        true,
    );
    set_providers(&source, vec![shared]);

    let (data2, source2) = new_store();
    decode_into(&data2, &encode(&data)).unwrap();
    assert!(!providers_in(&source2)[0].is_shared());
}

#[test]
fn test_legacy_single_alias_migrates() {
    let text = "\
ProviderList {
  Provider {
    ProviderID = i64(7)
    CreatorUID = i32(1000)
    CaCertificateAlias = str(\"LEGACY_CA\")
    HasEverConnected = bool(false)
    IsFromSuggestion = bool(false)
    IsTrusted = bool(true)
    IsRestricted = bool(false)
    Configuration {
      HomeFqdn = str(\"legacy.example.com\")
    }
  }
}
";
    let (data, source) = new_store();
    decode_into(&data, text).unwrap();
    let providers = providers_in(&source);
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0].ca_certificate_aliases(), ["LEGACY_CA"]);
}

#[test]
fn test_both_alias_shapes_reject_the_record() {
    let text = "\
ProviderList {
  Provider {
    ProviderID = i64(8)
    CaCertificateAliases = list(\"NEW_CA\")
    CaCertificateAlias = str(\"LEGACY_CA\")
    Configuration {
      HomeFqdn = str(\"conflict.example.com\")
    }
  }
}
";
    let (data, source) = new_store();
    set_providers(&source, vec![test_provider(1)]);
    let err = decode_into(&data, text).unwrap_err();
    assert!(matches!(err, StoreError::ConflictingAliasShapes));
    // The failed decode must not install anything.
    assert_eq!(providers_in(&source), vec![test_provider(1)]);
}

#[test]
fn test_missing_provider_id_fails_the_whole_decode() {
    let text = "\
ProviderList {
  Provider {
    ProviderID = i64(1)
    Configuration {
      HomeFqdn = str(\"ok.example.com\")
    }
  }
  Provider {
    CreatorUID = i32(1000)
    Configuration {
      HomeFqdn = str(\"anonymous.example.com\")
    }
  }
}
";
    let (data, source) = new_store();
    let err = decode_into(&data, text).unwrap_err();
    assert!(matches!(err, StoreError::MissingProviderId));
    assert!(providers_in(&source).is_empty());
}

#[test]
fn test_missing_configuration_fails_the_whole_decode() {
    let text = "\
ProviderList {
  Provider {
    ProviderID = i64(2)
    CreatorUID = i32(1000)
  }
}
";
    let (data, _source) = new_store();
    let err = decode_into(&data, text).unwrap_err();
    assert!(matches!(err, StoreError::MissingConfiguration));
}

#[test]
fn test_missing_creator_uid_is_tolerated() {
    let text = "\
ProviderList {
  Provider {
    ProviderID = i64(3)
    Configuration {
      HomeFqdn = str(\"system.example.com\")
    }
  }
}
";
    let (data, source) = new_store();
    decode_into(&data, text).unwrap();
    assert_eq!(
        providers_in(&source)[0].creator_uid(),
        RealmProvider::UNSET_CREATOR_UID
    );
}

#[test]
fn test_unknown_values_and_sections_are_skipped() {
    let text = "\
ProviderList {
  Provider {
    ProviderID = i64(12)
    CarrierId = i32(1887)
    Provisioning {
      ServerUrl = str(\"https://osu.example.com\")
    }
    CreatorUID = i32(1000)
    Configuration {
      HomeFqdn = str(\"tolerant.example.com\")
    }
  }
}
";
    let (data, source) = new_store();
    decode_into(&data, text).unwrap();
    let providers = providers_in(&source);
    assert_eq!(providers[0].provider_id(), 12);
    assert_eq!(providers[0].creator_uid(), 1000);
    assert_eq!(providers[0].config().home_fqdn, "tolerant.example.com");
}

#[test]
fn test_unknown_store_section_is_skipped_at_dispatch() {
    let text = "\
DeletedProviderAudit {
  Count = i32(2)
}
ProviderList {
  Provider {
    ProviderID = i64(21)
    Configuration {
      HomeFqdn = str(\"dispatch.example.com\")
    }
  }
}
";
    let (data, source) = new_store();
    decode_into(&data, text).unwrap();
    assert_eq!(providers_in(&source).len(), 1);
}

#[test]
fn test_type_mismatch_is_fatal() {
    let text = "\
ProviderList {
  Provider {
    ProviderID = str(\"not-a-number\")
    Configuration {
      HomeFqdn = str(\"typed.example.com\")
    }
  }
}
";
    let (data, _source) = new_store();
    assert!(matches!(
        decode_into(&data, text).unwrap_err(),
        StoreError::Codec(_)
    ));
}

#[test]
fn test_non_suggestion_trust_flags_are_normalized() {
    // Soft invariant: decoded anyway, with trust defaults enforced.
    let text = "\
ProviderList {
  Provider {
    ProviderID = i64(30)
    IsFromSuggestion = bool(false)
    IsTrusted = bool(false)
    IsRestricted = bool(true)
    Configuration {
      HomeFqdn = str(\"strict.example.com\")
    }
  }
}
";
    let (data, source) = new_store();
    decode_into(&data, text).unwrap();
    let providers = providers_in(&source);
    assert!(providers[0].is_trusted());
    assert!(!providers[0].is_restricted());
}

#[test]
fn test_suggestion_trust_flags_are_applied() {
    let text = "\
ProviderList {
  Provider {
    ProviderID = i64(31)
    IsFromSuggestion = bool(true)
    IsTrusted = bool(false)
    IsRestricted = bool(true)
    Configuration {
      HomeFqdn = str(\"suggested.example.com\")
    }
  }
}
";
    let (data, source) = new_store();
    decode_into(&data, text).unwrap();
    let providers = providers_in(&source);
    assert!(!providers[0].is_trusted());
    assert!(providers[0].is_restricted());
}

#[test]
fn test_absent_source_is_a_noop() {
    let (data, source) = new_store();
    set_providers(&source, vec![test_provider(40)]);
    data.deserialize(None, 0).unwrap();
    assert_eq!(providers_in(&source).len(), 1);
}

#[test]
fn test_reset_installs_empty_list() {
    let (data, source) = new_store();
    set_providers(&source, vec![test_provider(41)]);
    data.reset();
    assert!(providers_in(&source).is_empty());
}

#[test]
fn test_store_data_identity() {
    let (data, _source) = new_store();
    assert!(data.has_pending_changes());
    assert_eq!(data.name(), "RealmProviderData");
    assert_eq!(data.target_file(), StoreFile::UserGeneral);
}
