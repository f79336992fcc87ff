//! Provider record: one persisted credential profile for a network realm.

use std::fmt;
use std::sync::Arc;

use crate::clock::Clock;
use crate::provider::config::RealmConfig;
use crate::provider::keys::KeyMaterialStore;

/// One realm provider as held in memory between store cycles.
///
/// Besides its persisted fields the record carries handles to the key
/// material store and the shared clock; both are opaque collaborators and
/// take no part in equality or debugging output.
#[derive(Clone)]
pub struct RealmProvider {
    config: RealmConfig,
    provider_id: i64,
    creator_uid: i32,
    package_name: Option<String>,
    is_from_suggestion: bool,
    ca_certificate_aliases: Vec<String>,
    client_private_key_and_certificate_alias: Option<String>,
    remediation_ca_certificate_alias: Option<String>,
    has_ever_connected: bool,
    shared: bool,
    is_trusted: bool,
    is_restricted: bool,
    connect_choice: Option<String>,
    connect_choice_rssi: i32,
    key_store: Arc<dyn KeyMaterialStore>,
    clock: Arc<dyn Clock>,
}

impl RealmProvider {
    /// Sentinel for a provider that has not been assigned an identifier.
    pub const UNSET_PROVIDER_ID: i64 = i64::MIN;
    /// Sentinel for an unknown creating principal.
    pub const UNSET_CREATOR_UID: i32 = i32::MIN;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: RealmConfig,
        key_store: Arc<dyn KeyMaterialStore>,
        clock: Arc<dyn Clock>,
        provider_id: i64,
        creator_uid: i32,
        package_name: Option<String>,
        is_from_suggestion: bool,
        ca_certificate_aliases: Vec<String>,
        client_private_key_and_certificate_alias: Option<String>,
        remediation_ca_certificate_alias: Option<String>,
        has_ever_connected: bool,
        shared: bool,
    ) -> Self {
        Self {
            config,
            provider_id,
            creator_uid,
            package_name,
            is_from_suggestion,
            ca_certificate_aliases,
            client_private_key_and_certificate_alias,
            remediation_ca_certificate_alias,
            has_ever_connected,
            shared,
            is_trusted: true,
            is_restricted: false,
            connect_choice: None,
            connect_choice_rssi: 0,
            key_store,
            clock,
        }
    }

    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    pub fn provider_id(&self) -> i64 {
        self.provider_id
    }

    pub fn creator_uid(&self) -> i32 {
        self.creator_uid
    }

    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }

    pub fn is_from_suggestion(&self) -> bool {
        self.is_from_suggestion
    }

    pub fn ca_certificate_aliases(&self) -> &[String] {
        &self.ca_certificate_aliases
    }

    pub fn set_ca_certificate_aliases(&mut self, aliases: Vec<String>) {
        self.ca_certificate_aliases = aliases;
    }

    pub fn client_private_key_and_certificate_alias(&self) -> Option<&str> {
        self.client_private_key_and_certificate_alias.as_deref()
    }

    pub fn remediation_ca_certificate_alias(&self) -> Option<&str> {
        self.remediation_ca_certificate_alias.as_deref()
    }

    pub fn has_ever_connected(&self) -> bool {
        self.has_ever_connected
    }

    pub fn set_has_ever_connected(&mut self, connected: bool) {
        self.has_ever_connected = connected;
    }

    pub fn is_shared(&self) -> bool {
        self.shared
    }

    pub fn is_trusted(&self) -> bool {
        self.is_trusted
    }

    pub fn set_trusted(&mut self, trusted: bool) {
        self.is_trusted = trusted;
    }

    pub fn is_restricted(&self) -> bool {
        self.is_restricted
    }

    pub fn set_restricted(&mut self, restricted: bool) {
        self.is_restricted = restricted;
    }

    pub fn connect_choice(&self) -> Option<&str> {
        self.connect_choice.as_deref()
    }

    pub fn connect_choice_rssi(&self) -> i32 {
        self.connect_choice_rssi
    }

    /// Record or clear the user's network selection preference. The choice
    /// and the signal level it was made at are one datum; they are only
    /// ever set together.
    pub fn set_user_connect_choice(&mut self, choice: Option<String>, rssi: i32) {
        self.connect_choice = choice;
        self.connect_choice_rssi = rssi;
    }

    /// Whether every alias this provider references resolves to installed
    /// material.
    pub fn key_material_installed(&self) -> bool {
        self.alias_refs()
            .iter()
            .all(|alias| self.key_store.contains_alias(alias))
    }

    /// Remove this provider's key material from the backing store. Called
    /// when the provider is deleted.
    pub fn purge_key_material(&self) {
        for alias in self.alias_refs() {
            if !self.key_store.remove_alias(alias) {
                log::warn!(
                    "provider {}: no key material under alias '{}'",
                    self.provider_id,
                    alias
                );
            }
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    fn alias_refs(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = self
            .ca_certificate_aliases
            .iter()
            .map(String::as_str)
            .collect();
        refs.extend(self.client_private_key_and_certificate_alias.as_deref());
        refs.extend(self.remediation_ca_certificate_alias.as_deref());
        refs
    }
}

// Collaborator handles are excluded: two records are the same provider when
// their persisted fields agree.
impl PartialEq for RealmProvider {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.provider_id == other.provider_id
            && self.creator_uid == other.creator_uid
            && self.package_name == other.package_name
            && self.is_from_suggestion == other.is_from_suggestion
            && self.ca_certificate_aliases == other.ca_certificate_aliases
            && self.client_private_key_and_certificate_alias
                == other.client_private_key_and_certificate_alias
            && self.remediation_ca_certificate_alias == other.remediation_ca_certificate_alias
            && self.has_ever_connected == other.has_ever_connected
            && self.shared == other.shared
            && self.is_trusted == other.is_trusted
            && self.is_restricted == other.is_restricted
            && self.connect_choice == other.connect_choice
            && self.connect_choice_rssi == other.connect_choice_rssi
    }
}

impl fmt::Debug for RealmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealmProvider")
            .field("provider_id", &self.provider_id)
            .field("creator_uid", &self.creator_uid)
            .field("package_name", &self.package_name)
            .field("home_fqdn", &self.config.home_fqdn)
            .field("is_from_suggestion", &self.is_from_suggestion)
            .field("ca_certificate_aliases", &self.ca_certificate_aliases)
            .field(
                "client_private_key_and_certificate_alias",
                &self.client_private_key_and_certificate_alias,
            )
            .field(
                "remediation_ca_certificate_alias",
                &self.remediation_ca_certificate_alias,
            )
            .field("has_ever_connected", &self.has_ever_connected)
            .field("shared", &self.shared)
            .field("is_trusted", &self.is_trusted)
            .field("is_restricted", &self.is_restricted)
            .field("connect_choice", &self.connect_choice)
            .field("connect_choice_rssi", &self.connect_choice_rssi)
            .finish_non_exhaustive()
    }
}
