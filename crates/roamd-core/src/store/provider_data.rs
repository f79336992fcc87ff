//! Store data for the user-scoped realm provider list.
//!
//! Encodes the provider list as a `ProviderList` section of `Provider`
//! records and decodes it back, applying validation and the legacy
//! single-alias migration. Decoding is order-independent and tolerates
//! unknown values and sections (logged, skipped) so stores written by newer
//! versions keep loading; missing required fields and conflicting field
//! shapes fail the whole decode with no partial record.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::clock::Clock;
use crate::codec::{Element, SectionReader, SectionWriter};
use crate::provider::{KeyMaterialStore, RealmConfig, RealmProvider};
use crate::store::data::{ProviderDataSource, StoreData, StoreFile};
use crate::store::error::StoreError;

const TAG_SECTION_PROVIDER_DATA: &str = "RealmProviderData";
const TAG_SECTION_PROVIDER_LIST: &str = "ProviderList";
const TAG_SECTION_PROVIDER: &str = "Provider";
const TAG_SECTION_CONFIGURATION: &str = "Configuration";

const TAG_PROVIDER_ID: &str = "ProviderID";
const TAG_CREATOR_UID: &str = "CreatorUID";
const TAG_PACKAGE_NAME: &str = "PackageName";
const TAG_CA_CERTIFICATE_ALIASES: &str = "CaCertificateAliases";
const TAG_CA_CERTIFICATE_ALIAS: &str = "CaCertificateAlias";
const TAG_CLIENT_PRIVATE_KEY_AND_CERT_ALIAS: &str = "ClientPrivateKeyAlias";
const TAG_REMEDIATION_CA_CERTIFICATE_ALIAS: &str = "RemediationCaCertificateAlias";

const TAG_HAS_EVER_CONNECTED: &str = "HasEverConnected";
const TAG_IS_FROM_SUGGESTION: &str = "IsFromSuggestion";
const TAG_IS_TRUSTED: &str = "IsTrusted";
const TAG_IS_RESTRICTED: &str = "IsRestricted";
const TAG_CONNECT_CHOICE: &str = "ConnectChoice";
const TAG_CONNECT_CHOICE_RSSI: &str = "ConnectChoiceRssi";

/// The CA alias field of a record mid-decode. Old stores carry a single
/// `CaCertificateAlias`; current stores carry the `CaCertificateAliases`
/// sequence. A record may use one shape, never both.
enum CaAliasField {
    Unset,
    Aliases(Vec<String>),
    LegacyAlias(String),
}

impl CaAliasField {
    fn observe_aliases(&mut self, aliases: Vec<String>) -> Result<(), StoreError> {
        match self {
            CaAliasField::LegacyAlias(_) => Err(StoreError::ConflictingAliasShapes),
            _ => {
                *self = CaAliasField::Aliases(aliases);
                Ok(())
            }
        }
    }

    fn observe_legacy(&mut self, alias: String) -> Result<(), StoreError> {
        match self {
            CaAliasField::Aliases(_) => Err(StoreError::ConflictingAliasShapes),
            _ => {
                *self = CaAliasField::LegacyAlias(alias);
                Ok(())
            }
        }
    }

    /// Normalize to the current shape once the record scan is complete.
    fn into_aliases(self) -> Vec<String> {
        match self {
            CaAliasField::Unset => Vec::new(),
            CaAliasField::Aliases(aliases) => aliases,
            CaAliasField::LegacyAlias(alias) => vec![alias],
        }
    }
}

/// User-store dataset holding the realm provider list.
pub struct ProviderStoreData {
    data_source: Arc<Mutex<dyn ProviderDataSource>>,
    key_store: Arc<dyn KeyMaterialStore>,
    clock: Arc<dyn Clock>,
}

impl ProviderStoreData {
    pub fn new(
        data_source: Arc<Mutex<dyn ProviderDataSource>>,
        key_store: Arc<dyn KeyMaterialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            data_source,
            key_store,
            clock,
        }
    }

    fn data_source(&self) -> MutexGuard<'_, dyn ProviderDataSource + 'static> {
        // The guarded list stays coherent even if a writer panicked.
        self.data_source.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn serialize_provider_list(
        &self,
        out: &mut SectionWriter,
        providers: Option<&[RealmProvider]>,
    ) -> Result<(), StoreError> {
        // No list at all writes nothing; an empty list still writes its
        // wrapping section.
        let Some(providers) = providers else {
            return Ok(());
        };
        out.start_section(TAG_SECTION_PROVIDER_LIST)?;
        for provider in providers {
            self.serialize_provider(out, provider)?;
        }
        out.end_section(TAG_SECTION_PROVIDER_LIST)?;
        Ok(())
    }

    /// Field order here is fixed for diffable store files; decoding does
    /// not depend on it.
    fn serialize_provider(
        &self,
        out: &mut SectionWriter,
        provider: &RealmProvider,
    ) -> Result<(), StoreError> {
        out.start_section(TAG_SECTION_PROVIDER)?;
        out.write_i64(TAG_PROVIDER_ID, provider.provider_id())?;
        out.write_i32(TAG_CREATOR_UID, provider.creator_uid())?;
        if let Some(package_name) = provider.package_name() {
            out.write_str(TAG_PACKAGE_NAME, package_name)?;
        }
        out.write_str_list(
            TAG_CA_CERTIFICATE_ALIASES,
            Some(provider.ca_certificate_aliases()),
        )?;
        out.write_opt_str(
            TAG_CLIENT_PRIVATE_KEY_AND_CERT_ALIAS,
            provider.client_private_key_and_certificate_alias(),
        )?;
        out.write_bool(TAG_HAS_EVER_CONNECTED, provider.has_ever_connected())?;
        out.write_bool(TAG_IS_FROM_SUGGESTION, provider.is_from_suggestion())?;
        out.write_bool(TAG_IS_TRUSTED, provider.is_trusted())?;
        out.write_bool(TAG_IS_RESTRICTED, provider.is_restricted())?;
        out.write_opt_str(TAG_CONNECT_CHOICE, provider.connect_choice())?;
        out.write_i32(TAG_CONNECT_CHOICE_RSSI, provider.connect_choice_rssi())?;
        out.start_section(TAG_SECTION_CONFIGURATION)?;
        provider.config().serialize(out)?;
        out.end_section(TAG_SECTION_CONFIGURATION)?;
        out.write_opt_str(
            TAG_REMEDIATION_CA_CERTIFICATE_ALIAS,
            provider.remediation_ca_certificate_alias(),
        )?;
        out.end_section(TAG_SECTION_PROVIDER)?;
        Ok(())
    }

    fn deserialize_provider_list(
        &self,
        source: &mut SectionReader,
        outer_depth: usize,
    ) -> Result<Vec<RealmProvider>, StoreError> {
        let mut providers = Vec::new();
        while source.goto_next_section_with_name_or_end(TAG_SECTION_PROVIDER, outer_depth)? {
            providers.push(self.deserialize_provider(source, outer_depth + 1)?);
        }
        Ok(providers)
    }

    fn deserialize_provider(
        &self,
        source: &mut SectionReader,
        outer_depth: usize,
    ) -> Result<RealmProvider, StoreError> {
        let mut provider_id = RealmProvider::UNSET_PROVIDER_ID;
        let mut creator_uid = RealmProvider::UNSET_CREATOR_UID;
        let mut package_name = None;
        let mut ca_aliases = CaAliasField::Unset;
        let mut client_private_key_and_certificate_alias = None;
        let mut remediation_ca_certificate_alias = None;
        let mut has_ever_connected = false;
        let mut is_from_suggestion = false;
        let mut is_trusted = true;
        let mut is_restricted = false;
        let mut connect_choice = None;
        let mut connect_choice_rssi = 0;
        let mut config: Option<RealmConfig> = None;

        while let Some(element) = source.next_element_within(outer_depth)? {
            match element {
                Element::Value { name, value } => match name.as_str() {
                    TAG_PROVIDER_ID => provider_id = value.as_i64(&name)?,
                    TAG_CREATOR_UID => creator_uid = value.as_i32(&name)?,
                    TAG_PACKAGE_NAME => package_name = value.into_opt_str(&name)?,
                    TAG_CA_CERTIFICATE_ALIASES => {
                        if let Some(aliases) = value.into_opt_str_list(&name)? {
                            ca_aliases.observe_aliases(aliases)?;
                        }
                    }
                    TAG_CA_CERTIFICATE_ALIAS => {
                        // Old single-alias stores migrate on read.
                        if let Some(alias) = value.into_opt_str(&name)? {
                            ca_aliases.observe_legacy(alias)?;
                        }
                    }
                    TAG_CLIENT_PRIVATE_KEY_AND_CERT_ALIAS => {
                        client_private_key_and_certificate_alias = value.into_opt_str(&name)?;
                    }
                    TAG_REMEDIATION_CA_CERTIFICATE_ALIAS => {
                        remediation_ca_certificate_alias = value.into_opt_str(&name)?;
                    }
                    TAG_HAS_EVER_CONNECTED => has_ever_connected = value.as_bool(&name)?,
                    TAG_IS_FROM_SUGGESTION => is_from_suggestion = value.as_bool(&name)?,
                    TAG_IS_TRUSTED => is_trusted = value.as_bool(&name)?,
                    TAG_IS_RESTRICTED => is_restricted = value.as_bool(&name)?,
                    TAG_CONNECT_CHOICE => connect_choice = value.into_opt_str(&name)?,
                    TAG_CONNECT_CHOICE_RSSI => connect_choice_rssi = value.as_i32(&name)?,
                    _ => log::warn!("ignoring unknown value '{}' under Provider", name),
                },
                Element::Section(name) => {
                    if name == TAG_SECTION_CONFIGURATION {
                        config = Some(RealmConfig::deserialize(source, outer_depth + 1)?);
                    } else {
                        log::warn!("ignoring unexpected section '{}' under Provider", name);
                        source.skip_current_section()?;
                    }
                }
            }
        }

        if provider_id == RealmProvider::UNSET_PROVIDER_ID {
            return Err(StoreError::MissingProviderId);
        }
        let ca_certificate_aliases = ca_aliases.into_aliases();
        let Some(config) = config else {
            return Err(StoreError::MissingConfiguration);
        };

        // Providers read from the user store are never share-scoped.
        let mut provider = RealmProvider::new(
            config,
            Arc::clone(&self.key_store),
            Arc::clone(&self.clock),
            provider_id,
            creator_uid,
            package_name,
            is_from_suggestion,
            ca_certificate_aliases,
            client_private_key_and_certificate_alias,
            remediation_ca_certificate_alias,
            has_ever_connected,
            false,
        );
        provider.set_user_connect_choice(connect_choice, connect_choice_rssi);
        if is_from_suggestion {
            provider.set_trusted(is_trusted);
            provider.set_restricted(is_restricted);
        } else {
            if !is_trusted {
                log::warn!("provider {}: non-suggestion provider marked untrusted", provider_id);
            }
            if is_restricted {
                log::warn!("provider {}: non-suggestion provider marked restricted", provider_id);
            }
        }
        Ok(provider)
    }
}

impl StoreData for ProviderStoreData {
    fn serialize(&self, out: &mut SectionWriter) -> Result<(), StoreError> {
        let providers = self.data_source().get_providers();
        self.serialize_provider_list(out, Some(&providers))
    }

    fn deserialize(
        &self,
        source: Option<&mut SectionReader>,
        outer_depth: usize,
    ) -> Result<(), StoreError> {
        // Ignore empty reads.
        let Some(source) = source else {
            return Ok(());
        };
        while let Some(section) = source.goto_next_section_or_end(outer_depth)? {
            match section.as_str() {
                TAG_SECTION_PROVIDER_LIST => {
                    let providers = self.deserialize_provider_list(source, outer_depth + 1)?;
                    self.data_source().set_providers(providers);
                }
                other => {
                    log::warn!("ignoring unknown realm provider store data '{}'", other);
                    source.skip_current_section()?;
                }
            }
        }
        Ok(())
    }

    fn reset(&self) {
        self.data_source().set_providers(Vec::new());
    }

    fn has_pending_changes(&self) -> bool {
        // always persist.
        true
    }

    fn name(&self) -> &'static str {
        TAG_SECTION_PROVIDER_DATA
    }

    fn target_file(&self) -> StoreFile {
        StoreFile::UserGeneral
    }
}

impl fmt::Debug for ProviderStoreData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderStoreData").finish_non_exhaustive()
    }
}
