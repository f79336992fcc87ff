//! Realm configuration block.
//!
//! The structured payload nested inside every provider record: the realm's
//! identity and roaming parameters. It owns its own section codec, and it
//! can be exchanged with provisioning tooling as a JSON document.

use serde::{Deserialize, Serialize};

use crate::codec::{Element, SectionReader, SectionWriter};
use crate::store::error::StoreError;

const TAG_HOME_FQDN: &str = "HomeFqdn";
const TAG_FRIENDLY_NAME: &str = "FriendlyName";
const TAG_REALM: &str = "Realm";
const TAG_ROAMING_CONSORTIUM_OIS: &str = "RoamingConsortiumOIs";
const TAG_SUBSCRIPTION_EXPIRATION: &str = "SubscriptionExpirationTimeMillis";
const TAG_UPDATE_IDENTIFIER: &str = "UpdateIdentifier";

/// Sentinel for "no expiration recorded".
pub const UNSET_EXPIRATION_MILLIS: i64 = i64::MIN;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealmConfig {
    /// Fully qualified domain name identifying the realm's home operator.
    pub home_fqdn: String,
    #[serde(default)]
    pub friendly_name: String,
    /// AAA realm used for authentication routing.
    #[serde(default)]
    pub realm: String,
    /// Organization identifiers of roaming partners, as opaque hex strings.
    #[serde(default)]
    pub roaming_consortium_ois: Vec<String>,
    #[serde(default = "unset_expiration")]
    pub subscription_expiration_millis: i64,
    #[serde(default)]
    pub update_identifier: i32,
}

fn unset_expiration() -> i64 {
    UNSET_EXPIRATION_MILLIS
}

impl RealmConfig {
    pub fn new(home_fqdn: impl Into<String>) -> Self {
        Self {
            home_fqdn: home_fqdn.into(),
            friendly_name: String::new(),
            realm: String::new(),
            roaming_consortium_ois: Vec::new(),
            subscription_expiration_millis: UNSET_EXPIRATION_MILLIS,
            update_identifier: 0,
        }
    }

    /// A configuration is usable only with a home FQDN.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.home_fqdn.is_empty() {
            return Err(StoreError::MissingRequiredValue {
                name: TAG_HOME_FQDN,
            });
        }
        Ok(())
    }

    /// Write this configuration's values into the currently open section.
    pub fn serialize(&self, out: &mut SectionWriter) -> Result<(), StoreError> {
        out.write_str(TAG_HOME_FQDN, &self.home_fqdn)?;
        out.write_str(TAG_FRIENDLY_NAME, &self.friendly_name)?;
        out.write_str(TAG_REALM, &self.realm)?;
        out.write_str_list(
            TAG_ROAMING_CONSORTIUM_OIS,
            Some(&self.roaming_consortium_ois),
        )?;
        out.write_i64(
            TAG_SUBSCRIPTION_EXPIRATION,
            self.subscription_expiration_millis,
        )?;
        out.write_i32(TAG_UPDATE_IDENTIFIER, self.update_identifier)?;
        Ok(())
    }

    /// Read a configuration from the just-entered section. Unknown values
    /// and sections are logged and skipped so configurations written by
    /// newer versions still load.
    pub fn deserialize(
        source: &mut SectionReader,
        outer_depth: usize,
    ) -> Result<Self, StoreError> {
        let mut config = Self::new(String::new());
        while let Some(element) = source.next_element_within(outer_depth)? {
            match element {
                Element::Value { name, value } => match name.as_str() {
                    TAG_HOME_FQDN => config.home_fqdn = value.into_str(&name)?,
                    TAG_FRIENDLY_NAME => config.friendly_name = value.into_str(&name)?,
                    TAG_REALM => config.realm = value.into_str(&name)?,
                    TAG_ROAMING_CONSORTIUM_OIS => {
                        config.roaming_consortium_ois =
                            value.into_opt_str_list(&name)?.unwrap_or_default();
                    }
                    TAG_SUBSCRIPTION_EXPIRATION => {
                        config.subscription_expiration_millis = value.as_i64(&name)?;
                    }
                    TAG_UPDATE_IDENTIFIER => config.update_identifier = value.as_i32(&name)?,
                    _ => log::warn!("ignoring unknown configuration value '{}'", name),
                },
                Element::Section(name) => {
                    log::warn!("ignoring unknown configuration section '{}'", name);
                    source.skip_current_section()?;
                }
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse a provisioning profile document.
    pub fn from_provisioning_json(json: &str) -> Result<Self, StoreError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Render this configuration as a provisioning profile document.
    pub fn to_provisioning_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
