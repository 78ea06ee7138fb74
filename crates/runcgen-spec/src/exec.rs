//! Exec state: the last-known runtime configuration of a service.
//!
//! The raw blob uses the engine's field names (`Env`, `Cmd`, `WorkingDir`,
//! `User`, `Platform`). Every field is optional and `null` reads as unset.

use std::collections::BTreeMap;

use runcgen_common::constants::DEFAULT_PLATFORM_SEGMENT;
use runcgen_common::error::{Result, RuncgenError};
use runcgen_common::types::Platform;
use serde::{Deserialize, Deserializer, Serialize};

/// Decoded exec state for one platform variant of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExecState {
    /// `KEY=VALUE` or bare `KEY` entries.
    #[serde(deserialize_with = "null_as_default")]
    pub env: Vec<String>,
    /// Command tokens. A single string is accepted as a one-token command.
    #[serde(deserialize_with = "command_tokens")]
    pub cmd: Vec<String>,
    /// Working directory; empty means unset.
    #[serde(deserialize_with = "null_as_default")]
    pub working_dir: String,
    /// User; empty means the image default.
    #[serde(deserialize_with = "null_as_default")]
    pub user: String,
    /// Platform the state was captured on.
    #[serde(deserialize_with = "platform_tag")]
    pub platform: Option<Platform>,
}

impl ExecState {
    /// Decodes a raw exec-state blob.
    ///
    /// A literal `null` decodes to the empty state. `service` and `platform`
    /// only label the error.
    ///
    /// # Errors
    ///
    /// Returns [`RuncgenError::Decode`] if the blob is neither `null` nor a
    /// JSON object of the expected shape.
    pub fn decode(service: &str, platform: Option<&Platform>, raw: &[u8]) -> Result<Self> {
        serde_json::from_slice::<Option<Self>>(raw)
            .map(Option::unwrap_or_default)
            .map_err(|source| RuncgenError::Decode {
                service: service.to_string(),
                platform: platform
                    .map_or(DEFAULT_PLATFORM_SEGMENT, Platform::as_str)
                    .to_string(),
                source,
            })
    }
}

/// One raw exec configuration registered for a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Platform variant; `None` is the unqualified configuration.
    pub platform: Option<Platform>,
    /// Raw exec-state blob.
    pub config: Vec<u8>,
}

impl PlatformConfig {
    /// Creates a configuration from an external platform tag, where the
    /// empty string means "no platform".
    #[must_use]
    pub fn new(platform: &str, config: impl Into<Vec<u8>>) -> Self {
        Self {
            platform: Platform::from_tag(platform),
            config: config.into(),
        }
    }

    /// Creates a configuration without a platform tag.
    #[must_use]
    pub fn untagged(config: impl Into<Vec<u8>>) -> Self {
        Self {
            platform: None,
            config: config.into(),
        }
    }
}

/// Exec configurations per service name, in registration order.
pub type ExecConfigs = BTreeMap<String, Vec<PlatformConfig>>;

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CommandTokens {
    Single(String),
    Many(Vec<String>),
}

fn command_tokens<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<CommandTokens>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(CommandTokens::Single(token)) => vec![token],
        Some(CommandTokens::Many(tokens)) => tokens,
    })
}

fn platform_tag<'de, D>(deserializer: D) -> std::result::Result<Option<Platform>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .as_deref()
        .and_then(Platform::from_tag))
}
