//! On-disk bundle: a project plus the exec configurations of its services.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use runcgen_compose::Project;
use runcgen_spec::{ExecConfigs, PlatformConfig};
use serde::Deserialize;

/// Input document of the `compile` and `keys` commands.
#[derive(Debug, Deserialize)]
pub struct Bundle {
    /// The project to compile.
    pub project: Project,
    /// Exec configurations per service name.
    #[serde(default)]
    pub configs: BTreeMap<String, Vec<BundleConfig>>,
}

/// One exec configuration inside a bundle.
#[derive(Debug, Deserialize)]
pub struct BundleConfig {
    /// Platform tag; absent or empty means the default variant.
    #[serde(default)]
    pub platform: Option<String>,
    /// Exec state, either inline JSON or an already encoded string.
    pub config: RawConfig,
}

/// Exec state as it appears in a bundle.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawConfig {
    /// Encoded blob, passed through byte for byte.
    Encoded(String),
    /// Inline JSON value, re-encoded before compilation.
    Inline(serde_json::Value),
}

impl RawConfig {
    fn into_bytes(self) -> anyhow::Result<Vec<u8>> {
        match self {
            Self::Encoded(text) => Ok(text.into_bytes()),
            Self::Inline(value) => Ok(serde_json::to_vec(&value)?),
        }
    }
}

impl Bundle {
    /// Reads and parses a bundle file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a bundle.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        tracing::debug!(path = %path.display(), "loading bundle");
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read bundle {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid bundle {}", path.display()))
    }

    /// Splits the bundle into the project and its exec configurations.
    ///
    /// # Errors
    ///
    /// Returns an error if an inline configuration cannot be re-encoded.
    pub fn into_parts(self) -> anyhow::Result<(Project, ExecConfigs)> {
        let mut configs = ExecConfigs::new();
        for (service, entries) in self.configs {
            let mut platform_configs = Vec::with_capacity(entries.len());
            for entry in entries {
                platform_configs.push(PlatformConfig::new(
                    entry.platform.as_deref().unwrap_or_default(),
                    entry.config.into_bytes()?,
                ));
            }
            let _ = configs.insert(service, platform_configs);
        }
        Ok((self.project, configs))
    }
}
