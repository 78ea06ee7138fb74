//! Compiler configuration model.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_OS, DEFAULT_TERMINAL};

/// Knobs that influence the synthesized parts of a runtime spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// OS assumed when neither the configuration tag nor the exec state
    /// names a platform. Selects the synthesized `PATH`.
    pub default_os: String,
    /// Value injected as `TERM` for TTY services that do not set it.
    pub terminal: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_os: DEFAULT_OS.to_string(),
            terminal: DEFAULT_TERMINAL.to_string(),
        }
    }
}
