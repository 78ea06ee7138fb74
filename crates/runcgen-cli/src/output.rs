//! Formatted output helpers for CLI commands.

use std::fmt::Write;

use runcgen_common::types::SpecKey;
use runcgen_spec::CompiledSpecs;

/// Renders all specs as one JSON object keyed by `<service>/<platform>`.
///
/// # Errors
///
/// Returns an error if a spec is not valid JSON, or if two keys render to
/// the same string (an untagged configuration next to one tagged `default`).
pub fn render_specs(specs: &CompiledSpecs) -> anyhow::Result<String> {
    let mut object = serde_json::Map::with_capacity(specs.len());
    for (key, bytes) in specs {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        if object.insert(key.to_string(), value).is_some() {
            anyhow::bail!("ambiguous spec key {key}: produced by more than one configuration");
        }
    }
    Ok(serde_json::to_string_pretty(&serde_json::Value::Object(object))?)
}

/// Finds a spec by its rendered key.
///
/// # Errors
///
/// Returns an error if more than one spec renders to `key`.
pub fn find_spec<'a>(
    specs: &'a CompiledSpecs,
    key: &str,
) -> anyhow::Result<Option<&'a [u8]>> {
    let mut matches = specs.iter().filter(|(k, _)| k.to_string() == key);
    let found = matches.next().map(|(_, bytes)| bytes.as_slice());
    if matches.next().is_some() {
        anyhow::bail!("ambiguous spec key {key}: produced by more than one configuration");
    }
    Ok(found)
}

/// Renders keys one per line.
#[must_use]
pub fn render_keys(keys: &[SpecKey]) -> String {
    keys.iter().fold(String::new(), |mut out, key| {
        let _ = writeln!(out, "{key}");
        out
    })
}
