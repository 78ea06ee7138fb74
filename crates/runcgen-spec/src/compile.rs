//! Batch compilation of a whole project.

use std::collections::{BTreeMap, HashSet};

use runcgen_common::config::CompilerConfig;
use runcgen_common::error::Result;
use runcgen_common::types::SpecKey;
use runcgen_compose::Project;

use crate::builder::SpecBuilder;
use crate::exec::ExecConfigs;

/// Serialized specs keyed by service and platform.
pub type CompiledSpecs = BTreeMap<SpecKey, Vec<u8>>;

/// Builds one spec for every exec configuration of every service.
///
/// Services are visited in dependency order and each service's
/// configurations in registration order. Services without configurations
/// produce nothing. The project's name is stamped on the service labels.
///
/// # Errors
///
/// Fails on the first configuration that cannot be decoded or encoded, or
/// if the services cannot be ordered. Nothing is returned for the specs
/// already built.
pub fn compile(
    project: &Project,
    configs: &ExecConfigs,
    config: &CompilerConfig,
) -> Result<CompiledSpecs> {
    let builder = SpecBuilder::new(project.name.clone(), config.clone());
    let mut specs = CompiledSpecs::new();

    for service in project.services_in_dependency_order()? {
        for exec in configs.get(&service.name).into_iter().flatten() {
            let key = SpecKey::new(service.name.clone(), exec.platform.clone());
            tracing::info!(key = %key, "Creating runc spec");
            let spec = builder.build(service, exec.platform.as_ref(), &exec.config)?;
            if specs.insert(key, spec).is_some() {
                tracing::warn!(
                    service = %service.name,
                    "platform registered twice, keeping the later configuration"
                );
            }
        }
    }

    for name in configs.keys().filter(|name| project.service(name).is_none()) {
        tracing::debug!(service = %name, "ignoring configurations of unknown service");
    }

    tracing::info!(project = %project.name, count = specs.len(), "compiled runtime specs");
    Ok(specs)
}

/// Returns the keys [`compile`] would produce, in visiting order, without
/// decoding any configuration.
///
/// A platform registered twice for a service is listed once, at its first
/// position.
///
/// # Errors
///
/// Returns an error if the services cannot be ordered.
pub fn planned_keys(project: &Project, configs: &ExecConfigs) -> Result<Vec<SpecKey>> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for service in project.services_in_dependency_order()? {
        for exec in configs.get(&service.name).into_iter().flatten() {
            let key = SpecKey::new(service.name.clone(), exec.platform.clone());
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        }
    }
    Ok(keys)
}
