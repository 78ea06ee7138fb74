//! Assembles the runtime spec of a single service.

use std::collections::BTreeMap;

use runcgen_common::config::CompilerConfig;
use runcgen_common::constants::{
    DEFAULT_PLATFORM_SEGMENT, DOMAINNAME_SYSCTL, PROJECT_LABEL, SERVICE_LABEL,
};
use runcgen_common::error::{Result, RuncgenError};
use runcgen_common::types::{Platform, ProjectName};
use runcgen_compose::ServiceDefinition;

use crate::exec::ExecState;
use crate::oci::RuntimeSpec;
use crate::resolve;

/// Returns the service labels plus the project and service identity labels.
///
/// The identity labels win over service labels of the same name.
#[must_use]
pub fn service_labels(
    project: &ProjectName,
    service: &ServiceDefinition,
) -> BTreeMap<String, String> {
    let mut labels = service.labels.clone();
    let _ = labels.insert(PROJECT_LABEL.to_string(), project.to_string());
    let _ = labels.insert(SERVICE_LABEL.to_string(), service.name.clone());
    labels
}

/// Builds runtime specs for the services of one project.
#[derive(Debug, Clone)]
pub struct SpecBuilder {
    project: ProjectName,
    config: CompilerConfig,
}

impl SpecBuilder {
    /// Creates a builder for the given project identity.
    #[must_use]
    pub const fn new(project: ProjectName, config: CompilerConfig) -> Self {
        Self { project, config }
    }

    /// Merges a service with an already decoded exec state.
    ///
    /// Starts from [`RuntimeSpec::baseline`] and sets hostname, domain name
    /// and the process block; everything else keeps the skeleton defaults.
    #[must_use]
    pub fn assemble(
        &self,
        service: &ServiceDefinition,
        exec: &ExecState,
        platform: Option<&Platform>,
    ) -> RuntimeSpec {
        // Labels are not part of the emitted config yet.
        let labels = service_labels(&self.project, service);
        tracing::debug!(service = %service.name, labels = ?labels, "computed service labels");

        let resolved = resolve::resolve(service, exec, platform, &self.config);

        let mut spec = RuntimeSpec::baseline();
        spec.hostname.clone_from(&service.hostname);
        if !service.domainname.is_empty() {
            let _ = spec
                .sysctl_mut()
                .insert(DOMAINNAME_SYSCTL.to_string(), service.domainname.clone());
        }

        let process = spec.process_mut();
        process.user.username = resolved.user;
        process.terminal = service.tty;
        process.args = resolved.args;
        process.cwd = resolved.cwd;
        process.env = resolved.env;
        spec
    }

    /// Decodes a raw exec state, merges it with the service and returns the
    /// serialized spec.
    ///
    /// # Errors
    ///
    /// Returns [`RuncgenError::Decode`] if `raw` is malformed, or
    /// [`RuncgenError::Encode`] if the spec cannot be serialized. No partial
    /// spec is produced in either case.
    pub fn build(
        &self,
        service: &ServiceDefinition,
        platform: Option<&Platform>,
        raw: &[u8],
    ) -> Result<Vec<u8>> {
        let exec = ExecState::decode(&service.name, platform, raw)?;
        let spec = self.assemble(service, &exec, platform);
        spec.to_json_pretty().map_err(|source| RuncgenError::Encode {
            service: service.name.clone(),
            platform: platform
                .map_or(DEFAULT_PLATFORM_SEGMENT, Platform::as_str)
                .to_string(),
            source,
        })
    }
}
