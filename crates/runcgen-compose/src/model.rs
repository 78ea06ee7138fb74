//! Service definitions and the project that owns them.

use std::collections::{BTreeMap, HashMap};

use runcgen_common::error::{Result, RuncgenError};
use runcgen_common::types::ProjectName;
use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;

/// Declarative configuration of one service.
///
/// Empty strings and an empty `command` mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDefinition {
    /// Service name, unique within its project.
    pub name: String,
    /// Image reference. Informational only.
    pub image: String,
    /// Container hostname.
    pub hostname: String,
    /// NIS domain name, applied through the `kernel.domainname` sysctl.
    pub domainname: String,
    /// Command tokens overriding the exec-state command.
    pub command: Vec<String>,
    /// Working directory of the main process.
    pub working_dir: String,
    /// User the main process runs as.
    pub user: String,
    /// Whether the process gets a terminal.
    pub tty: bool,
    /// Environment overrides. `None` marks a variable present without a value.
    pub environment: BTreeMap<String, Option<String>>,
    /// Free-form labels.
    pub labels: BTreeMap<String, String>,
    /// Services that must be visited before this one.
    pub depends_on: Vec<String>,
}

impl ServiceDefinition {
    /// Creates an otherwise empty definition with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A named collection of services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    /// Project identity, stamped on every service's labels.
    pub name: ProjectName,
    /// Services in declaration order.
    pub services: Vec<ServiceDefinition>,
}

impl Project {
    /// Creates a project from a name and its services.
    #[must_use]
    pub fn new(name: impl Into<String>, services: Vec<ServiceDefinition>) -> Self {
        Self {
            name: ProjectName::new(name),
            services,
        }
    }

    /// Looks up a service by name.
    #[must_use]
    pub fn service(&self, name: &str) -> Option<&ServiceDefinition> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Returns every service exactly once, dependencies before dependents.
    ///
    /// Independent services keep their declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if two services share a name, a `depends_on` entry
    /// names an unknown service, or the dependencies form a cycle.
    pub fn services_in_dependency_order(&self) -> Result<Vec<&ServiceDefinition>> {
        let mut graph = DependencyGraph::new();
        let mut nodes = HashMap::new();
        let mut indices = Vec::with_capacity(self.services.len());
        for service in &self.services {
            let idx = graph.add_service(&service.name);
            if nodes.insert(service.name.as_str(), idx).is_some() {
                return Err(RuncgenError::DuplicateService {
                    service: service.name.clone(),
                });
            }
            indices.push(idx);
        }

        for (service, &idx) in self.services.iter().zip(&indices) {
            for dep in &service.depends_on {
                let Some(&dep_idx) = nodes.get(dep.as_str()) else {
                    return Err(RuncgenError::UnknownDependency {
                        service: service.name.clone(),
                        dependency: dep.clone(),
                    });
                };
                graph.add_dependency(idx, dep_idx);
            }
        }

        let order: Vec<&ServiceDefinition> = graph
            .resolve_order()?
            .into_iter()
            .filter_map(|idx| self.services.get(idx.index()))
            .collect();
        tracing::debug!(
            project = %self.name,
            order = ?order.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            "resolved service order"
        );
        Ok(order)
    }
}
