//! Unified error types for the runcgen workspace.
//!
//! Field resolution is total, so every variant here comes from one of three
//! places: decoding an exec state, encoding a runtime spec, or ordering the
//! services of a project.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum RuncgenError {
    /// A raw exec-state blob does not match the expected structure.
    #[error("cannot decode exec config for service \"{service}\" ({platform}): {source}")]
    Decode {
        /// Service whose configuration failed to decode.
        service: String,
        /// Platform segment of the offending configuration.
        platform: String,
        /// Underlying decoding error.
        source: serde_json::Error,
    },

    /// An assembled runtime spec could not be serialized.
    #[error("cannot encode runtime spec for service \"{service}\" ({platform}): {source}")]
    Encode {
        /// Service whose spec failed to encode.
        service: String,
        /// Platform segment of the offending configuration.
        platform: String,
        /// Underlying encoding error.
        source: serde_json::Error,
    },

    /// The `depends_on` relations of the project form a cycle.
    #[error("cyclic dependency detected between services: {services:?}")]
    CyclicDependency {
        /// Services that could not be ordered.
        services: Vec<String>,
    },

    /// Two services of the project share a name.
    #[error("duplicate service name: \"{service}\"")]
    DuplicateService {
        /// The repeated name.
        service: String,
    },

    /// A service depends on a service that is not part of the project.
    #[error("service \"{service}\" depends on undefined service \"{dependency}\"")]
    UnknownDependency {
        /// Service declaring the dependency.
        service: String,
        /// Name of the missing dependency.
        dependency: String,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RuncgenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_names_service_and_platform() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RuncgenError::Decode {
            service: "web".into(),
            platform: "linux/amd64".into(),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("\"web\""), "got: {msg}");
        assert!(msg.contains("linux/amd64"), "got: {msg}");
    }

    #[test]
    fn duplicate_service_message() {
        let err = RuncgenError::DuplicateService {
            service: "web".into(),
        };
        assert_eq!(err.to_string(), "duplicate service name: \"web\"");
    }

    #[test]
    fn unknown_dependency_message() {
        let err = RuncgenError::UnknownDependency {
            service: "api".into(),
            dependency: "db".into(),
        };
        assert_eq!(
            err.to_string(),
            "service \"api\" depends on undefined service \"db\""
        );
    }
}
