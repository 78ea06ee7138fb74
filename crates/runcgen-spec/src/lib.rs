//! # runcgen-spec
//!
//! Compiles compose services into OCI runtime specs.
//!
//! Data flows strictly upward through three layers:
//! - [`resolve`]: picks one effective value for each attribute that both the
//!   service definition and the exec state can provide.
//! - [`builder`]: assembles and serializes one [`oci::RuntimeSpec`] per service.
//! - [`compile`]: walks a whole project and produces one spec per
//!   (service, platform) pair, failing the batch on the first error.
//!
//! Only process-level attributes are translated. Host-level container
//! settings (ports, mounts, DNS, capabilities, restart policy) are not.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod builder;
pub mod compile;
pub mod exec;
pub mod oci;
pub mod resolve;

pub use builder::SpecBuilder;
pub use compile::{CompiledSpecs, compile, planned_keys};
pub use exec::{ExecConfigs, ExecState, PlatformConfig};
