//! # runcgen-compose
//!
//! In-memory model of a multi-service compose project.
//!
//! Handles:
//! - **Model**: service definitions and the project that groups them.
//! - **Graph**: `depends_on` ordering so services are visited dependencies first.
//!
//! Reading compose files from disk is left to the caller; this crate only
//! describes the already-parsed project.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod graph;
pub mod model;

pub use model::{Project, ServiceDefinition};
