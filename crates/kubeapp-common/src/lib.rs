//! # kubeapp-common
//!
//! Shared error definitions, engine configuration, catalog types, and
//! constants used across the entire kubeapp workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and provides the primitives the template and package
//! layers build upon.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
