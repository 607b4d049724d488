//! # kubeapp-package
//!
//! Reconciles the app packages declared by a filled template with its pod
//! document and prices the result.
//!
//! Handles:
//! - **Package**: Declared (sparse) and resolved package models.
//! - **Pod**: The `{containers, volumes}` projection of a pod document.
//! - **Defaults**: Completing a declared package from the pod document.
//! - **Apply**: Writing a resolved package into the pod document.
//! - **Pricing**: Resource and price totals for a resolved package.

pub mod apply;
pub mod defaults;
pub mod package;
pub mod pod;
pub mod pricing;
