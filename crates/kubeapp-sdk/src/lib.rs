//! # kubeapp-sdk
//!
//! Public SDK for turning a parameterized app template into a concrete,
//! priced pod specification.
//!
//! The entry point is [`AppEngine`](engine::AppEngine): it owns one
//! template, resolves its fields once, and exposes the fill, default,
//! apply, and pricing steps individually as well as composed by
//! [`template_to_app`](engine::AppEngine::template_to_app).
//!
//! # Example
//!
//! ```rust,no_run
//! use kubeapp_common::config::EngineConfig;
//! use kubeapp_common::types::UserPackage;
//! use kubeapp_sdk::engine::AppEngine;
//! use kubeapp_template::FieldValues;
//!
//! # fn run(template: &str, catalog: UserPackage) -> kubeapp_common::error::Result<()> {
//! let engine = AppEngine::new(template, catalog, EngineConfig::default())?;
//! let mut values = FieldValues::new();
//! let _ = values.insert("APP_NAME".into(), "blog".into());
//! let pod = engine.template_to_app("0", &values)?;
//! # let _ = pod;
//! # Ok(())
//! # }
//! ```

pub mod engine;

pub use engine::AppEngine;
