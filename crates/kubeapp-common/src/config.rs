//! Engine configuration model.

use serde::{Deserialize, Serialize};

use crate::types::KubeTypeId;

/// How the filler treats a field that has neither a caller value nor a default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Fail with [`KubeAppError::MissingValue`](crate::error::KubeAppError::MissingValue).
    #[default]
    Reject,
    /// Substitute the literal text `undefined`.
    Literal,
}

/// Root configuration for an app engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Kube type assigned to packages that do not declare one.
    pub default_kube_type: KubeTypeId,
    /// Treatment of fields left without a value.
    pub missing_value: MissingValuePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_kube_type: KubeTypeId::new(crate::constants::DEFAULT_KUBE_TYPE),
            missing_value: MissingValuePolicy::default(),
        }
    }
}
