//! App package models and lookup.
//!
//! An [`AppPackage`] is what a template author writes under
//! `kuberdock.appPackages`: every field is optional. Filling it with
//! defaults yields a [`ResourcePackage`], which is what the applier and the
//! pricing calculator consume.

use kubeapp_common::error::{KubeAppError, Result};
use kubeapp_common::types::KubeTypeId;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

/// A kube count or disk size, coerced leniently from the document.
///
/// Integers pass through, non-negative floats are truncated, numeric
/// strings are parsed, and anything else counts as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Count(u64);

impl Count {
    /// Wraps a count.
    #[must_use]
    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    /// Returns the count.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_float(f: f64) -> u64 {
    if f.is_finite() && f >= 0.0 {
        f.trunc() as u64
    } else {
        0
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let n = match RawCount::deserialize(deserializer)? {
            RawCount::Unsigned(n) => n,
            RawCount::Float(f) if f.fract() == 0.0 => coerce_float(f),
            RawCount::Float(f) => {
                tracing::warn!(value = f, "fractional count truncated");
                coerce_float(f)
            }
            RawCount::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<u64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().map(coerce_float))
                    .unwrap_or_else(|| {
                        tracing::warn!(value = %s, "non-numeric count treated as 0");
                        0
                    })
            }
            RawCount::Signed(_) | RawCount::Other(_) => {
                tracing::warn!("non-numeric or negative count treated as 0");
                0
            }
        };
        Ok(Self(n))
    }
}

/// A package as declared in the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppPackage {
    /// Display name.
    pub name: Option<String>,
    /// Short description of the intended workload.
    #[serde(rename = "goodFor", default, deserialize_with = "lenient_text")]
    pub good_for: Option<String>,
    /// Whether the package includes a public IP. Only a boolean `false`
    /// drops it.
    #[serde(rename = "publicIP", default, deserialize_with = "lenient_flag")]
    pub public_ip: Option<bool>,
    /// Pod plans; only the first is used.
    pub pods: Option<Vec<AppPod>>,
}

fn lenient_flag<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::Null => None,
        other => {
            tracing::debug!(value = ?other, "non-boolean publicIP keeps the public IP");
            None
        }
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some(true.to_string()),
        _ => None,
    })
}

/// A pod plan as declared in the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppPod {
    /// Pod name.
    pub name: Option<String>,
    /// Kube type for every container in the pod.
    #[serde(rename = "kubeType")]
    pub kube_type: Option<KubeTypeId>,
    /// Per-container kube counts.
    pub containers: Option<Vec<AppContainer>>,
    /// Per-volume persistent disk sizes.
    #[serde(rename = "persistentDisks")]
    pub persistent_disks: Option<Vec<AppDisk>>,
}

/// A container entry as declared in the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppContainer {
    /// Container name.
    #[serde(default)]
    pub name: String,
    /// Kubes allotted to the container.
    pub kubes: Option<Count>,
}

/// A persistent disk entry as declared in the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppDisk {
    /// Volume name.
    #[serde(default)]
    pub name: String,
    /// Disk size.
    #[serde(rename = "pdSize")]
    pub pd_size: Option<Count>,
}

/// A fully defaulted package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePackage {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short description of the intended workload.
    #[serde(rename = "goodFor", default)]
    pub good_for: String,
    /// Whether the package includes a public IP.
    #[serde(rename = "publicIP")]
    pub public_ip: bool,
    /// Pod plans; only the first is used.
    pub pods: Vec<PodPlan>,
}

impl ResourcePackage {
    /// The pod plan the package applies.
    ///
    /// # Errors
    ///
    /// Returns [`KubeAppError::InvalidPackage`] if the package has no pods.
    pub fn pod(&self) -> Result<&PodPlan> {
        self.pods.first().ok_or_else(|| KubeAppError::InvalidPackage {
            message: "package declares no pods".into(),
        })
    }
}

/// A fully defaulted pod plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodPlan {
    /// Pod name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Kube type for every container in the pod.
    pub kube_type: KubeTypeId,
    /// Per-container kube counts.
    #[serde(default)]
    pub containers: Vec<ContainerPlan>,
    /// Per-volume persistent disk sizes.
    #[serde(default)]
    pub persistent_disks: Vec<DiskPlan>,
}

/// Kubes allotted to one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerPlan {
    /// Container name.
    pub name: String,
    /// Kube count.
    pub kubes: u64,
}

/// Persistent disk size for one volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskPlan {
    /// Volume name.
    pub name: String,
    /// Disk size.
    pub pd_size: u64,
}

fn app_packages(doc: &Value) -> Option<&Value> {
    doc.get("kuberdock")?.get("appPackages")
}

fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Identifiers of the packages declared by a document, in document order.
///
/// `appPackages` may be a mapping keyed by id or a sequence indexed by
/// position.
pub fn package_ids(doc: &Value) -> Vec<String> {
    match app_packages(doc) {
        Some(Value::Mapping(map)) => map.keys().filter_map(key_text).collect(),
        Some(Value::Sequence(seq)) => (0..seq.len()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    }
}

/// Finds the raw declaration of package `id`.
///
/// # Errors
///
/// Returns [`KubeAppError::PackageNotFound`] if the document declares no
/// such package.
pub fn find_package<'a>(doc: &'a Value, id: &str) -> Result<&'a Value> {
    let found = match app_packages(doc) {
        Some(Value::Mapping(map)) => map
            .iter()
            .find(|(key, _)| key_text(key).as_deref() == Some(id))
            .map(|(_, value)| value),
        Some(Value::Sequence(seq)) => id.trim().parse::<usize>().ok().and_then(|i| seq.get(i)),
        _ => None,
    };
    found.ok_or_else(|| KubeAppError::PackageNotFound { id: id.to_owned() })
}

/// Finds and deserializes package `id`.
///
/// # Errors
///
/// Returns [`KubeAppError::PackageNotFound`] for an unknown id and
/// [`KubeAppError::InvalidPackage`] when the declaration does not match the
/// package model.
pub fn declared_package(doc: &Value, id: &str) -> Result<AppPackage> {
    let raw = find_package(doc, id)?;
    if raw.is_null() {
        return Ok(AppPackage::default());
    }
    serde_yaml::from_value(raw.clone()).map_err(|e| KubeAppError::InvalidPackage {
        message: format!("package {id}: {e}"),
    })
}

/// Removes the `kuberdock.appPackages` scaffolding from a document.
pub fn strip_app_packages(doc: &mut Value) {
    if let Some(Value::Mapping(kuberdock)) = doc.get_mut("kuberdock") {
        let _ = kuberdock.remove("appPackages");
    }
}
