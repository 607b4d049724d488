//! Catalog types supplied by the hosting application.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a kube type (resource tier).
///
/// Accepts an integer or a numeric string on input and always serializes
/// as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct KubeTypeId(u64);

impl KubeTypeId {
    /// Creates a kube type identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for KubeTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for KubeTypeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Ok(Self(n)),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map(Self)
                .map_err(|_| D::Error::custom(format!("invalid kube type id: {s:?}"))),
        }
    }
}

/// A resource tier: the per-kube allotment and its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KubeType {
    /// Tier identifier.
    pub id: KubeTypeId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// CPU per kube.
    pub cpu: f64,
    /// CPU unit suffix.
    #[serde(default)]
    pub cpu_units: String,
    /// Memory per kube.
    pub memory: f64,
    /// Memory unit suffix.
    #[serde(default)]
    pub memory_units: String,
    /// Local disk per kube.
    pub disk_space: f64,
    /// Disk unit suffix.
    #[serde(default)]
    pub disk_space_units: String,
    /// Price per kube per billing period.
    pub price: f64,
}

/// A billing package: kube type catalog plus storage and IP pricing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPackage {
    /// Kube types offered by this package.
    #[serde(default)]
    pub kubes: Vec<KubeType>,
    /// Price per persistent disk unit.
    #[serde(default)]
    pub price_pstorage: f64,
    /// Price of one public IP.
    #[serde(default)]
    pub price_ip: f64,
    /// Currency prefix, e.g. `$`.
    #[serde(default)]
    pub prefix: String,
    /// Currency suffix, e.g. `USD`.
    #[serde(default)]
    pub suffix: String,
    /// Billing period label, e.g. `month`.
    #[serde(default)]
    pub period: String,
}
