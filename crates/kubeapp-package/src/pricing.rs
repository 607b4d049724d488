//! Resource and price totals for a resolved package.

use std::collections::HashMap;

use kubeapp_common::constants::{NBSP, PERSISTENT_DISK_UNITS};
use kubeapp_common::error::{KubeAppError, Result};
use kubeapp_common::types::{KubeType, KubeTypeId, UserPackage};
use serde::Serialize;

use crate::package::ResourcePackage;

/// Kube types indexed by id.
#[derive(Debug, Clone, Default)]
pub struct KubeTypeIndex {
    by_id: HashMap<KubeTypeId, KubeType>,
}

impl KubeTypeIndex {
    /// Indexes a kube type list. Later entries win on duplicate ids.
    #[must_use]
    pub fn new(kube_types: &[KubeType]) -> Self {
        Self {
            by_id: kube_types.iter().map(|k| (k.id, k.clone())).collect(),
        }
    }

    /// Looks up a kube type.
    ///
    /// # Errors
    ///
    /// Returns [`KubeAppError::TierNotFound`] for an unknown id.
    pub fn get(&self, id: KubeTypeId) -> Result<&KubeType> {
        self.by_id
            .get(&id)
            .ok_or_else(|| KubeAppError::TierNotFound { id: id.to_string() })
    }

    /// Number of indexed kube types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Display strings for [`Totals`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedTotals {
    /// CPU with two decimals and units.
    pub cpu: String,
    /// Memory rounded with units.
    pub memory: String,
    /// Local disk rounded with units.
    pub disk_space: String,
    /// Persistent disk rounded with units.
    pub total_pd: String,
    /// Price with two decimals between the currency prefix and suffix.
    pub price: String,
}

/// Aggregate resources and price of a package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    /// Kube type the totals were computed for.
    pub kube_type: KubeTypeId,
    /// Sum of kubes over all containers.
    pub total_kubes: u64,
    /// Sum of persistent disk sizes.
    pub total_pd: u64,
    /// Total CPU.
    pub cpu: f64,
    /// Total memory.
    pub memory: f64,
    /// Total local disk.
    pub disk_space: f64,
    /// Whether a public IP is billed.
    pub public_ip: bool,
    /// Total price per period.
    pub price: f64,
    /// Billing period label.
    pub period: String,
    /// Display strings.
    pub formatted: FormattedTotals,
}

/// Computes the totals for `package`.
///
/// A public IP is billed only when the package keeps it and the template
/// declares public ports.
///
/// # Errors
///
/// Returns [`KubeAppError::TierNotFound`] if the package's kube type is not
/// in `kube_types`, and [`KubeAppError::InvalidPackage`] if it has no pods.
#[allow(clippy::cast_precision_loss)]
pub fn calculate_info(
    package: &ResourcePackage,
    kube_types: &KubeTypeIndex,
    user_package: &UserPackage,
    has_public_ports: bool,
) -> Result<Totals> {
    let plan = package.pod()?;
    let kube = kube_types.get(plan.kube_type)?;

    let total_kubes: u64 = plan.containers.iter().map(|c| c.kubes).sum();
    let total_pd: u64 = plan.persistent_disks.iter().map(|d| d.pd_size).sum();
    let public_ip = package.public_ip && has_public_ports;

    let kubes = total_kubes as f64;
    let cpu = kubes * kube.cpu;
    let memory = kubes * kube.memory;
    let disk_space = kubes * kube.disk_space;
    let ip_count = if public_ip { 1.0 } else { 0.0 };
    let price = kube.price * kubes
        + user_package.price_pstorage * total_pd as f64
        + user_package.price_ip * ip_count;

    tracing::debug!(
        kube_type = %plan.kube_type,
        total_kubes,
        total_pd,
        public_ip,
        price,
        "calculated package totals"
    );

    Ok(Totals {
        kube_type: plan.kube_type,
        total_kubes,
        total_pd,
        cpu,
        memory,
        disk_space,
        public_ip,
        price,
        period: user_package.period.clone(),
        formatted: FormattedTotals {
            cpu: with_units(format!("{cpu:.2}"), &kube.cpu_units),
            memory: with_units(format!("{:.0}", memory.round()), &kube.memory_units),
            disk_space: with_units(format!("{:.0}", disk_space.round()), &kube.disk_space_units),
            total_pd: with_units(total_pd.to_string(), PERSISTENT_DISK_UNITS),
            price: format_price(price, user_package),
        },
    })
}

fn with_units(value: String, units: &str) -> String {
    if units.is_empty() {
        value
    } else {
        format!("{value} {units}")
    }
}

/// Formats `price` with two decimals between the package's currency
/// prefix and suffix, separated by non-breaking spaces.
pub fn format_price(price: f64, user_package: &UserPackage) -> String {
    let amount = format!("{price:.2}");
    [user_package.prefix.as_str(), amount.as_str(), user_package.suffix.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(NBSP)
}
