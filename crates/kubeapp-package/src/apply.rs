//! Writing a resolved package into a pod document.

use std::collections::HashMap;

use kubeapp_common::error::{KubeAppError, Result};
use kubeapp_common::types::KubeTypeId;
use serde_yaml::{Mapping, Value};

use crate::package::ResourcePackage;
use crate::pod;

/// Applies `package` to `doc` and returns the updated document.
///
/// Sets `kuberdock.kube_type`, each container's `kubes` and each
/// persistent disk's `pdSize` by name. Entries without a match in the
/// package lose the key. When the package drops its public IP and the
/// template declares public ports, every port is made private; no port is
/// ever made public here.
///
/// # Errors
///
/// Returns [`KubeAppError::InvalidPackage`] if the package has no pods and
/// [`KubeAppError::InvalidDocument`] if `doc` or its `kuberdock` section is
/// not a mapping.
pub fn apply_package(
    mut doc: Value,
    package: &ResourcePackage,
    has_public_ports: bool,
) -> Result<Value> {
    let plan = package.pod()?;
    set_kube_type(&mut doc, plan.kube_type)?;

    let kubes = first_by_name(plan.containers.iter().map(|c| (c.name.as_str(), c.kubes)));
    let disks = first_by_name(
        plan.persistent_disks
            .iter()
            .map(|d| (d.name.as_str(), d.pd_size)),
    );
    let revoke_public = !package.public_ip && has_public_ports;

    if let Some(spec) = pod::pod_spec_mut(&mut doc) {
        for container in sequence_mut(spec, "containers") {
            let count = lookup(container, &kubes);
            set_or_remove(container, "kubes", count);
            if revoke_public {
                make_ports_private(container);
            }
        }
        for volume in sequence_mut(spec, "volumes") {
            let size = lookup(volume, &disks);
            if let Some(disk) = volume.get_mut("persistentDisk") {
                set_or_remove(disk, "pdSize", size);
            }
        }
    }

    tracing::debug!(kube_type = %plan.kube_type, revoke_public, "applied app package");
    Ok(doc)
}

fn set_kube_type(doc: &mut Value, kube_type: KubeTypeId) -> Result<()> {
    let Value::Mapping(root) = doc else {
        return Err(KubeAppError::InvalidDocument {
            message: "document root is not a mapping".into(),
        });
    };
    if !root.contains_key("kuberdock") {
        let _ = root.insert("kuberdock".into(), Value::Mapping(Mapping::new()));
    }
    match root.get_mut("kuberdock") {
        Some(Value::Mapping(kuberdock)) => {
            let _ = kuberdock.insert("kube_type".into(), Value::Number(kube_type.get().into()));
            Ok(())
        }
        _ => Err(KubeAppError::InvalidDocument {
            message: "kuberdock section is not a mapping".into(),
        }),
    }
}

fn sequence_mut<'a>(spec: &'a mut Value, key: &str) -> impl Iterator<Item = &'a mut Value> {
    spec.get_mut(key)
        .and_then(Value::as_sequence_mut)
        .into_iter()
        .flatten()
}

/// Indexes entries by name; the first entry of a repeated name wins.
fn first_by_name<'a>(entries: impl Iterator<Item = (&'a str, u64)>) -> HashMap<&'a str, u64> {
    let mut by_name = HashMap::new();
    for (name, value) in entries {
        let _ = by_name.entry(name).or_insert(value);
    }
    by_name
}

fn lookup(entry: &Value, by_name: &HashMap<&str, u64>) -> Option<u64> {
    let name = entry.get("name").and_then(Value::as_str)?;
    by_name.get(name).copied()
}

fn set_or_remove(entry: &mut Value, key: &str, value: Option<u64>) {
    let Value::Mapping(map) = entry else {
        return;
    };
    match value {
        Some(n) => {
            let _ = map.insert(key.into(), Value::Number(n.into()));
        }
        None => {
            let _ = map.remove(key);
        }
    }
}

fn make_ports_private(container: &mut Value) {
    for port in sequence_mut(container, "ports") {
        if let Value::Mapping(port) = port {
            let _ = port.insert("isPublic".into(), Value::Bool(false));
        }
    }
}
