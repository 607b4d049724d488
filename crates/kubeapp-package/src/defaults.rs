//! Completing a declared package from the pod document.
//!
//! Declared container and disk entries keep their position and get a
//! count of 1 when they omit one. Containers and volumes present in the
//! pod but not declared are appended with a count of 1. Declared entries
//! naming nothing in the pod are kept as they are.

use std::collections::HashMap;

use kubeapp_common::types::KubeTypeId;
use serde_yaml::Value;

use crate::package::{AppPackage, AppPod, ContainerPlan, Count, DiskPlan, PodPlan, ResourcePackage};
use crate::pod;

const DEFAULT_COUNT: u64 = 1;

/// Fills `declared` with defaults taken from `doc` and `default_kube_type`.
///
/// Only the first pod plan is completed; any further plans are carried
/// over with the same defaults applied to their own entries.
pub fn fill_with_defaults(
    declared: &AppPackage,
    doc: &Value,
    default_kube_type: KubeTypeId,
) -> ResourcePackage {
    let view = pod::view(doc);
    let pod_name = pod::pod_name(doc).map(str::to_owned);

    let declared_pods: &[AppPod] = declared.pods.as_deref().unwrap_or_default();
    let mut pods: Vec<PodPlan> = declared_pods
        .iter()
        .map(|p| PodPlan {
            name: p.name.clone(),
            kube_type: p.kube_type.unwrap_or(default_kube_type),
            containers: p
                .containers
                .iter()
                .flatten()
                .map(|c| ContainerPlan {
                    name: c.name.clone(),
                    kubes: count_or_default(c.kubes),
                })
                .collect(),
            persistent_disks: p
                .persistent_disks
                .iter()
                .flatten()
                .map(|d| DiskPlan {
                    name: d.name.clone(),
                    pd_size: count_or_default(d.pd_size),
                })
                .collect(),
        })
        .collect();

    if pods.is_empty() {
        pods.push(PodPlan {
            name: None,
            kube_type: default_kube_type,
            containers: Vec::new(),
            persistent_disks: Vec::new(),
        });
    }

    let first = &mut pods[0];
    first.name.clone_from(&pod_name);

    let containers = unmatched(
        first.containers.iter().map(|c| c.name.as_str()),
        view.container_names(),
    );
    first
        .containers
        .extend(containers.into_iter().map(|name| ContainerPlan {
            name: name.to_owned(),
            kubes: DEFAULT_COUNT,
        }));

    let volumes = unmatched(
        first.persistent_disks.iter().map(|d| d.name.as_str()),
        view.volume_names(),
    );
    first
        .persistent_disks
        .extend(volumes.into_iter().map(|name| DiskPlan {
            name: name.to_owned(),
            pd_size: DEFAULT_COUNT,
        }));

    tracing::debug!(
        kube_type = %first.kube_type,
        containers = first.containers.len(),
        disks = first.persistent_disks.len(),
        "filled app package defaults"
    );

    ResourcePackage {
        name: declared.name.clone(),
        good_for: declared.good_for.clone().unwrap_or_default(),
        public_ip: declared.public_ip != Some(false),
        pods,
    }
}

fn count_or_default(count: Option<Count>) -> u64 {
    count.map_or(DEFAULT_COUNT, Count::get)
}

/// Names in `present` not consumed by a declared entry of the same name.
///
/// Each declared name consumes at most one present name, so duplicate
/// names in the pod are matched one-for-one.
fn unmatched<'a, 'b>(
    declared: impl Iterator<Item = &'b str>,
    present: Vec<&'a str>,
) -> Vec<&'a str> {
    let mut claims: HashMap<&str, usize> = HashMap::new();
    for name in declared {
        *claims.entry(name).or_default() += 1;
    }
    present
        .into_iter()
        .filter(|name| match claims.get_mut(*name) {
            Some(n) if *n > 0 => {
                *n -= 1;
                false
            }
            _ => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{AppContainer, AppDisk};

    fn doc(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).expect("valid yaml")
    }

    fn two_container_pod() -> Value {
        doc(r"
metadata:
  name: blog
spec:
  containers:
    - name: a
    - name: b
  volumes:
    - name: data
      persistentDisk:
        pdName: blog-data
    - name: tmp
")
    }

    fn defaults(declared: &AppPackage, kube_type: u64) -> ResourcePackage {
        fill_with_defaults(declared, &two_container_pod(), KubeTypeId::new(kube_type))
    }

    fn container(name: &str, kubes: u64) -> ContainerPlan {
        ContainerPlan {
            name: name.into(),
            kubes,
        }
    }

    fn disk(name: &str, pd_size: u64) -> DiskPlan {
        DiskPlan {
            name: name.into(),
            pd_size,
        }
    }

    #[test]
    fn empty_package_gets_full_defaults() {
        let pkg = defaults(&AppPackage::default(), 0);
        assert_eq!(pkg.good_for, "");
        assert!(pkg.public_ip);
        assert_eq!(pkg.pods.len(), 1);
        let pod = &pkg.pods[0];
        assert_eq!(pod.kube_type, KubeTypeId::new(0));
        assert_eq!(pod.name.as_deref(), Some("blog"));
        assert_eq!(pod.containers, vec![container("a", 1), container("b", 1)]);
        assert_eq!(pod.persistent_disks, vec![disk("data", 1), disk("tmp", 1)]);
    }

    #[test]
    fn declared_entries_come_first() {
        let declared = AppPackage {
            pods: Some(vec![AppPod {
                containers: Some(vec![AppContainer {
                    name: "a".into(),
                    kubes: Some(Count::new(3)),
                }]),
                ..AppPod::default()
            }]),
            ..AppPackage::default()
        };
        let pkg = defaults(&declared, 0);
        assert_eq!(
            pkg.pods[0].containers,
            vec![container("a", 3), container("b", 1)]
        );
    }

    #[test]
    fn unmatched_declarations_are_retained() {
        let declared = AppPackage {
            pods: Some(vec![AppPod {
                containers: Some(vec![AppContainer {
                    name: "ghost".into(),
                    kubes: None,
                }]),
                persistent_disks: Some(vec![AppDisk {
                    name: "data".into(),
                    pd_size: Some(Count::new(20)),
                }]),
                ..AppPod::default()
            }]),
            ..AppPackage::default()
        };
        let pkg = defaults(&declared, 0);
        let names: Vec<&str> = pkg.pods[0]
            .containers
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["ghost", "a", "b"]);
        assert_eq!(pkg.pods[0].containers[0].kubes, 1);
        assert_eq!(
            pkg.pods[0].persistent_disks,
            vec![disk("data", 20), disk("tmp", 1)]
        );
    }

    #[test]
    fn explicit_settings_survive() {
        let declared = AppPackage {
            good_for: Some("testing".into()),
            public_ip: Some(false),
            pods: Some(vec![AppPod {
                kube_type: Some(KubeTypeId::new(2)),
                name: Some("ignored".into()),
                ..AppPod::default()
            }]),
            ..AppPackage::default()
        };
        let pkg = defaults(&declared, 0);
        assert_eq!(pkg.good_for, "testing");
        assert!(!pkg.public_ip);
        assert_eq!(pkg.pods[0].kube_type, KubeTypeId::new(2));
        assert_eq!(pkg.pods[0].name.as_deref(), Some("blog"));
    }

    #[test]
    fn default_kube_type_comes_from_caller() {
        let pkg = defaults(&AppPackage::default(), 5);
        assert_eq!(pkg.pods[0].kube_type, KubeTypeId::new(5));
    }

    #[test]
    fn declared_package_is_not_modified() {
        let declared = AppPackage {
            pods: Some(vec![AppPod::default()]),
            ..AppPackage::default()
        };
        let before = declared.clone();
        let _ = defaults(&declared, 0);
        assert_eq!(declared, before);
    }

    #[test]
    fn duplicate_names_match_one_for_one() {
        let left = unmatched(["a"].into_iter(), vec!["a", "a", "b"]);
        assert_eq!(left, vec!["a", "b"]);
    }
}
