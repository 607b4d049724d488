//! The `{containers, volumes}` projection of a pod document.
//!
//! Pods keep their containers under `spec`; replication controllers nest
//! them one level deeper under `spec.template.spec`. A document without a
//! `spec` is treated as the pod spec itself.

use serde_yaml::Value;

const EMPTY: &[Value] = &[];

/// Borrowed view of the containers and volumes of a pod document.
#[derive(Debug, Clone, Copy)]
pub struct PodSpecView<'a> {
    /// Container entries.
    pub containers: &'a [Value],
    /// Volume entries.
    pub volumes: &'a [Value],
}

impl<'a> PodSpecView<'a> {
    /// Names of all containers, in document order.
    pub fn container_names(&self) -> Vec<&'a str> {
        names(self.containers)
    }

    /// Names of all volumes, in document order.
    pub fn volume_names(&self) -> Vec<&'a str> {
        names(self.volumes)
    }

    /// Whether any container declares a port with a truthy `isPublic`.
    pub fn has_public_ports(&self) -> bool {
        self.containers
            .iter()
            .filter_map(|c| c.get("ports").and_then(Value::as_sequence))
            .flatten()
            .any(|port| port.get("isPublic").is_some_and(is_truthy))
    }
}

fn names(entries: &[Value]) -> Vec<&str> {
    entries
        .iter()
        .filter_map(|e| e.get("name").and_then(Value::as_str))
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn spec_path(doc: &Value) -> &'static [&'static str] {
    match doc.get("spec") {
        Some(spec) if spec.get("template").is_some() => &["spec", "template", "spec"],
        Some(_) => &["spec"],
        None => &[],
    }
}

/// The mapping that holds `containers` and `volumes`.
pub fn pod_spec(doc: &Value) -> Option<&Value> {
    spec_path(doc)
        .iter()
        .try_fold(doc, |node, key| node.get(*key))
}

/// Mutable access to the mapping that holds `containers` and `volumes`.
pub fn pod_spec_mut(doc: &mut Value) -> Option<&mut Value> {
    let path = spec_path(doc);
    path.iter().try_fold(doc, |node, key| node.get_mut(*key))
}

/// Projects a document onto its containers and volumes.
pub fn view(doc: &Value) -> PodSpecView<'_> {
    let spec = pod_spec(doc);
    let list = |key: &str| {
        spec.and_then(|s| s.get(key))
            .and_then(Value::as_sequence)
            .map_or(EMPTY, Vec::as_slice)
    };
    PodSpecView {
        containers: list("containers"),
        volumes: list("volumes"),
    }
}

/// The pod's `metadata.name`.
pub fn pod_name(doc: &Value) -> Option<&str> {
    doc.get("metadata")?.get("name")?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).expect("valid yaml")
    }

    #[test]
    fn view_reads_plain_pod_spec() {
        let d = doc(
            r"
metadata:
  name: wordpress
spec:
  containers:
    - name: web
    - name: db
  volumes:
    - name: data
",
        );
        let v = view(&d);
        assert_eq!(v.container_names(), vec!["web", "db"]);
        assert_eq!(v.volume_names(), vec!["data"]);
        assert_eq!(pod_name(&d), Some("wordpress"));
    }

    #[test]
    fn view_unwraps_template_nesting() {
        let d = doc(
            r"
kind: ReplicationController
spec:
  replicas: 1
  template:
    spec:
      containers:
        - name: app
",
        );
        assert_eq!(view(&d).container_names(), vec!["app"]);
    }

    #[test]
    fn view_falls_back_to_root() {
        let d = doc("containers:\n  - name: solo\n");
        assert_eq!(view(&d).container_names(), vec!["solo"]);
        assert!(view(&d).volumes.is_empty());
    }

    #[test]
    fn view_of_scalar_document_is_empty() {
        let d = doc("just text");
        assert!(view(&d).containers.is_empty());
        assert_eq!(pod_name(&d), None);
    }

    #[test]
    fn public_ports_detected() {
        let with = doc(
            r"
spec:
  containers:
    - name: web
      ports:
        - containerPort: 80
          isPublic: true
",
        );
        let without = doc(
            r"
spec:
  containers:
    - name: web
      ports:
        - containerPort: 80
          isPublic: false
        - containerPort: 81
",
        );
        assert!(view(&with).has_public_ports());
        assert!(!view(&without).has_public_ports());
    }

    #[test]
    fn pod_spec_mut_reaches_nested_spec() {
        let mut d = doc("spec:\n  template:\n    spec:\n      containers: []\n");
        let spec = pod_spec_mut(&mut d).expect("spec");
        assert!(spec.get("containers").is_some());
    }
}
