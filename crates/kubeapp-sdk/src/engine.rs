//! The app engine: one template, its fields, and a billing catalog.

use kubeapp_common::config::{EngineConfig, MissingValuePolicy};
use kubeapp_common::error::Result;
use kubeapp_common::types::UserPackage;
use kubeapp_package::apply::apply_package;
use kubeapp_package::defaults::fill_with_defaults;
use kubeapp_package::package::{self, AppPackage, ResourcePackage};
use kubeapp_package::pod::{self, PodSpecView};
use kubeapp_package::pricing::{KubeTypeIndex, Totals, calculate_info};
use kubeapp_template::{Field, FieldValues, Template};
use rand::Rng;
use serde_yaml::Value;

/// Turns one parameterized template into priced pod documents.
///
/// Field defaults (including autogenerated tokens) are resolved once at
/// construction and stay fixed for the lifetime of the engine.
#[derive(Debug, Clone)]
pub struct AppEngine {
    template: Template,
    user_package: UserPackage,
    kube_types: KubeTypeIndex,
    config: EngineConfig,
    preview: Value,
    has_public_ports: bool,
}

impl AppEngine {
    /// Creates an engine, drawing autogen tokens from the thread RNG.
    ///
    /// # Errors
    ///
    /// Returns [`KubeAppError::TemplateParse`](kubeapp_common::error::KubeAppError::TemplateParse)
    /// if the template filled with its defaults is not valid YAML.
    pub fn new(
        template: impl Into<String>,
        user_package: UserPackage,
        config: EngineConfig,
    ) -> Result<Self> {
        Self::with_rng(template, user_package, config, &mut rand::thread_rng())
    }

    /// Creates an engine, drawing autogen tokens from `rng`.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_rng<R: Rng + ?Sized>(
        template: impl Into<String>,
        user_package: UserPackage,
        config: EngineConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let template = Template::parse(template, rng);
        let kube_types = KubeTypeIndex::new(&user_package.kubes);

        let probe = template.fill(&FieldValues::new(), MissingValuePolicy::Literal)?;
        let preview: Value = serde_yaml::from_str(&probe)?;
        let has_public_ports = pod::view(&preview).has_public_ports();

        tracing::info!(
            fields = template.fields().len(),
            kube_types = kube_types.len(),
            has_public_ports,
            "created app engine"
        );

        Ok(Self {
            template,
            user_package,
            kube_types,
            config,
            preview,
            has_public_ports,
        })
    }

    /// Fields in order of first occurrence, for rendering an edit form.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        self.template.fields().fields()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.template.fields().get(name)
    }

    /// Whether the template declares any public port.
    #[must_use]
    pub const fn has_public_ports(&self) -> bool {
        self.has_public_ports
    }

    /// The billing catalog.
    #[must_use]
    pub const fn user_package(&self) -> &UserPackage {
        &self.user_package
    }

    /// The engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fills the template with `values` over the field defaults.
    ///
    /// # Errors
    ///
    /// Returns [`KubeAppError::MissingValue`](kubeapp_common::error::KubeAppError::MissingValue)
    /// under the reject policy when a field is left without a value.
    pub fn fill(&self, values: &FieldValues) -> Result<String> {
        self.template.fill(values, self.config.missing_value)
    }

    /// Fills the template and parses it as YAML.
    ///
    /// # Errors
    ///
    /// Fails like [`fill`](Self::fill), or with
    /// [`KubeAppError::TemplateParse`](kubeapp_common::error::KubeAppError::TemplateParse)
    /// if the filled text is not valid YAML.
    pub fn parse(&self, values: &FieldValues) -> Result<Value> {
        let filled = self.fill(values)?;
        Ok(serde_yaml::from_str(&filled)?)
    }

    /// The containers and volumes of `doc`, or of the template filled with
    /// its defaults when `doc` is `None`.
    #[must_use]
    pub fn get_spec<'a>(&'a self, doc: Option<&'a Value>) -> PodSpecView<'a> {
        pod::view(doc.unwrap_or(&self.preview))
    }

    /// Identifiers of the packages the template declares.
    ///
    /// # Errors
    ///
    /// Fails like [`parse`](Self::parse).
    pub fn app_packages(&self, values: &FieldValues) -> Result<Vec<String>> {
        Ok(package::package_ids(&self.parse(values)?))
    }

    /// Completes `declared` with defaults from `doc`.
    #[must_use]
    pub fn fill_app_package_with_defaults(
        &self,
        declared: &AppPackage,
        doc: &Value,
    ) -> ResourcePackage {
        fill_with_defaults(declared, doc, self.config.default_kube_type)
    }

    /// Prices a resolved package against the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`KubeAppError::TierNotFound`](kubeapp_common::error::KubeAppError::TierNotFound)
    /// if the package's kube type is not in the catalog.
    pub fn calculate_info(&self, package: &ResourcePackage) -> Result<Totals> {
        calculate_info(
            package,
            &self.kube_types,
            &self.user_package,
            self.has_public_ports,
        )
    }

    /// Writes a resolved package into `doc`.
    ///
    /// # Errors
    ///
    /// Fails if the package has no pods or `doc` is not a mapping.
    pub fn apply_app_package(&self, doc: Value, package: &ResourcePackage) -> Result<Value> {
        apply_package(doc, package, self.has_public_ports)
    }

    /// Fills the template, selects package `package_id`, completes it, and
    /// returns the document with the package applied and the
    /// `appPackages` section removed.
    ///
    /// # Errors
    ///
    /// Returns [`KubeAppError::PackageNotFound`](kubeapp_common::error::KubeAppError::PackageNotFound)
    /// for an unknown package, plus any error from filling, parsing or
    /// applying.
    pub fn template_to_app(&self, package_id: &str, values: &FieldValues) -> Result<Value> {
        let (doc, package) = self.resolve_package(package_id, values)?;
        self.apply_app_package(doc, &package)
    }

    /// [`template_to_app`](Self::template_to_app) serialized back to YAML.
    ///
    /// # Errors
    ///
    /// Same as [`template_to_app`](Self::template_to_app).
    pub fn template_to_yaml(&self, package_id: &str, values: &FieldValues) -> Result<String> {
        let doc = self.template_to_app(package_id, values)?;
        Ok(serde_yaml::to_string(&doc)?)
    }

    /// Totals for package `package_id` as it would be applied.
    ///
    /// # Errors
    ///
    /// Fails like [`template_to_app`](Self::template_to_app) or
    /// [`calculate_info`](Self::calculate_info).
    pub fn price_package(&self, package_id: &str, values: &FieldValues) -> Result<Totals> {
        let (_, package) = self.resolve_package(package_id, values)?;
        self.calculate_info(&package)
    }

    fn resolve_package(
        &self,
        package_id: &str,
        values: &FieldValues,
    ) -> Result<(Value, ResourcePackage)> {
        tracing::info!(package = package_id, "resolving app package");
        let mut doc = self.parse(values)?;
        let declared = package::declared_package(&doc, package_id)?;
        let resolved = self.fill_app_package_with_defaults(&declared, &doc);
        package::strip_app_packages(&mut doc);
        Ok((doc, resolved))
    }
}

#[cfg(test)]
mod tests {
    use kubeapp_common::error::KubeAppError;
    use kubeapp_common::types::{KubeType, KubeTypeId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const TEMPLATE: &str = r"
apiVersion: v1
kind: ReplicationController
metadata:
  name: $APP_NAME|default:wordpress|App name$
kuberdock:
  appPackages:
    - name: S
      goodFor: up to 100 users
    - name: M
      publicIP: false
      pods:
        - kubeType: 1
          containers:
            - name: web
              kubes: 3
          persistentDisks:
            - name: data
              pdSize: 5
spec:
  template:
    spec:
      containers:
        - name: web
          env:
            - name: DB_PASSWORD
              value: $DB_PASSWORD|default:autogen|Database password$
          ports:
            - containerPort: 80
              isPublic: true
        - name: db
          env:
            - name: MYSQL_ROOT_PASSWORD
              value: $DB_PASSWORD$
      volumes:
        - name: data
          persistentDisk:
            pdName: $APP_NAME$-data
";

    fn catalog() -> UserPackage {
        let kube = |id, price| KubeType {
            id: KubeTypeId::new(id),
            name: String::new(),
            cpu: 0.25,
            cpu_units: "Cores".into(),
            memory: 128.0,
            memory_units: "MB".into(),
            disk_space: 1.0,
            disk_space_units: "GB".into(),
            price,
        };
        UserPackage {
            kubes: vec![kube(0, 1.0), kube(1, 2.0)],
            price_pstorage: 0.5,
            price_ip: 3.0,
            prefix: "$".into(),
            suffix: String::new(),
            period: "month".into(),
        }
    }

    fn engine() -> AppEngine {
        AppEngine::with_rng(
            TEMPLATE,
            catalog(),
            EngineConfig::default(),
            &mut StdRng::seed_from_u64(11),
        )
        .expect("engine")
    }

    #[test]
    fn engine_detects_public_ports() {
        assert!(engine().has_public_ports());
    }

    #[test]
    fn engine_lists_fields_in_order() {
        let engine = engine();
        let names: Vec<&str> = engine.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["APP_NAME", "DB_PASSWORD"]);
        assert!(engine.field("DB_PASSWORD").is_some_and(|f| f.hidden));
        assert_eq!(engine.field("DB_PASSWORD").map(|f| f.occurrences.len()), Some(2));
    }

    #[test]
    fn engine_keeps_catalog_and_config() {
        let config = EngineConfig {
            default_kube_type: KubeTypeId::new(1),
            missing_value: MissingValuePolicy::Literal,
        };
        let engine = AppEngine::with_rng(
            TEMPLATE,
            catalog(),
            config.clone(),
            &mut StdRng::seed_from_u64(5),
        )
        .expect("engine");
        assert_eq!(engine.user_package(), &catalog());
        assert_eq!(engine.config(), &config);
    }

    #[test]
    fn get_spec_defaults_to_preview() {
        let engine = engine();
        assert_eq!(engine.get_spec(None).container_names(), vec!["web", "db"]);
    }

    #[test]
    fn app_packages_lists_sequence_ids() {
        let ids = engine().app_packages(&FieldValues::new()).expect("ids");
        assert_eq!(ids, vec!["0", "1"]);
    }

    #[test]
    fn template_to_app_uses_defaults_for_sparse_package() {
        let engine = engine();
        let doc = engine.template_to_app("0", &FieldValues::new()).expect("app");
        assert_eq!(doc["metadata"]["name"].as_str(), Some("wordpress"));
        assert_eq!(doc["kuberdock"]["kube_type"].as_u64(), Some(0));
        assert!(doc["kuberdock"].get("appPackages").is_none());
        let spec = &doc["spec"]["template"]["spec"];
        assert_eq!(spec["containers"][0]["kubes"].as_u64(), Some(1));
        assert_eq!(spec["containers"][1]["kubes"].as_u64(), Some(1));
        assert_eq!(spec["volumes"][0]["persistentDisk"]["pdSize"].as_u64(), Some(1));
        assert_eq!(
            spec["volumes"][0]["persistentDisk"]["pdName"].as_str(),
            Some("wordpress-data")
        );
    }

    #[test]
    fn template_to_app_applies_declared_package() {
        let engine = engine();
        let mut values = FieldValues::new();
        let _ = values.insert("APP_NAME".into(), "blog".into());
        let doc = engine.template_to_app("1", &values).expect("app");
        assert_eq!(doc["metadata"]["name"].as_str(), Some("blog"));
        assert_eq!(doc["kuberdock"]["kube_type"].as_u64(), Some(1));
        let spec = &doc["spec"]["template"]["spec"];
        assert_eq!(spec["containers"][0]["kubes"].as_u64(), Some(3));
        assert_eq!(spec["containers"][0]["ports"][0]["isPublic"].as_bool(), Some(false));
        assert_eq!(spec["volumes"][0]["persistentDisk"]["pdSize"].as_u64(), Some(5));
    }

    #[test]
    fn autogen_value_is_shared_between_containers() {
        let doc = engine().template_to_app("0", &FieldValues::new()).expect("app");
        let containers = &doc["spec"]["template"]["spec"]["containers"];
        let web = containers[0]["env"][0]["value"].as_str().expect("web password");
        let db = containers[1]["env"][0]["value"].as_str().expect("db password");
        assert_eq!(web, db);
        assert_eq!(web.len(), 8);
    }

    #[test]
    fn unknown_package_fails() {
        let err = engine()
            .template_to_app("5", &FieldValues::new())
            .expect_err("no such package");
        assert!(matches!(err, KubeAppError::PackageNotFound { ref id } if id == "5"));
    }

    #[test]
    fn price_package_totals() {
        let engine = engine();
        let small = engine.price_package("0", &FieldValues::new()).expect("price");
        // 2 kubes * 1.0 + 1 GB * 0.5 + public IP 3.0
        assert!((small.price - 5.5).abs() < f64::EPSILON);
        let medium = engine.price_package("1", &FieldValues::new()).expect("price");
        // (3 + 1) kubes * 2.0 + 5 GB * 0.5, no public IP
        assert!((medium.price - 10.5).abs() < f64::EPSILON);
        assert!(!medium.public_ip);
    }

    #[test]
    fn invalid_yaml_after_fill_is_a_parse_error() {
        let engine = AppEngine::with_rng(
            "key: $V|default:ok$\n",
            catalog(),
            EngineConfig::default(),
            &mut StdRng::seed_from_u64(0),
        )
        .expect("engine");
        let mut values = FieldValues::new();
        let _ = values.insert("V".into(), "[unclosed".into());
        assert!(matches!(
            engine.parse(&values),
            Err(KubeAppError::TemplateParse { .. })
        ));
    }
}
