//! CLI command definitions and dispatch.

pub mod fields;
pub mod fill;
pub mod price;
pub mod render;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use kubeapp_common::config::{EngineConfig, MissingValuePolicy};
use kubeapp_common::constants::BIN_NAME;
use kubeapp_common::error::KubeAppError;
use kubeapp_common::types::{KubeTypeId, UserPackage};
use kubeapp_sdk::AppEngine;
use kubeapp_template::FieldValues;

/// kapp — Turn parameterized app templates into priced pod specifications.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Kube type for packages that do not declare one.
    #[arg(long, global = true, env = "KAPP_DEFAULT_KUBE_TYPE", default_value_t = 0)]
    pub default_kube_type: u64,

    /// Substitute `undefined` for fields left without a value instead of failing.
    #[arg(long, global = true)]
    pub allow_missing: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the fields a template exposes.
    Fields(fields::FieldsArgs),
    /// Print the template filled with defaults and supplied values.
    Fill(fill::FillArgs),
    /// Print the finished pod specification for one app package.
    Render(render::RenderArgs),
    /// Print the resource and price totals for app packages.
    Price(price::PriceArgs),
}

/// Template input shared by every subcommand.
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Path to the template file.
    pub template: PathBuf,

    /// Field value as NAME=VALUE (repeatable).
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub values: Vec<(String, String)>,

    /// Path to the billing catalog (YAML or JSON).
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

impl TemplateArgs {
    /// Collected `--set` values; later assignments win.
    pub fn field_values(&self) -> FieldValues {
        self.values.iter().cloned().collect()
    }
}

/// Global settings forwarded to the engine.
#[derive(Debug, Clone, Copy)]
pub struct GlobalOpts {
    default_kube_type: u64,
    allow_missing: bool,
}

impl GlobalOpts {
    fn config(self) -> EngineConfig {
        EngineConfig {
            default_kube_type: KubeTypeId::new(self.default_kube_type),
            missing_value: if self.allow_missing {
                MissingValuePolicy::Literal
            } else {
                MissingValuePolicy::Reject
            },
        }
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let opts = GlobalOpts {
        default_kube_type: cli.default_kube_type,
        allow_missing: cli.allow_missing,
    };
    match cli.command {
        Command::Fields(args) => fields::execute(&args, opts),
        Command::Fill(args) => fill::execute(&args, opts),
        Command::Render(args) => render::execute(&args, opts),
        Command::Price(args) => price::execute(&args, opts),
    }
}

/// Parses a `NAME=VALUE` assignment. The value may contain `=`.
fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_owned(), value.to_owned())),
        _ => Err(format!("expected NAME=VALUE, got \"{raw}\"")),
    }
}

fn read_file(path: &Path) -> Result<String, KubeAppError> {
    std::fs::read_to_string(path).map_err(|source| KubeAppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a billing catalog, or an empty one when no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not describe a
/// catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<UserPackage, KubeAppError> {
    let Some(path) = path else {
        return Ok(UserPackage::default());
    };
    tracing::debug!(path = %path.display(), "loading billing catalog");
    let content = read_file(path)?;
    serde_yaml::from_str(&content).map_err(|e| KubeAppError::Config {
        message: format!("catalog {}: {e}", path.display()),
    })
}

/// Builds an engine for the template named by `args`.
///
/// # Errors
///
/// Returns an error if the template or catalog cannot be loaded, or the
/// template does not parse when filled with its defaults.
pub fn load_engine(args: &TemplateArgs, opts: GlobalOpts) -> anyhow::Result<AppEngine> {
    tracing::info!(path = %args.template.display(), "loading template");
    let template = read_file(&args.template)?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    Ok(AppEngine::new(template, catalog, opts.config())?)
}
