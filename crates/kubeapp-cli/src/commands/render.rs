//! `kapp render` — Print the finished pod specification for one app package.

use std::path::PathBuf;

use clap::Args;

use super::{GlobalOpts, TemplateArgs};

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template input.
    #[command(flatten)]
    pub input: TemplateArgs,

    /// App package id (mapping key or position); the first declared
    /// package when omitted.
    #[arg(short, long)]
    pub package: Option<String>,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Executes the `render` command.
///
/// # Errors
///
/// Returns an error if the template cannot be loaded, the package does not
/// exist, or the output cannot be written.
pub fn execute(args: &RenderArgs, opts: GlobalOpts) -> anyhow::Result<()> {
    let engine = super::load_engine(&args.input, opts)?;
    let values = args.input.field_values();
    let package = match args.package {
        Some(ref id) => id.clone(),
        None => engine
            .app_packages(&values)?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("template declares no app packages"))?,
    };
    let yaml = engine.template_to_yaml(&package, &values)?;

    if let Some(ref out_path) = args.output {
        std::fs::write(out_path, &yaml)?;
        println!("Rendered package {package} -> {}", out_path.display());
    } else {
        print!("{yaml}");
    }
    Ok(())
}
