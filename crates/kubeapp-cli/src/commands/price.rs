//! `kapp price` — Print the resource and price totals for app packages.

use clap::Args;

use super::{GlobalOpts, TemplateArgs};

/// Arguments for the `price` command.
#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Template input.
    #[command(flatten)]
    pub input: TemplateArgs,

    /// App package id; every declared package when omitted.
    #[arg(short, long)]
    pub package: Option<String>,

    /// Print the totals as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `price` command.
///
/// # Errors
///
/// Returns an error if the template or catalog cannot be loaded, a package
/// does not exist, or its kube type is missing from the catalog.
pub fn execute(args: &PriceArgs, opts: GlobalOpts) -> anyhow::Result<()> {
    let engine = super::load_engine(&args.input, opts)?;
    let values = args.input.field_values();

    let ids = match args.package {
        Some(ref id) => vec![id.clone()],
        None => engine.app_packages(&values)?,
    };
    if ids.is_empty() {
        anyhow::bail!("template declares no app packages");
    }

    for id in &ids {
        let totals = engine.price_package(id, &values)?;
        if args.json {
            println!("{}", serde_json::to_string(&totals)?);
        } else {
            print!("{}", crate::output::totals_summary(id, &totals));
        }
    }
    Ok(())
}
