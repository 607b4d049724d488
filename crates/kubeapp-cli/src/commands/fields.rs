//! `kapp fields` — List the fields a template exposes.

use clap::Args;

use super::{GlobalOpts, TemplateArgs};

/// Arguments for the `fields` command.
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Template input.
    #[command(flatten)]
    pub input: TemplateArgs,

    /// Print the fields as JSON.
    #[arg(long)]
    pub json: bool,

    /// Include hidden (generated or deferred) fields.
    #[arg(long)]
    pub all: bool,
}

/// Executes the `fields` command.
///
/// # Errors
///
/// Returns an error if the template cannot be loaded.
pub fn execute(args: &FieldsArgs, opts: GlobalOpts) -> anyhow::Result<()> {
    let engine = super::load_engine(&args.input, opts)?;
    let fields: Vec<_> = engine
        .fields()
        .iter()
        .filter(|f| args.all || !f.hidden)
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
    } else {
        print!("{}", crate::output::field_table(&fields));
    }
    Ok(())
}
