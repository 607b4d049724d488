//! `kapp fill` — Print the template filled with defaults and supplied values.

use clap::Args;

use super::{GlobalOpts, TemplateArgs};

/// Arguments for the `fill` command.
#[derive(Args, Debug)]
pub struct FillArgs {
    /// Template input.
    #[command(flatten)]
    pub input: TemplateArgs,
}

/// Executes the `fill` command.
///
/// # Errors
///
/// Returns an error if the template cannot be loaded or a field has no value.
pub fn execute(args: &FillArgs, opts: GlobalOpts) -> anyhow::Result<()> {
    let engine = super::load_engine(&args.input, opts)?;
    print!("{}", engine.fill(&args.input.field_values())?);
    Ok(())
}
