//! `runcgen keys`: list the spec keys a bundle would produce.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use crate::bundle::Bundle;

/// Arguments for the `keys` command.
#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Path to the bundle file.
    #[arg(default_value = "bundle.json")]
    pub file: PathBuf,
}

/// Executes the `keys` command.
///
/// # Errors
///
/// Returns an error if the bundle cannot be loaded or its services
/// cannot be ordered.
pub fn execute(args: KeysArgs) -> anyhow::Result<()> {
    let (project, configs) = Bundle::load(&args.file)?.into_parts()?;
    let keys = runcgen_spec::planned_keys(&project, &configs)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(crate::output::render_keys(&keys).as_bytes())?;
    Ok(())
}
