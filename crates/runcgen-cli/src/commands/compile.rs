//! `runcgen compile`: build the runtime specs of a bundle.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use runcgen_common::config::CompilerConfig;

use crate::bundle::Bundle;

/// Arguments for the `compile` command.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Path to the bundle file.
    #[arg(default_value = "bundle.json")]
    pub file: PathBuf,

    /// Print only the spec with this key (e.g. `web/default`).
    #[arg(long)]
    pub only: Option<String>,
}

/// Executes the `compile` command.
///
/// Compiles the whole bundle first, so a bad configuration anywhere fails
/// the command even with `--only`.
///
/// # Errors
///
/// Returns an error if the bundle cannot be loaded, compilation fails, the
/// requested key was not produced, or a key is produced twice.
pub fn execute(args: CompileArgs, config: &CompilerConfig) -> anyhow::Result<()> {
    let (project, configs) = Bundle::load(&args.file)?.into_parts()?;
    tracing::info!(project = %project.name, file = %args.file.display(), "compiling bundle");

    let specs = runcgen_spec::compile(&project, &configs, config)?;

    let mut stdout = std::io::stdout().lock();
    if let Some(key) = args.only {
        let spec = crate::output::find_spec(&specs, &key)?
            .ok_or_else(|| anyhow::anyhow!("no spec produced for key {key}"))?;
        stdout.write_all(spec)?;
    } else {
        stdout.write_all(crate::output::render_specs(&specs)?.as_bytes())?;
    }
    writeln!(stdout)?;
    Ok(())
}
