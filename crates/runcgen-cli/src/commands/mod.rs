//! CLI command definitions and dispatch.

pub mod compile;
pub mod keys;

use clap::{Parser, Subcommand};
use runcgen_common::config::CompilerConfig;
use runcgen_common::constants::{DEFAULT_OS, DEFAULT_TERMINAL};

/// runcgen: compile compose services into OCI runtime specs.
#[derive(Parser, Debug)]
#[command(name = "runcgen", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// OS assumed for configurations without a platform tag.
    #[arg(long, global = true, env = "RUNCGEN_DEFAULT_OS", default_value = DEFAULT_OS)]
    pub default_os: String,

    /// Value injected as TERM for TTY services.
    #[arg(long, global = true, env = "RUNCGEN_TERMINAL", default_value = DEFAULT_TERMINAL)]
    pub terminal: String,
}

impl Cli {
    /// Builds the compiler configuration from the global flags.
    #[must_use]
    pub fn compiler_config(&self) -> CompilerConfig {
        CompilerConfig {
            default_os: self.default_os.clone(),
            terminal: self.terminal.clone(),
        }
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile every service and platform of a bundle into runtime specs.
    Compile(compile::CompileArgs),
    /// List the spec keys a bundle would produce.
    Keys(keys::KeysArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.compiler_config();
    match cli.command {
        Command::Compile(args) => compile::execute(args, &config),
        Command::Keys(args) => keys::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_build_config() {
        let cli = Cli::try_parse_from([
            "runcgen",
            "--terminal",
            "vt100",
            "compile",
            "bundle.json",
        ])
        .expect("parse");
        let config = cli.compiler_config();
        assert_eq!(config.terminal, "vt100");
        assert!(matches!(cli.command, Command::Compile(_)));
    }
}
