//! Command line interface.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "A multi-tab plain-text notepad for the terminal",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Files to open, each in its own tab.
    pub files: Vec<PathBuf>,

    /// Extra configuration file layered over the user config.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs here instead of the configured location.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Write completions for `shell` to stdout.
pub fn print_completions(shell: Shell) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
}
