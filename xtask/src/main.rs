use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Workspace automation for tabpad", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Tasks,
}

#[derive(Subcommand)]
enum Tasks {
    /// Check formatting without rewriting files.
    Fmt,
    /// Lint every target with warnings denied.
    Clippy,
    /// Run the test suite through cargo-nextest.
    Test {
        #[arg(long)]
        profile: Option<String>,
    },
    /// Formatting, lints, then tests.
    Ci,
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Tasks::Fmt => fmt(),
        Tasks::Clippy => clippy(),
        Tasks::Test { profile } => test(profile.as_deref()),
        Tasks::Ci => {
            fmt()?;
            clippy()?;
            test(None)
        }
    }
}

fn fmt() -> Result<()> {
    cargo(&["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
}

fn test(profile: Option<&str>) -> Result<()> {
    let mut args = vec!["nextest", "run", "--workspace"];
    if let Some(profile) = profile {
        args.extend(["--profile", profile]);
    }
    cargo(&args)
}

fn cargo(args: &[&str]) -> Result<()> {
    let status = Command::new(env!("CARGO"))
        .args(args)
        .status()
        .with_context(|| format!("failed to spawn cargo {}", args.join(" ")))?;
    if !status.success() {
        bail!("cargo {} failed", args.join(" "));
    }
    Ok(())
}
