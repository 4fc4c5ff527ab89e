//! Rollout - package and deploy build output
//!
//! Usage:
//!   rollout help                              # List commands
//!   rollout package ./bin Web.Api 1.2.0.15    # Create a package
//!   rollout install Web.Api                   # Install the latest version
//!   rollout status                            # Show installed packages

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::Term;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rollout_core::commands::CommandProvider;
use rollout_core::context::AppContext;
use rollout_core::program;

#[derive(Parser)]
#[command(name = "rollout")]
#[command(about = "Package, install and update versioned deployments", long_about = None)]
struct Cli {
    /// Folder holding rollout.toml, packages.json and sources.json
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Folder packages are installed into (default: next to the executable)
    #[arg(long, value_name = "DIR")]
    install_root: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Command followed by its arguments, by position or as -Name=Value
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    args: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "rollout=debug,rollout_core=debug,info"
    } else {
        "rollout=info,rollout_core=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = AppContext::from_overrides(cli.config_dir, cli.install_root)?;
    let provider = CommandProvider::new(&ctx);

    let mut term = Term::stdout();
    let code = program::run(&provider, &cli.args, &mut term);
    std::process::exit(code);
}
