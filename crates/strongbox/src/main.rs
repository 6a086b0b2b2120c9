// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strongbox - a client-side encrypted credential vault.
//!
//! This is the binary entry point.

mod app;
mod entries;
mod generate;
mod maintenance;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use strongbox_core::VaultError;

/// Strongbox - a client-side encrypted credential vault.
#[derive(Parser, Debug)]
#[command(name = "strongbox", version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Record fields settable from the command line.
#[derive(Args, Debug)]
pub struct FieldArgs {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Use a generated password as the secret.
    #[arg(long)]
    generate: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new vault.
    Init,
    /// Add a record. The secret is prompted for, read from stdin, or generated.
    Add {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Replace fields of an existing record.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// Prompt for (or read from stdin) a new secret.
        #[arg(long)]
        new_secret: bool,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// List records with masked secrets.
    List,
    /// Show one record.
    Show {
        id: String,
        /// Print the secret in clear.
        #[arg(long)]
        reveal: bool,
    },
    /// Delete a record.
    Remove { id: String },
    /// Write an encrypted backup of the vault.
    Export { path: PathBuf },
    /// Permanently destroy the vault.
    Erase {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Generate a random password.
    Generate {
        #[arg(long)]
        length: Option<usize>,
        #[arg(long)]
        no_lowercase: bool,
        #[arg(long)]
        no_uppercase: bool,
        #[arg(long)]
        no_digits: bool,
        #[arg(long)]
        no_symbols: bool,
    },
    /// Show where the vault lives and whether it exists.
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => strongbox_config::load_and_validate_path(path),
        None => strongbox_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            strongbox_config::render_errors(errors);
            std::process::exit(2);
        }
    };

    init_tracing(&config.log.level);

    if let Err(e) = app::run(cli, config).await {
        eprintln!("strongbox: {e}");
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(err: &VaultError) -> i32 {
    match err {
        VaultError::Authentication | VaultError::NotAuthenticated => 3,
        VaultError::NotFound(_) => 4,
        VaultError::NoVault | VaultError::VaultExists => 5,
        _ => 1,
    }
}

/// Initializes the tracing subscriber with the given log level, writing to stderr.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("strongbox={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
