// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The controller: owns the vault core and the session, dispatches commands.

use std::io::IsTerminal;
use std::time::Duration;

use strongbox_config::StrongboxConfig;
use strongbox_core::{KdfParams, VaultError, VaultStore};
use strongbox_storage::open_store;
use strongbox_vault::{Session, VaultCore, get_passphrase};
use tracing::debug;

use crate::{Cli, Commands, entries, generate, maintenance};

/// Output preferences shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub color: bool,
}

/// Long-lived state for one invocation.
pub struct App {
    pub config: StrongboxConfig,
    pub core: VaultCore<Box<dyn VaultStore>>,
    pub session: Session,
    pub output: Output,
}

impl App {
    pub fn open(config: StrongboxConfig, output: Output) -> Result<Self, VaultError> {
        let kdf = KdfParams::new(config.vault.kdf_iterations)?;
        let store = open_store(&config.storage)?;
        let session = Session::new(Duration::from_secs(config.session.idle_timeout_secs));
        debug!(backend = store.name(), "controller ready");

        Ok(Self {
            config,
            core: VaultCore::new(store, kdf),
            session,
            output,
        })
    }

    /// Prompt for the passphrase and unlock the session.
    pub async fn unlock(&mut self) -> Result<(), VaultError> {
        let passphrase = get_passphrase()?;
        let key = self.core.unlock_vault(&passphrase).await?;
        self.session.unlock(key);
        Ok(())
    }

    /// Unlock unless the session already holds a live key.
    pub async fn ensure_unlocked(&mut self) -> Result<(), VaultError> {
        if !self.session.is_unlocked() {
            self.unlock().await?;
        }
        Ok(())
    }
}

/// Run the parsed command against the loaded configuration.
pub async fn run(cli: Cli, config: StrongboxConfig) -> Result<(), VaultError> {
    let output = Output {
        json: cli.json,
        color: !cli.plain && std::io::stdout().is_terminal(),
    };

    // Generation needs no vault at all.
    if let Commands::Generate {
        length,
        no_lowercase,
        no_uppercase,
        no_digits,
        no_symbols,
    } = cli.command
    {
        let mut generator = config.generator.clone();
        if let Some(length) = length {
            generator.length = length;
        }
        generator.lowercase &= !no_lowercase;
        generator.uppercase &= !no_uppercase;
        generator.digits &= !no_digits;
        generator.symbols &= !no_symbols;
        return generate::run_generate(&generator, output);
    }

    let mut app = App::open(config, output)?;

    let result = match cli.command {
        Commands::Init => maintenance::run_init(&app).await,
        Commands::Add { title, fields } => entries::run_add(&mut app, title, fields).await,
        Commands::Update {
            id,
            title,
            new_secret,
            fields,
        } => entries::run_update(&mut app, id, title, new_secret, fields).await,
        Commands::List => entries::run_list(&mut app).await,
        Commands::Show { id, reveal } => entries::run_show(&mut app, id, reveal).await,
        Commands::Remove { id } => entries::run_remove(&mut app, id).await,
        Commands::Export { path } => maintenance::run_export(&app, &path),
        Commands::Erase { yes } => maintenance::run_erase(&app, yes),
        Commands::Status => maintenance::run_status(&app),
        Commands::Generate { .. } => Ok(()),
    };

    app.session.lock();
    result
}
