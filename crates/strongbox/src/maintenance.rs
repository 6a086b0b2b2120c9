// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox init|export|erase|status` - vault lifecycle commands.

use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use serde::Serialize;
use strongbox_config::StorageBackend;
use strongbox_core::{VaultError, VaultStore};
use strongbox_vault::{get_passphrase_with_confirm, validate_master_passphrase};

use crate::app::{App, Output};

/// JSON output of `strongbox status`.
#[derive(Debug, Serialize)]
struct StatusResponse {
    backend: String,
    path: Option<String>,
    exists: bool,
    records: usize,
    kdf_iterations: Option<u32>,
}

fn print_ok(message: &str, output: Output) {
    if output.color {
        use colored::Colorize;
        println!("  {} {message}", "✓".green());
    } else {
        println!("  [OK] {message}");
    }
}

pub async fn run_init(app: &App) -> Result<(), VaultError> {
    if app.core.exists()? {
        return Err(VaultError::VaultExists);
    }

    let passphrase = get_passphrase_with_confirm()?;
    validate_master_passphrase(&passphrase)?;
    app.core.create_vault(&passphrase).await?;

    if app.output.json {
        println!("{}", serde_json::json!({ "created": true }));
    } else {
        print_ok("vault created", app.output);
        println!("  There is no recovery without the master passphrase.");
    }
    Ok(())
}

pub fn run_export(app: &App, path: &Path) -> Result<(), VaultError> {
    let count = app.core.export_backup(path)?;
    if app.output.json {
        println!(
            "{}",
            serde_json::json!({ "path": path.display().to_string(), "records": count })
        );
    } else {
        print_ok(
            &format!("exported {count} encrypted record(s) to {}", path.display()),
            app.output,
        );
    }
    Ok(())
}

/// Ask the user to type `erase`. Only reachable on a TTY.
fn confirm_erase() -> Result<bool, VaultError> {
    print!("  This permanently destroys the vault. Type 'erase' to confirm: ");
    std::io::stdout()
        .flush()
        .map_err(|e| VaultError::Internal(e.to_string()))?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| VaultError::InvalidInput(format!("failed to read confirmation: {e}")))?;
    Ok(answer.trim() == "erase")
}

pub fn run_erase(app: &App, yes: bool) -> Result<(), VaultError> {
    if !app.core.exists()? {
        return Err(VaultError::NoVault);
    }

    if !yes {
        if !std::io::stdin().is_terminal() {
            return Err(VaultError::InvalidInput(
                "refusing to erase without confirmation; pass --yes".to_string(),
            ));
        }
        if !confirm_erase()? {
            return Err(VaultError::InvalidInput("erase cancelled".to_string()));
        }
    }

    app.core.erase_vault()?;
    if app.output.json {
        println!("{}", serde_json::json!({ "erased": true }));
    } else {
        print_ok("vault erased", app.output);
    }
    Ok(())
}

pub fn run_status(app: &App) -> Result<(), VaultError> {
    let storage = &app.config.storage;
    let exists = app.core.exists()?;
    let (records, kdf_iterations) = if exists {
        (
            app.core.records()?.len(),
            app.core.store().get_kdf_params()?.map(|p| p.iterations),
        )
    } else {
        (0, None)
    };

    let status = StatusResponse {
        backend: storage.backend.to_string(),
        path: (storage.backend != StorageBackend::Memory).then(|| storage.path.clone()),
        exists,
        records,
        kdf_iterations,
    };

    if app.output.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  strongbox status");
    println!("  {}", "-".repeat(35));
    println!("    Backend:  {}", status.backend);
    if let Some(path) = &status.path {
        println!("    Path:     {path}");
    }
    if status.exists {
        if app.output.color {
            use colored::Colorize;
            println!("    Vault:    {} {} record(s)", "✓".green(), status.records);
        } else {
            println!("    Vault:    [OK] {} record(s)", status.records);
        }
        if let Some(iterations) = status.kdf_iterations {
            println!("    KDF:      PBKDF2-HMAC-SHA256, {iterations} iterations");
        }
    } else {
        if app.output.color {
            use colored::Colorize;
            println!("    Vault:    {} {}", "✗".red(), "not created".red());
        } else {
            println!("    Vault:    [FAIL] not created");
        }
        println!();
        println!("  Create one with: strongbox init");
    }
    println!();
    Ok(())
}
