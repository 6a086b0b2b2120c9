// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox add|update|list|show|remove` - record management.

use std::io::{BufRead, IsTerminal};

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::Serialize;
use strongbox_config::model::GeneratorConfig;
use strongbox_core::{PlaintextRecord, RecordDraft, RecordId, VaultError};
use strongbox_vault::{generate_password, mask_secret};
use tracing::debug;
use zeroize::Zeroizing;

use crate::FieldArgs;
use crate::app::{App, Output};

/// Shown in place of notes unless `--reveal` is given.
const HIDDEN_NOTES: &str = "(hidden)";

/// JSON shape of one record on stdout.
#[derive(Debug, Serialize)]
struct RecordView<'a> {
    id: &'a str,
    title: &'a str,
    username: Option<&'a str>,
    #[serde(serialize_with = "expose")]
    secret: Zeroizing<String>,
    url: Option<&'a str>,
    notes: Option<&'a str>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

fn expose<S: serde::Serializer>(value: &Zeroizing<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value)
}

/// The secret and notes as they may be displayed.
fn displayed<'a>(record: &'a PlaintextRecord, reveal: bool) -> (Zeroizing<String>, Option<&'a str>) {
    if reveal {
        (Zeroizing::new(record.secret.clone()), record.notes.as_deref())
    } else {
        (
            Zeroizing::new(mask_secret(&record.secret)),
            record.notes.as_ref().map(|_| HIDDEN_NOTES),
        )
    }
}

impl<'a> RecordView<'a> {
    fn new(record: &'a PlaintextRecord, reveal: bool) -> Self {
        let (secret, notes) = displayed(record, reveal);
        Self {
            id: record.id.as_str(),
            title: &record.title,
            username: record.username.as_deref(),
            secret,
            url: record.url.as_deref(),
            notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Obtain a record secret: generated, prompted for on a TTY, or one line of stdin.
fn read_secret(generate: bool, generator: &GeneratorConfig) -> Result<Zeroizing<String>, VaultError> {
    if generate {
        let password = generate_password(generator)?;
        return Ok(Zeroizing::new(password.expose_secret().to_owned()));
    }

    let secret = if std::io::stdin().is_terminal() {
        rpassword::prompt_password("Secret: ")
            .map(Zeroizing::new)
            .map_err(|e| VaultError::InvalidInput(format!("failed to read secret: {e}")))?
    } else {
        let mut line = Zeroizing::new(String::new());
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| VaultError::InvalidInput(format!("failed to read secret: {e}")))?;
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        line
    };

    if secret.is_empty() {
        return Err(VaultError::InvalidInput("secret must not be empty".to_string()));
    }
    Ok(secret)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), VaultError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_record(record: &PlaintextRecord, reveal: bool, output: Output) {
    let (secret, notes) = displayed(record, reveal);

    println!();
    if output.color {
        use colored::Colorize;
        println!("  {}", record.title.bold());
    } else {
        println!("  {}", record.title);
    }
    println!("  {}", "-".repeat(35));
    println!("    Id:       {}", record.id);
    if let Some(username) = &record.username {
        println!("    Username: {username}");
    }
    println!("    Secret:   {}", secret.as_str());
    if let Some(url) = &record.url {
        println!("    URL:      {url}");
    }
    if let Some(notes) = notes {
        println!("    Notes:    {notes}");
    }
    println!("    Created:  {}", record.created_at.to_rfc3339());
    if let Some(updated) = record.updated_at {
        println!("    Updated:  {}", updated.to_rfc3339());
    }
    println!();
}

fn report_saved(verb: &str, id: &RecordId, output: Output) -> Result<(), VaultError> {
    if output.json {
        return print_json(&serde_json::json!({ "id": id.as_str() }));
    }
    if output.color {
        use colored::Colorize;
        println!("  {} {verb} {id}", "✓".green());
    } else {
        println!("  [OK] {verb} {id}");
    }
    Ok(())
}

pub async fn run_add(app: &mut App, title: String, fields: FieldArgs) -> Result<(), VaultError> {
    app.ensure_unlocked().await?;
    let secret = read_secret(fields.generate, &app.config.generator)?;

    let draft = RecordDraft {
        title,
        username: fields.username,
        secret: secret.as_str().to_owned(),
        url: fields.url,
        notes: fields.notes,
    };

    let key = app.session.key()?;
    let record = app.core.add_record(&draft, key)?;
    report_saved("added", &record.id, app.output)
}

/// Merge the given fields over the stored record. The secret is kept unless
/// `--new-secret` or `--generate` asks for a new one.
pub async fn run_update(
    app: &mut App,
    id: String,
    title: Option<String>,
    new_secret: bool,
    fields: FieldArgs,
) -> Result<(), VaultError> {
    let id = RecordId(id);
    app.ensure_unlocked().await?;

    let existing = {
        let key = app.session.key()?;
        app.core.get_record(&id, key)?
    };

    let secret = if new_secret || fields.generate {
        read_secret(fields.generate, &app.config.generator)?
    } else {
        Zeroizing::new(existing.secret.clone())
    };

    let draft = RecordDraft {
        title: title.unwrap_or_else(|| existing.title.clone()),
        username: fields.username.or_else(|| existing.username.clone()),
        secret: secret.as_str().to_owned(),
        url: fields.url.or_else(|| existing.url.clone()),
        notes: fields.notes.or_else(|| existing.notes.clone()),
    };
    debug!(id = %id, rotate_secret = new_secret || fields.generate, "updating record");

    let key = app.session.key()?;
    let record = app.core.update_record(&id, &draft, key)?;
    report_saved("updated", &record.id, app.output)
}

pub async fn run_list(app: &mut App) -> Result<(), VaultError> {
    app.ensure_unlocked().await?;
    let key = app.session.key()?;
    let records = app.core.load_records(key)?;

    if app.output.json {
        let views: Vec<RecordView<'_>> = records.iter().map(|r| RecordView::new(r, false)).collect();
        return print_json(&views);
    }

    if records.is_empty() {
        println!("  (no records)");
        return Ok(());
    }

    println!();
    println!("  {:<36}  {:<24}  {:<20}  SECRET", "ID", "TITLE", "USERNAME");
    println!("  {}", "-".repeat(96));
    for record in &records {
        let title = if app.output.color {
            use colored::Colorize;
            format!("{:<24}", record.title).bold().to_string()
        } else {
            format!("{:<24}", record.title)
        };
        println!(
            "  {:<36}  {}  {:<20}  {}",
            record.id,
            title,
            record.username.as_deref().unwrap_or("-"),
            mask_secret(&record.secret)
        );
    }
    println!();
    Ok(())
}

pub async fn run_show(app: &mut App, id: String, reveal: bool) -> Result<(), VaultError> {
    app.ensure_unlocked().await?;
    let key = app.session.key()?;
    let record = app.core.get_record(&RecordId(id), key)?;

    if app.output.json {
        return print_json(&RecordView::new(&record, reveal));
    }
    print_record(&record, reveal, app.output);
    Ok(())
}

/// Deleting needs no key, but only the passphrase holder may do it.
pub async fn run_remove(app: &mut App, id: String) -> Result<(), VaultError> {
    app.ensure_unlocked().await?;
    let id = RecordId(id);
    app.core.delete_record(&id)?;
    report_saved("removed", &id, app.output)
}
