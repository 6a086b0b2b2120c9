// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox generate` - print a random password.

use secrecy::ExposeSecret;
use strongbox_config::model::GeneratorConfig;
use strongbox_core::VaultError;
use strongbox_vault::generate_password;

use crate::app::Output;

pub fn run_generate(config: &GeneratorConfig, output: Output) -> Result<(), VaultError> {
    let password = generate_password(config)?;

    if output.json {
        let body = serde_json::json!({
            "password": password.expose_secret(),
            "length": config.length,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}", password.expose_secret());
    }
    Ok(())
}
