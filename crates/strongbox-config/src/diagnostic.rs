// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment errors are mapped onto the handful of things that can actually go
//! wrong in a `strongbox.toml`: a key or section that does not exist, a value
//! of the wrong shape, or input that could not be read at all. Keys are
//! located in the offending file so miette can point at them, and unknown
//! names get a Jaro-Winkler "did you mean" against [`SCHEMA`].

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Every section and the keys it accepts.
pub const SCHEMA: &[(&str, &[&str])] = &[
    ("vault", &["kdf_iterations"]),
    ("storage", &["backend", "path"]),
    ("session", &["idle_timeout_secs"]),
    ("generator", &["length", "lowercase", "uppercase", "digits", "symbols"]),
    ("log", &["level"]),
];

const SUGGESTION_THRESHOLD: f64 = 0.75;

/// The text of one configuration file, kept so errors can show it.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub name: String,
    pub text: String,
}

impl ConfigSource {
    /// Read a config file; `None` if it does not exist or is unreadable.
    pub fn read(path: &Path) -> Option<Self> {
        let text = std::fs::read_to_string(path).ok()?;
        Some(Self {
            name: path.display().to_string(),
            text,
        })
    }

    pub fn inline(text: &str) -> Self {
        Self {
            name: "<inline>".to_string(),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A section or key that strongbox does not know.
    #[error("unknown setting `{}`", dotted(section.as_deref(), key))]
    #[diagnostic(
        code(strongbox::config::unknown_key),
        help("{}", unknown_key_help(section.as_deref(), suggestion.as_deref()))
    )]
    UnknownKey {
        /// Enclosing section, `None` for a misspelled section name.
        section: Option<String>,
        key: String,
        suggestion: Option<String>,
        #[label("not a strongbox setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A known key with a value of the wrong type or outside its variants.
    #[error("bad value for `{key}`: {detail}")]
    #[diagnostic(code(strongbox::config::bad_value))]
    BadValue {
        key: String,
        detail: String,
        #[label("set here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// Well-formed but semantically unacceptable, found after loading.
    #[error("invalid setting: {message}")]
    #[diagnostic(code(strongbox::config::validation))]
    Validation { message: String },

    /// Anything figment reports that is not tied to one key, such as TOML
    /// syntax errors.
    #[error("unreadable configuration: {0}")]
    #[diagnostic(
        code(strongbox::config::unreadable),
        help("check the TOML syntax and any STRONGBOX_* environment variables")
    )]
    Unreadable(String),
}

fn dotted(section: Option<&str>, key: &str) -> String {
    match section {
        Some(section) => format!("{section}.{key}"),
        None => key.to_string(),
    }
}

/// Names valid at the given level: section names at the top, keys inside one.
fn candidates(section: Option<&str>) -> Vec<&'static str> {
    match section {
        None => SCHEMA.iter().map(|(name, _)| *name).collect(),
        Some(section) => SCHEMA
            .iter()
            .find(|(name, _)| *name == section)
            .map(|(_, keys)| keys.to_vec())
            .unwrap_or_default(),
    }
}

fn unknown_key_help(section: Option<&str>, suggestion: Option<&str>) -> String {
    let valid = candidates(section).join(", ");
    let scope = match section {
        Some(section) => format!("[{section}] accepts: {valid}"),
        None => format!("sections are: {valid}"),
    };
    match suggestion {
        Some(s) => format!("did you mean `{s}`? {scope}"),
        None => scope,
    }
}

/// The candidate closest to `unknown`, if any is similar enough.
pub fn closest_key<'a>(unknown: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, strsim::jaro_winkler(unknown, c)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}

/// Byte offset of `key` inside `[section]`, or of a `[key]` header when
/// `section` is `None`. Tracks the current table line by line.
pub fn key_offset(text: &str, section: Option<&str>, key: &str) -> Option<usize> {
    let mut table: Option<&str> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let body = line.trim_start();
        let indent = line.len() - body.len();

        if let Some(header) = body.strip_prefix('[') {
            let name = header.split(']').next().map(str::trim);
            if section.is_none() && name == Some(key) {
                return Some(offset + indent + 1 + (header.len() - header.trim_start().len()));
            }
            table = name;
        } else if table == section
            && body
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='))
        {
            return Some(offset + indent);
        }

        offset += line.len();
    }

    None
}

/// Pick the file an error came from and find `key` in it.
fn locate(
    error: &figment::Error,
    sources: &[ConfigSource],
    section: Option<&str>,
    key: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let source = match file {
        Some(name) => sources.iter().find(|s| s.name == name),
        None if sources.len() == 1 => sources.first(),
        None => None,
    };

    source
        .and_then(|s| {
            key_offset(&s.text, section, key).map(|offset| {
                (
                    Some(SourceSpan::new(offset.into(), key.len())),
                    Some(NamedSource::new(&s.name, s.text.clone())),
                )
            })
        })
        .unwrap_or((None, None))
}

fn convert(error: &figment::Error, sources: &[ConfigSource]) -> ConfigError {
    use figment::error::Kind;

    let path: Vec<&str> = error.path.iter().map(String::as_str).collect();

    let bad_value = |detail: String| {
        let (key, section) = match path.split_last() {
            Some((key, parents)) => (*key, parents.first().copied()),
            None => ("", None),
        };
        let (span, src) = locate(error, sources, section, key);
        ConfigError::BadValue {
            key: path.join("."),
            detail,
            span,
            src,
        }
    };

    match &error.kind {
        Kind::UnknownField(field, _) => {
            let section = path.first().copied();
            let suggestion = closest_key(field, &candidates(section)).map(str::to_string);
            let (span, src) = locate(error, sources, section, field);
            ConfigError::UnknownKey {
                section: section.map(str::to_string),
                key: field.clone(),
                suggestion,
                span,
                src,
            }
        }
        Kind::InvalidType(actual, expected) | Kind::InvalidValue(actual, expected) => {
            bad_value(format!("found {actual}, expected {expected}"))
        }
        Kind::UnknownVariant(found, expected) => bad_value(format!(
            "`{found}` is not one of {}",
            expected.join(", ")
        )),
        _ => ConfigError::Unreadable(error.to_string()),
    }
}

/// Turn a figment failure into one diagnostic per underlying error.
pub fn from_figment(err: figment::Error, sources: &[ConfigSource]) -> Vec<ConfigError> {
    err.into_iter().map(|e| convert(&e, sources)).collect()
}

/// Print every diagnostic to stderr.
pub fn render_errors(errors: Vec<ConfigError>) {
    let count = errors.len();
    for error in errors {
        eprintln!("{:?}", miette::Report::new(error));
    }
    if count > 1 {
        eprintln!("{count} configuration problems found");
    }
}
