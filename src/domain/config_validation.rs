//! Configuration validation.
//!
//! Validates config fields before an ingestion cycle runs.

use crate::domain::error::SignaldashError;
use crate::domain::row::ColumnNames;
use crate::ports::config_port::ConfigPort;
use std::collections::HashSet;

pub const DEFAULT_TIMEOUT_SECS: i64 = 10;
pub const OUTPUT_FORMATS: [&str; 2] = ["json", "text"];
pub const BOOL_SPELLINGS: [&str; 6] = ["true", "false", "yes", "no", "1", "0"];

/// Everything, including the `[source]` section.
pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SignaldashError> {
    validate_source_config(config)?;
    validate_settings_config(config)?;
    Ok(())
}

pub fn validate_source_config(config: &dyn ConfigPort) -> Result<(), SignaldashError> {
    let path = non_blank(config.get_string("source", "path"));
    let url = non_blank(config.get_string("source", "url"));

    if path.is_none() && url.is_none() {
        return Err(SignaldashError::ConfigMissing {
            section: "source".to_string(),
            key: "path".to_string(),
        });
    }
    if path.is_none() {
        if let Some(url) = url {
            validate_url(&url)?;
        }
    }
    validate_timeout(config)?;
    Ok(())
}

/// Everything except the `[source]` section, for runs that override the source.
pub fn validate_settings_config(config: &dyn ConfigPort) -> Result<(), SignaldashError> {
    validate_columns(config)?;
    validate_baseline(config)?;
    validate_symbols(config)?;
    validate_output_format(config)?;
    validate_pretty(config)?;
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

pub fn validate_url(url: &str) -> Result<(), SignaldashError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(SignaldashError::ConfigInvalid {
            section: "source".to_string(),
            key: "url".to_string(),
            reason: "url must start with http:// or https://".to_string(),
        })
    }
}

/// `[source] timeout_secs`, when present, must be a positive integer.
pub fn validate_timeout(config: &dyn ConfigPort) -> Result<(), SignaldashError> {
    let Some(raw) = config.get_string("source", "timeout_secs") else {
        return Ok(());
    };
    let invalid = || SignaldashError::ConfigInvalid {
        section: "source".to_string(),
        key: "timeout_secs".to_string(),
        reason: "timeout_secs must be a positive integer".to_string(),
    };
    match raw.trim().parse::<i64>() {
        Ok(secs) if secs > 0 => Ok(()),
        _ => Err(invalid()),
    }
}

fn validate_columns(config: &dyn ConfigPort) -> Result<(), SignaldashError> {
    let defaults = ColumnNames::default();
    let mut seen = HashSet::new();

    for (key, default) in defaults.entries() {
        let name = config
            .get_string("columns", key)
            .unwrap_or_else(|| default.to_string());
        if name.is_empty() {
            return Err(SignaldashError::ConfigInvalid {
                section: "columns".to_string(),
                key: key.to_string(),
                reason: "column name must not be empty".to_string(),
            });
        }
        if !seen.insert(name.clone()) {
            return Err(SignaldashError::ConfigInvalid {
                section: "columns".to_string(),
                key: key.to_string(),
                reason: format!("column name {name} is used twice"),
            });
        }
    }
    Ok(())
}

fn validate_baseline(config: &dyn ConfigPort) -> Result<(), SignaldashError> {
    match config.get_string("engine", "baseline") {
        Some(s) if s.trim().is_empty() => Err(SignaldashError::ConfigInvalid {
            section: "engine".to_string(),
            key: "baseline".to_string(),
            reason: "baseline must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), SignaldashError> {
    let Some(symbols) = config.get_list("engine", "symbols") else {
        return Ok(());
    };
    let mut seen = HashSet::new();
    for symbol in symbols {
        if symbol.is_empty() {
            return Err(SignaldashError::ConfigInvalid {
                section: "engine".to_string(),
                key: "symbols".to_string(),
                reason: "empty token in symbol list".to_string(),
            });
        }
        if !seen.insert(symbol.clone()) {
            return Err(SignaldashError::ConfigInvalid {
                section: "engine".to_string(),
                key: "symbols".to_string(),
                reason: format!("duplicate symbol: {symbol}"),
            });
        }
    }
    Ok(())
}

fn validate_output_format(config: &dyn ConfigPort) -> Result<(), SignaldashError> {
    match config.get_string("output", "format") {
        Some(f) if !OUTPUT_FORMATS.contains(&f.as_str()) => Err(SignaldashError::ConfigInvalid {
            section: "output".to_string(),
            key: "format".to_string(),
            reason: format!("format must be one of {}", OUTPUT_FORMATS.join(", ")),
        }),
        _ => Ok(()),
    }
}

fn validate_pretty(config: &dyn ConfigPort) -> Result<(), SignaldashError> {
    match config.get_string("output", "pretty") {
        Some(v) if !BOOL_SPELLINGS.contains(&v.trim().to_lowercase().as_str()) => {
            Err(SignaldashError::ConfigInvalid {
                section: "output".to_string(),
                key: "pretty".to_string(),
                reason: "pretty must be true or false".to_string(),
            })
        }
        _ => Ok(()),
    }
}
