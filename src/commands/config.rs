//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Set one value and save

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;

const SENSITIVE_KEYS: &[&str] = &["auth.token"];

/// Mask a sensitive value by showing only the first 2 and last 2 characters
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

/// Show current configuration, with environment overrides applied
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let base_url = config.effective_base_url();
    let token_configured = config.token().is_some();

    let json_output = json!({
        "base_url": base_url,
        "timeout": config.timeout,
        "page_size": config.page_size.get(),
        "auth": {
            "token_configured": token_configured,
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let token_status = if token_configured {
        "configured".green().to_string()
    } else {
        "not configured".dimmed().to_string()
    };

    let text = format!(
        "{}\n\n{}: {base_url}\n{}: {}s\n{}: {}\n{}:\n  token: {token_status}\n\n{}",
        "Configuration:".cyan().bold(),
        "base_url".cyan(),
        "timeout".cyan(),
        config.timeout,
        "page_size".cyan(),
        config.page_size,
        "auth".cyan(),
        format!("Config file: {}", Config::config_path().display()).dimmed()
    );

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Get a configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;
    let shown = if SENSITIVE_KEYS.contains(&key) {
        mask_sensitive_value(&value)
    } else {
        value
    };

    CommandOutput::new(json!({
        "key": key,
        "value": shown,
    }))
    .with_text(shown.clone())
    .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = if SENSITIVE_KEYS.contains(&key) {
        mask_sensitive_value(value)
    } else {
        config.get(key)?
    };

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    }))
    .with_text(format!("Set {} = {shown}", key.cyan()))
    .print(output)
}
