use anyhow::{Context, Result};
use colored::*;
use is_terminal::IsTerminal;
use log::info;
use std::fs;
use std::path::Path;

use crate::config::{Config, RawConfig, TEMPLATE};
use crate::ui::prompts::prompt_overwrite_confirmation;

pub async fn config_path_command(explicit: Option<&Path>) -> Result<()> {
    let path = Config::resolve_path(explicit)?;
    println!("{}", path.display());
    Ok(())
}

/// Print the effective configuration (file plus environment overrides) and
/// whether it validates.
pub async fn config_show_command(explicit: Option<&Path>) -> Result<()> {
    let path = Config::resolve_path(explicit)?;
    let mut raw = RawConfig::from_file(&path)?;
    raw.apply_env(|key| std::env::var(key).ok())?;

    println!("# {}", path.display().to_string().dimmed());
    println!("{}", toml::to_string_pretty(&raw).context("Failed to serialize config to TOML")?);

    match raw.validate(path) {
        Ok(_) => println!("{} Configuration is valid", "✓".bright_green().bold()),
        Err(e) => println!("{} {}", "✗".bright_red().bold(), e.to_string().red()),
    }
    Ok(())
}

/// Write the commented template to the config path.
pub async fn config_init_command(explicit: Option<&Path>, force: bool) -> Result<()> {
    let path = Config::resolve_path(explicit)?;

    if path.exists() && !force {
        let confirmed = std::io::stdin().is_terminal()
            && prompt_overwrite_confirmation(&path.display().to_string())?;
        if !confirmed {
            println!("Config file already exists: {}", path.display());
            println!("Use --force to overwrite it.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }
    fs::write(&path, TEMPLATE)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Wrote config template to {:?}", path);
    println!("{} Wrote {}", "✓".bright_green().bold(), path.display().to_string().cyan());
    println!("Edit sheet_url, id_column and the [[grades]] entries, then run 'grades-cli check'.");
    Ok(())
}
