use cinefeed_config::{Config, PathManager};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;

use crate::output::Output;
use crate::ConfigCommands;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    match cmd {
        ConfigCommands::Show => show_config(&path_manager, output),
        ConfigCommands::Init { force } => init_config(&path_manager, force, output),
        ConfigCommands::Path => {
            let path = path_manager.config_file();
            if output.is_human() {
                println!("{}", path.display());
            } else {
                output.json(&json!({"config_file": path.display().to_string()}));
            }
            Ok(())
        }
    }
}

fn show_config(path_manager: &PathManager, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();
    let config = Config::load(path_manager)
        .map_err(|e| eyre!("Failed to load config from {}: {:#}", config_file.display(), e))?;
    let masked = masked(config);

    if !output.is_human() {
        output.json(&serde_json::to_value(&masked)?);
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let mut info_table = Table::new();
    let location = if config_file.exists() {
        config_file.display().to_string()
    } else {
        format!("{} (not found, using defaults)", config_file.display())
    };
    info_table.set_header(vec![
        Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
        Cell::new(location),
    ]);
    info_table.load_preset(comfy_table::presets::UTF8_FULL);
    info_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", info_table);
    println!();
    println!("{}", "Effective configuration".bright_cyan().bold());
    println!("{}", toml::to_string_pretty(&masked)?);
    Ok(())
}

fn init_config(path_manager: &PathManager, force: bool, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration file already exists at {}. Use --force to overwrite it.",
            config_file.display()
        ));
        return Ok(());
    }

    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create {}: {:#}", path_manager.config_dir().display(), e))?;
    Config::template()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {:#}", config_file.display(), e))?;

    output.success(format!("Wrote configuration template to {}", config_file.display()));
    output.info("Replace YOUR_API_KEY with your TMDB API key, or set TMDB_API_KEY.");
    Ok(())
}

fn masked(mut config: Config) -> Config {
    config.tmdb.api_key = config.tmdb.api_key().map(mask_secret);
    config
}

fn mask_secret(s: &str) -> String {
    if s.len() <= 4 || !s.is_ascii() {
        return "*".repeat(s.chars().count());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abcdef123456"), "ab***56");
        assert_eq!(mask_secret("abc"), "***");
    }

    #[test]
    fn test_masked_drops_placeholder_key() {
        let config = masked(Config::template());
        assert!(config.tmdb.api_key.is_none());

        let mut config = Config::default();
        config.tmdb.api_key = Some("0123456789".to_string());
        assert_eq!(masked(config).tmdb.api_key.as_deref(), Some("01***89"));
    }
}
