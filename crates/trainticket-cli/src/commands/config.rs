//! Config command - manage saved settings.

use clap::{Args, Subcommand};
use console::style;

use trainticket_core::Settings;

use super::{default_settings, load_settings, settings_path};

/// Keys accepted by `config set`.
const KEYS: &[&str] = &["inputDir", "outputDir", "dateField"];

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current settings
    Show,

    /// Write default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Set a single value
    Set {
        /// Settings key (inputDir, outputDir or dateField)
        key: String,
        /// New value
        value: String,
    },

    /// Show settings file path
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(config_path),
        ConfigCommand::Init { force } => init_config(config_path, force),
        ConfigCommand::Set { key, value } => set_config(config_path, &key, &value),
        ConfigCommand::Path => show_path(config_path),
    }
}

fn show_config(config_path: Option<&str>) -> anyhow::Result<()> {
    let path = settings_path(config_path);
    let (settings, saved) = load_settings(&path)?;
    if !saved {
        println!("{} No settings file found, showing defaults.", style("ℹ").blue());
    }

    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn init_config(config_path: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = settings_path(config_path);
    if path.exists() && !force {
        anyhow::bail!(
            "Settings file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    default_settings()?.save(&path)?;
    println!("{} Created settings file at {}", style("✓").green(), path.display());
    Ok(())
}

fn set_config(config_path: Option<&str>, key: &str, value: &str) -> anyhow::Result<()> {
    if !KEYS.contains(&key) {
        anyhow::bail!("Unknown settings key: {} (expected one of {})", key, KEYS.join(", "));
    }

    let value = match key {
        "dateField" => value.trim().to_ascii_lowercase(),
        _ => value.trim().to_string(),
    };
    let path = settings_path(config_path);
    let (settings, _) = load_settings(&path)?;

    let mut json = serde_json::to_value(&settings)?;
    if let Some(obj) = json.as_object_mut() {
        obj.insert(key.to_string(), serde_json::Value::String(value.clone()));
    }
    let settings: Settings = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
    settings.save(&path)?;

    println!("{} Set {} = {}", style("✓").green(), key, value);
    Ok(())
}

fn show_path(config_path: Option<&str>) -> anyhow::Result<()> {
    let path = settings_path(config_path);
    println!("Settings file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'trainticket config init' to create a settings file.");
    }
    Ok(())
}
