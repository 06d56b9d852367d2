use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let scripts_dir = config
        .scripts_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string());
    let rows = [
        ("defaults.theme", config.theme().to_string()),
        ("defaults.font_size", config.font_size().to_string()),
        ("defaults.speed", config.speed().to_string()),
        ("defaults.mirrored", config.mirrored().to_string()),
        ("defaults.countdown", config.countdown().to_string()),
        ("defaults.scripts_dir", scripts_dir),
    ];
    for (key, value) in rows {
        println!("  {:<22} {}", key.cyan(), value);
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {} = {} ({})",
        "Saved".green(),
        key.cyan(),
        value,
        path.display()
    );
    Ok(())
}
