use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
        theme,
        set_sync,
    } = &cli.command
    {
        let mut updated = cfg.clone();
        let mut changed = false;

        if let Some(t) = theme {
            updated.theme = Config::validate_theme(t)?;
            changed = true;
        }

        if let Some(flag) = set_sync {
            updated.sync.enabled = match flag.to_lowercase().as_str() {
                "on" | "true" | "yes" => true,
                "off" | "false" | "no" => false,
                other => {
                    return Err(AppError::Config(format!(
                        "Unknown value '{}' for --set-sync. Use 'on' or 'off'.",
                        other
                    )));
                }
            };
            changed = true;
        }

        if changed {
            if cli.test {
                info("Test mode: configuration not written.");
            } else {
                updated.save()?;
            }
            success(format!(
                "Theme: {}, Google Sheets sync: {}",
                updated.theme,
                if updated.sync.enabled { "on" } else { "off" }
            ));
        }

        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", serde_yaml::to_string(&updated)?);
        }

        if *edit_config {
            edit(&Config::config_file(), editor.clone());
        }
    }

    Ok(())
}

fn edit(path: &std::path::Path, requested: Option<String>) {
    let default_editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    let editor_to_use = requested.unwrap_or_else(|| default_editor.clone());

    match Command::new(&editor_to_use).arg(path).status() {
        Ok(s) if s.success() => {
            success(format!(
                "Configuration file edited successfully using '{}'",
                editor_to_use
            ));
        }
        _ => {
            warning(format!(
                "Editor '{}' not available, falling back to '{}'",
                editor_to_use, default_editor
            ));
            match Command::new(&default_editor).arg(path).status() {
                Ok(s) if s.success() => success(format!(
                    "Configuration file edited successfully using fallback '{}'",
                    default_editor
                )),
                _ => crate::ui::messages::error(format!(
                    "Failed to edit configuration file using fallback '{}'",
                    default_editor
                )),
            }
        }
    }
}
