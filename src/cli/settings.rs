//! Settings subcommand implementation.

use crate::config::{AppSettings, Paths};
use crate::error::CliResult;
use crate::output;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Show or initialize scan defaults.
#[derive(Parser, Debug)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub action: SettingsAction,
}

/// Settings actions.
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the effective settings as JSON
    Show,
    /// Print the settings file location
    Path,
    /// Write a settings file populated with the defaults
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

impl SettingsCommand {
    /// Execute the settings command.
    ///
    /// `config` is the `--config` override, if any. Settings are only
    /// loaded for `show`, so `init` works before any file exists.
    pub fn execute(&self, config: Option<&Path>, quiet: bool) -> CliResult<()> {
        match &self.action {
            SettingsAction::Show => {
                let settings = AppSettings::load_or_default(config)?;
                let json = serde_json::to_string_pretty(&settings)
                    .map_err(crate::error::ConfigError::from)?;
                println!("{}", json);
            }
            SettingsAction::Path => {
                println!("{}", settings_path(config)?.display());
            }
            SettingsAction::Init { force } => {
                let path = settings_path(config)?;
                AppSettings::default().save_to(&path, *force)?;
                if !quiet {
                    output::print_success(&format!("Wrote default settings to {}", path.display()));
                }
            }
        }
        Ok(())
    }
}

fn settings_path(config: Option<&Path>) -> CliResult<PathBuf> {
    match config {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Paths::new()?.settings_file()),
    }
}
