//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
pub fn run_config(action: &ConfigAction, config_path: Option<PathBuf>, settings: Settings) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }

        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                Output::warning(&format!(
                    "Config already exists at {} (use --force to overwrite)",
                    config_path.display()
                ));
                return Ok(());
            }
            Settings::default().save_to(&config_path)?;
            Output::success(&format!("Wrote default config to {}", config_path.display()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        run_config(&ConfigAction::Init { force: false }, Some(path.clone()), Settings::default())
            .unwrap();
        assert!(path.exists());

        std::fs::write(&path, "[rag]\ntop_k = 9\n").unwrap();
        run_config(&ConfigAction::Init { force: false }, Some(path.clone()), Settings::default())
            .unwrap();
        assert_eq!(Settings::load_from(Some(&path)).unwrap().rag.top_k, 9);

        run_config(&ConfigAction::Init { force: true }, Some(path.clone()), Settings::default())
            .unwrap();
        assert_eq!(Settings::load_from(Some(&path)).unwrap().rag.top_k, 4);
    }
}
