use std::{fs, fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use config::{Config, Environment};
use log::{info, trace};

use super::defaults::NodeSettings;

/// Environment variables with this prefix override file values,
/// e.g. `TANGLE_NODE__URL`.
const ENV_PREFIX: &str = "TANGLE";

pub fn get_default_config() -> &'static str {
    include_str!("../../config/config.toml")
}

/// Loads the configuration file at `path`, writing the default one first if it is missing.
pub fn load_configuration(path: &Path) -> Result<Config> {
    if !path.exists() {
        let sources = get_default_config();
        write_config_to(path, sources).context("Could not create default config")?;
        info!(path:% = path.display(); "Created new configuration file");
    }

    let filename = path.to_str().context("Invalid config file path")?;

    Config::builder()
        .add_source(config::File::with_name(filename))
        .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__"))
        .build()
        .context("Could not build config")
}

/// Reads the `[node]` table, falling back to defaults for absent keys.
pub fn load_node_settings(cfg: &Config) -> Result<NodeSettings> {
    match cfg.get::<NodeSettings>(NodeSettings::main_key_prefix()) {
        Ok(settings) => {
            trace!(url = &*settings.url; "Loaded node settings");
            Ok(settings)
        },
        Err(config::ConfigError::NotFound(_)) => Ok(NodeSettings::default()),
        Err(e) => Err(e).context("Could not read node settings"),
    }
}

pub fn write_config_to(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create parent directories")?;
    };

    let mut file = File::create(path).context("Failed to create config file")?;
    file.write_all(source.as_bytes())
        .context("Failed to write config content")?;
    file.write_all(b"\n").context("Failed to write newline")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = load_configuration(&path).unwrap();
        let settings = load_node_settings(&cfg).unwrap();

        assert!(path.exists());
        assert_eq!(settings, NodeSettings::default());
    }

    #[test]
    fn test_file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        write_config_to(&path, "[node]\nurl = \"http://10.0.0.7:14265\"\ntimeout_secs = 300").unwrap();

        let settings = load_node_settings(&load_configuration(&path).unwrap()).unwrap();

        assert_eq!(settings.url, "http://10.0.0.7:14265");
        assert_eq!(settings.timeout_secs, Some(300));
    }

    #[test]
    fn test_absent_table_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        write_config_to(&path, "# empty").unwrap();

        let settings = load_node_settings(&load_configuration(&path).unwrap()).unwrap();

        assert_eq!(settings, NodeSettings::default());
    }
}
