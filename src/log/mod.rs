pub mod key_value_encoder;

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use log4rs::{
    Config,
    config::{Deserializers, RawConfig},
};

use crate::log::key_value_encoder::KeyValueEncoderDeserializer;

/// External configuration looked up in the working directory.
pub const LOG_CONFIG_FILE: &str = "log4rs.yml";

/// Initializes logging from `log4rs.yml` if present, otherwise from the embedded defaults.
pub fn init_logging() -> Result<()> {
    let mut deserializers = Deserializers::default();
    deserializers.insert("key_values", KeyValueEncoderDeserializer);

    let path = Path::new(LOG_CONFIG_FILE);
    if path.exists() {
        log4rs::init_file(path, deserializers).context("Failed to load external log4rs.yml")?;
        info!(
            path = LOG_CONFIG_FILE;
            "Logging initialized from external configuration"
        );
        return Ok(());
    }

    let config = embedded_config(&deserializers)?;
    log4rs::init_config(config).context("Failed to initialize logging from embedded config")?;

    debug!("Logging initialized from embedded defaults (no external log4rs.yml found)");
    Ok(())
}

fn embedded_config(deserializers: &Deserializers) -> Result<Config> {
    let yaml_content = include_str!("../../resources/default_log4rs.yml");
    let raw_config: RawConfig =
        serde_yaml::from_str(yaml_content).context("Embedded logging configuration is invalid YAML")?;

    let (appenders, errors) = raw_config.appenders_lossy(deserializers);
    if !errors.is_empty() {
        return Err(anyhow!("Errors parsing embedded appenders: {:?}", errors));
    }

    Config::builder()
        .appenders(appenders)
        .loggers(raw_config.loggers())
        .build(raw_config.root())
        .context("Failed to build logging config")
}

fn reveal_pii() -> bool {
    static REVEAL_PII_CACHE: OnceLock<bool> = OnceLock::new();

    *REVEAL_PII_CACHE.get_or_init(|| {
        std::env::var("REVEAL_PII")
            .map(|v| {
                let val = v.to_lowercase();
                val == "true" || val == "1"
            })
            .unwrap_or(false)
    })
}

/// Masks a string (like an address) showing only start and end characters.
/// If REVEAL_PII is true, returns the original string.
pub fn mask_string(s: &str) -> String {
    mask(s, reveal_pii())
}

fn mask(s: &str, reveal: bool) -> String {
    if reveal {
        return s.to_string();
    }

    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 12 {
        return "***".to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_builds() {
        let mut deserializers = Deserializers::default();
        deserializers.insert("key_values", KeyValueEncoderDeserializer);

        assert!(embedded_config(&deserializers).is_ok());
    }

    #[test]
    fn test_mask_keeps_ends_of_addresses() {
        let address = "HZNTYGKEWZXNSDQVCNUJPADZUAMLGOQVCWUYPNQHVFIYFGXGBTCYWHTUURPDMOKBGQEJZZMSMFMYSYWAV";
        assert_eq!(mask(address, false), "HZNTYG...YSYWAV");
        assert_eq!(mask(address, true), address);
    }

    #[test]
    fn test_mask_hides_short_values() {
        assert_eq!(mask("ADDR1", false), "***");
    }
}
