//! Configuration loader for hashkey.
//!
//! Reads a TOML file (`hashkey.toml` by default) and deserializes it into
//! [`GlobalConfig`]. The lenient loader falls back to defaults when the file
//! is missing, unreadable, malformed, or holds values the service cannot run
//! with.

use std::path::Path;

use hashkey_types::config::{DigestConfig, GlobalConfig};
use hashkey_types::error::ConfigError;

/// Default config file name, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "hashkey.toml";

/// Load and validate `path`.
///
/// A missing file yields `Ok(GlobalConfig::default())`; any other failure is
/// returned to the caller.
pub async fn try_load_global_config(path: &Path) -> Result<GlobalConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return Ok(GlobalConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            });
        }
    };

    let config: GlobalConfig = toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    config.digest.validate()?;
    Ok(config)
}

/// Load `path`, falling back to defaults on any error.
///
/// - Missing file: defaults, logged at debug.
/// - Unreadable or unparsable file: defaults, logged at warn.
/// - Invalid `[digest]` values: the `[digest]` table is reset to defaults,
///   the rest of the file is kept, logged at warn.
pub async fn load_global_config(path: &Path) -> GlobalConfig {
    match try_load_global_config(path).await {
        Ok(config) => config,
        Err(err @ ConfigError::Invalid { .. }) => {
            tracing::warn!("{err}, using default digest settings");
            reload_with_default_digest(path).await
        }
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            GlobalConfig::default()
        }
    }
}

async fn reload_with_default_digest(path: &Path) -> GlobalConfig {
    let parsed = match tokio::fs::read_to_string(path).await {
        Ok(content) => toml::from_str::<GlobalConfig>(&content).ok(),
        Err(_) => None,
    };
    match parsed {
        Some(config) => GlobalConfig {
            digest: DigestConfig::default(),
            ..config
        },
        None => GlobalConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(&tmp.path().join(DEFAULT_CONFIG_FILE)).await;
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn load_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(
            &path,
            r#"
[digest]
key_space = 500
processing_delay_ms = 250

[server]
host = "0.0.0.0"
port = 3000
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(&path).await;
        assert_eq!(config.digest.key_space, 500);
        assert_eq!(config.digest.processing_delay_ms, 250);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:3000");
    }

    #[tokio::test]
    async fn load_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(&path).await;
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn try_load_reports_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(&path, "[digest]\nkey_space = \"lots\"\n")
            .await
            .unwrap();

        let err = try_load_global_config(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn invalid_digest_values_keep_server_settings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(&path, "[digest]\nkey_space = 0\n\n[server]\nport = 9999\n")
            .await
            .unwrap();

        let err = try_load_global_config(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let config = load_global_config(&path).await;
        assert_eq!(config.digest, DigestConfig::default());
        assert_eq!(config.server.port, 9999);
    }
}
