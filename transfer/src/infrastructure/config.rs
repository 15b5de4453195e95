use std::path::{Path, PathBuf};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "drive-transfer.toml";
pub const ENV_PREFIX: &str = "DRIVE_TRANSFER";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub token_path: PathBuf,
    pub credentials_path: PathBuf,
    pub api_base_url: String,
    pub token_url: String,
}

pub fn load() -> Result<Settings, ConfigError> {
    load_from(Path::new(CONFIG_FILE), None)
}

/// `env` replaces the process environment when given
pub fn load_from(file: &Path, env: Option<config::Map<String, String>>) -> Result<Settings, ConfigError> {
    let s = Config::builder()
        // Set defaults
        .set_default("token_path", "token.json")?
        .set_default("credentials_path", "credentials.json")?
        .set_default("api_base_url", "https://www.googleapis.com/drive/v3")?
        .set_default("token_url", "https://oauth2.googleapis.com/token")?
        // Add configuration from an optional file
        .add_source(File::from(file).required(false))
        // Add configuration from environment variables
        .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
        .build()?;

    s.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file_or_env() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = load_from(&dir.path().join(CONFIG_FILE), Some(config::Map::new())).unwrap();

        assert_eq!(settings.token_path, PathBuf::from("token.json"));
        assert_eq!(settings.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(settings.api_base_url, "https://www.googleapis.com/drive/v3");
        assert_eq!(settings.token_url, "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn test_file_then_env_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &file,
            "token_path = \"/etc/drive/token.json\"\ncredentials_path = \"/etc/drive/credentials.json\"\n",
        )
        .unwrap();

        let mut env = config::Map::new();
        env.insert("DRIVE_TRANSFER_TOKEN_PATH".to_string(), "/run/token.json".to_string());
        env.insert("DRIVE_TRANSFER_FILE_ID".to_string(), "ignored".to_string());

        let settings = load_from(&file, Some(env)).unwrap();

        assert_eq!(settings.token_path, PathBuf::from("/run/token.json"));
        assert_eq!(settings.credentials_path, PathBuf::from("/etc/drive/credentials.json"));
    }
}
