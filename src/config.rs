use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::services::auth_service::{MAX_HASH_COST, MIN_HASH_COST};

/// Server settings, read from an optional YAML file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub database: String,
    pub cors_origin: Option<String>,
    pub log_level: String,
    pub password_hash_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database: "chatroom.db".to_string(),
            cors_origin: None,
            log_level: "info".to_string(),
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&self.password_hash_cost) {
            anyhow::bail!(
                "password_hash_cost must be between {} and {}",
                MIN_HASH_COST,
                MAX_HASH_COST
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let config = ServerConfig {
            cors_origin: Some("http://localhost:5173".to_string()),
            ..Default::default()
        };

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("port: 3000"));
        assert!(yaml.contains("cors_origin: http://localhost:5173"));
    }

    #[test]
    fn test_deserialization_fills_defaults() {
        let yaml = r#"
port: 8080
database: "/var/lib/chatroom/chat.db"
"#;

        let config = ServerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database, "/var/lib/chatroom/chat.db");
        assert_eq!(config.cors_origin, None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.password_hash_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn test_invalid_hash_cost_rejected() {
        assert!(ServerConfig::from_yaml("password_hash_cost: 2").is_err());
        assert!(ServerConfig::from_yaml("password_hash_cost: 40").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"log_level: debug\n").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
    }
}
