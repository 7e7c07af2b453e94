use std::net::SocketAddr;

use anyhow::Result;
use common::config::{DatabaseConfig, LoggingConfig, S3BucketConfig};

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
/// The API is the backend for the Wander service
pub struct AppConfig {
    /// The path to the config file
    pub config_file: Option<String>,

    /// Name of this instance
    pub name: String,

    /// If we should export the GraphQL schema, if set to true, the schema will be exported to the stdout, and the program will exit.
    pub export_gql: bool,

    /// The logging config
    pub logging: LoggingConfig,

    /// API Config
    pub api: ApiConfig,

    /// Database Config
    pub database: DatabaseConfig,

    /// JWT Config
    pub jwt: JwtConfig,

    /// Profile picture upload config
    pub profile_pictures: ProfilePictureConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address for the API
    pub bind_address: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "[::]:4000".parse().expect("failed to parse bind address"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// JWT secret
    pub secret: String,

    /// JWT issuer
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            issuer: "wander".to_string(),
            secret: "wander".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ProfilePictureConfig {
    /// The S3 bucket profile pictures are stored in
    pub bucket: S3BucketConfig,

    /// The maximum size of an uploaded profile picture in bytes
    pub max_size: usize,
}

impl Default for ProfilePictureConfig {
    fn default() -> Self {
        Self {
            bucket: S3BucketConfig::default(),
            max_size: 5 * 1024 * 1024,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: Some("config".to_string()),
            name: "wander-api".to_string(),
            export_gql: false,
            logging: LoggingConfig::default(),
            api: ApiConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            profile_pictures: ProfilePictureConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn parse() -> Result<Self> {
        let (mut config, config_file) = common::config::parse::<Self>(Self::default().config_file)?;

        config.config_file = config_file;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_coherent() {
        let config = AppConfig::default();

        assert_eq!(config.api.bind_address.port(), 4000);
        assert_eq!(config.jwt.issuer, "wander");
        assert!(config.profile_pictures.max_size > 0);
        assert!(!config.export_gql);
    }
}
