use crate::logging;

/// Prefix for environment variable overrides, e.g.
/// `WNDR_DATABASE__URI=postgres://...`.
const ENV_PREFIX: &str = "WNDR";

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// The log level to use, this is a tracing env filter
    pub level: String,

    /// What logging mode we should use
    pub mode: logging::Mode,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            mode: logging::Mode::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// The database URL to use
    pub uri: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "postgres://root@localhost:5432/wander_dev".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct S3CredentialsConfig {
    /// The access key for the S3 bucket
    pub access_key: Option<String>,

    /// The secret key for the S3 bucket
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct S3BucketConfig {
    /// The name of the S3 bucket
    pub name: String,

    /// The region the S3 bucket is in
    pub region: String,

    /// The custom endpoint for the S3 bucket
    pub endpoint: Option<String>,

    /// The credentials for the S3 bucket
    pub credentials: S3CredentialsConfig,
}

impl Default for S3BucketConfig {
    fn default() -> Self {
        Self {
            name: "wander".to_owned(),
            region: "us-east-1".to_owned(),
            endpoint: Some("http://localhost:9000".to_string()),
            credentials: S3CredentialsConfig::default(),
        }
    }
}

/// Parse the application config from an optional file plus `WNDR_`-prefixed
/// environment variables. Environment always wins over the file. Returns the
/// parsed config and the path of the file that was actually loaded, if any.
pub fn parse<C: serde::de::DeserializeOwned>(
    config_file: Option<String>,
) -> Result<(C, Option<String>), config::ConfigError> {
    let mut builder = config::Config::builder();

    let mut config_path = None;

    if let Some(path) = config_file {
        if std::path::Path::new(&path).exists() {
            config_path = Some(path.clone());
            builder = builder.add_source(config::File::with_name(&path));
        } else {
            // A missing default config file is fine, we fall back to
            // defaults + environment.
            builder = builder.add_source(config::File::with_name(&path).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?.try_deserialize()?;

    Ok((config, config_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_coherent() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.mode, logging::Mode::Default);

        let database = DatabaseConfig::default();
        assert!(database.uri.starts_with("postgres://"));

        let bucket = S3BucketConfig::default();
        assert_eq!(bucket.region, "us-east-1");
        assert!(bucket.credentials.access_key.is_none());
    }

    #[test]
    fn parse_without_file_yields_defaults() {
        #[derive(Debug, Default, PartialEq, serde::Deserialize)]
        #[serde(default)]
        struct TestConfig {
            logging: LoggingConfig,
            database: DatabaseConfig,
        }

        let (config, path) = parse::<TestConfig>(None).unwrap();
        assert_eq!(config, TestConfig::default());
        assert!(path.is_none());
    }
}
