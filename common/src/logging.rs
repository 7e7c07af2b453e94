use std::str::FromStr;

use anyhow::Result;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Default,
    Pretty,
    Json,
    Compact,
}

pub fn init(level: &str, mode: Mode) -> Result<()> {
    let env_filter = EnvFilter::from_str(level)?;

    let builder = tracing_subscriber::fmt()
        .with_line_number(true)
        .with_file(true)
        .with_env_filter(env_filter);

    match mode {
        Mode::Default => builder.finish().try_init(),
        Mode::Pretty => builder.pretty().finish().try_init(),
        Mode::Json => builder.json().finish().try_init(),
        Mode::Compact => builder.compact().finish().try_init(),
    }?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_from_config_strings() {
        let mode: Mode = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(mode, Mode::Json);

        let mode: Mode = serde_json::from_str("\"default\"").unwrap();
        assert_eq!(mode, Mode::Default);

        assert!(serde_json::from_str::<Mode>("\"verbose\"").is_err());
    }
}
