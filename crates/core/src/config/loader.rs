use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides.
///
/// Nested keys are separated by a double underscore so that field names
/// containing underscores survive, e.g. `MARQUEE_CATALOG__API_TOKEN`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("MARQUEE_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID: &str = r#"
[server]
port = 9000

[catalog]
api_token = "tmdb-token"

[counter_store]
project_id = "proj"
database_id = "db"
collection_id = "metrics"
"#;

    #[test]
    fn test_load_config_from_str_valid() {
        let config = load_config_from_str(VALID).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.catalog.api_token, "tmdb-token");
        assert_eq!(config.counter_store.collection_id, "metrics");
    }

    #[test]
    fn test_load_config_from_str_missing_catalog() {
        let toml = r#"
[counter_store]
project_id = "proj"
database_id = "db"
collection_id = "metrics"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"
port = 3000

[catalog]
api_token = "abc"

[counter_store]
endpoint = "http://localhost:8090/v1"
project_id = "proj"
database_id = "db"
collection_id = "metrics"

[search]
debounce_ms = 250
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.counter_store.endpoint, "http://localhost:8090/v1");
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.trending_limit, 5);
    }
}
