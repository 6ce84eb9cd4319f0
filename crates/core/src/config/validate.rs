use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Catalog token is present
/// - Counter store identifiers are present
/// - Trending limit is at least 1
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.catalog.api_token.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.api_token is required".to_string(),
        ));
    }

    let store = &config.counter_store;
    for (name, value) in [
        ("endpoint", &store.endpoint),
        ("project_id", &store.project_id),
        ("database_id", &store.database_id),
        ("collection_id", &store.collection_id),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "counter_store.{} cannot be empty",
                name
            )));
        }
    }

    if config.search.trending_limit == 0 {
        return Err(ConfigError::ValidationError(
            "search.trending_limit must be at least 1".to_string(),
        ));
    }

    Ok(())
}
