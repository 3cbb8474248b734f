use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Resolver attempt/cap counts are not 0
/// - Client base URLs are not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.resolver.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.max_attempts cannot be 0".to_string(),
        ));
    }

    if config.resolver.resolution_cap == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.resolution_cap cannot be 0".to_string(),
        ));
    }

    if config.recommender.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "recommender.base_url cannot be empty".to_string(),
        ));
    }

    if config.catalog.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.base_url cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_validate_zero_attempts_fails() {
        let mut config = Config::default();
        config.resolver.max_attempts = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_base_url_fails() {
        let mut config = Config::default();
        config.recommender.base_url = String::new();
        assert!(validate_config(&config).is_err());
    }
}
