use crate::config::types::{
    CacheBackend, CacheConfig, Config, ExportConfig, ResolverConfig, MAX_TTL_HOURS,
};
use crate::ConfigError;

/// Upper bound on batch concurrency
const MAX_CONCURRENT_RESOLUTIONS: usize = 100;

/// Upper bound on followed page redirects
const MAX_REDIRECTS: u32 = 20;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_resolver_config(&config.resolver)?;
    validate_cache_config(&config.cache)?;
    validate_export_config(&config.export)?;
    Ok(())
}

/// Validates resolver configuration
fn validate_resolver_config(config: &ResolverConfig) -> Result<(), ConfigError> {
    let timeouts = [
        ("page-timeout-secs", config.page_timeout_secs),
        ("probe-timeout-secs", config.probe_timeout_secs),
        ("download-timeout-secs", config.download_timeout_secs),
    ];
    for (key, value) in timeouts {
        if value == 0 {
            return Err(ConfigError::Validation(format!("{} must be > 0", key)));
        }
    }

    if config.max_concurrent_resolutions < 1
        || config.max_concurrent_resolutions > MAX_CONCURRENT_RESOLUTIONS
    {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-resolutions must be between 1 and {}, got {}",
            MAX_CONCURRENT_RESOLUTIONS, config.max_concurrent_resolutions
        )));
    }

    if config.max_redirects > MAX_REDIRECTS {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be <= {}, got {}",
            MAX_REDIRECTS, config.max_redirects
        )));
    }

    if config.overall_deadline_secs == Some(0) {
        return Err(ConfigError::Validation(
            "overall-deadline-secs must be > 0 when set".to_string(),
        ));
    }

    if let Some(agent) = &config.user_agent {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.ttl_hours == 0 {
        return Err(ConfigError::Validation("ttl-hours must be > 0".to_string()));
    }

    if config.ttl_hours > MAX_TTL_HOURS {
        return Err(ConfigError::Validation(format!(
            "ttl-hours must be <= {} (got {})",
            MAX_TTL_HOURS, config.ttl_hours
        )));
    }

    if config.backend == CacheBackend::Sqlite && config.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty for the sqlite backend".to_string(),
        ));
    }

    Ok(())
}

/// Validates export configuration
fn validate_export_config(config: &ExportConfig) -> Result<(), ConfigError> {
    if config.menu_heading.trim().is_empty() {
        return Err(ConfigError::Validation(
            "menu-heading cannot be empty".to_string(),
        ));
    }

    if config.toolbar_heading.trim().is_empty() {
        return Err(ConfigError::Validation(
            "toolbar-heading cannot be empty".to_string(),
        ));
    }

    Ok(())
}
