use crate::config::types::{Config, OutputConfig, PlatformConfig, StoreConfig, TimingConfig};
use crate::ConfigError;
use scraper::Selector;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_platform_config(&config.platform)?;
    validate_item_pattern(config)?;
    validate_timing_config(&config.timing)?;
    validate_store_config(&config.store)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates platform markup configuration
fn validate_platform_config(config: &PlatformConfig) -> Result<(), ConfigError> {
    validate_domain_string(&config.domain)?;

    validate_selector(&config.comment_container)?;
    validate_selector(&config.logout_marker)?;

    if !config.profile_path_prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "profile-path-prefix must start with '/', got '{}'",
            config.profile_path_prefix
        )));
    }

    for fragment in &config.filler_fragments {
        if fragment.is_empty() {
            return Err(ConfigError::Validation(
                "filler-fragments cannot contain empty strings".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates that the item-link pattern compiles and captures an item id
fn validate_item_pattern(config: &Config) -> Result<(), ConfigError> {
    let pattern = config
        .item_pattern()
        .map_err(|e| ConfigError::InvalidPattern(format!("item-link-pattern: {}", e)))?;

    // Group 0 is the whole match; the id must come from an explicit group
    if pattern.captures_len() < 2 {
        return Err(ConfigError::InvalidPattern(
            "item-link-pattern must have a capture group for the item id".to_string(),
        ));
    }

    Ok(())
}

/// Validates timing configuration
fn validate_timing_config(config: &TimingConfig) -> Result<(), ConfigError> {
    if config.poll_interval_ms < 10 {
        return Err(ConfigError::Validation(format!(
            "poll-interval-ms must be >= 10ms, got {}ms",
            config.poll_interval_ms
        )));
    }

    if config.render_timeout_ms < config.poll_interval_ms {
        return Err(ConfigError::Validation(format!(
            "render-timeout-ms ({}ms) must be >= poll-interval-ms ({}ms)",
            config.render_timeout_ms, config.poll_interval_ms
        )));
    }

    Ok(())
}

/// Validates run store configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "store path cannot be empty".to_string(),
        ));
    }

    if let Some(days) = config.retention_days {
        if days < 1 {
            return Err(ConfigError::Validation(format!(
                "retention-days must be >= 1 when set, got {}",
                days
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.artifact_dir.is_empty() {
        return Err(ConfigError::Validation(
            "artifact-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a CSS selector string
fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}

/// Validates a domain string
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::Validation(
            "domain cannot be empty".to_string(),
        ));
    }

    // Check for invalid characters
    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    // Check that it doesn't start or end with a dot or hyphen
    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    // Check for consecutive dots
    if domain.contains("..") {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    // Must contain at least one dot (e.g., www.douyin.com, not just "douyin")
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' must contain at least one dot (e.g., 'www.douyin.com')",
            domain
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_domain_string() {
        assert!(validate_domain_string("www.douyin.com").is_ok());
        assert!(validate_domain_string("example.com").is_ok());

        assert!(validate_domain_string("").is_err());
        assert!(validate_domain_string("douyin").is_err());
        assert!(validate_domain_string(".douyin.com").is_err());
        assert!(validate_domain_string("douyin.com.").is_err());
        assert!(validate_domain_string("dou..yin.com").is_err());
        assert!(validate_domain_string("https://www.douyin.com").is_err());
    }

    #[test]
    fn test_validate_selector() {
        assert!(validate_selector(".comment-mainContent").is_ok());
        assert!(validate_selector("div.card > a").is_ok());

        let result = validate_selector("..(bad");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_pattern_without_capture_group_rejected() {
        let mut config = Config::default();
        config.platform.item_link_pattern = r#"href="//{domain}/video/\d+""#.to_string();

        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::InvalidPattern(_))));
    }

    #[test]
    fn test_pattern_that_does_not_compile_rejected() {
        let mut config = Config::default();
        config.platform.item_link_pattern = "href=(unclosed".to_string();

        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::InvalidPattern(_))));
    }

    #[test]
    fn test_timing_bounds() {
        let mut config = Config::default();
        config.timing.poll_interval_ms = 5;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.timing.render_timeout_ms = 100;
        config.timing.poll_interval_ms = 200;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_profile_prefix_must_be_absolute() {
        let mut config = Config::default();
        config.platform.profile_path_prefix = "user/".to_string();

        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_retention_days_zero_rejected() {
        let mut config = Config::default();
        config.store.retention_days = Some(0);

        assert!(validate(&config).is_err());
    }
}
