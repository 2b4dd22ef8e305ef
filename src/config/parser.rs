use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use clipsieve::config::load_config;
///
/// let config = load_config(Path::new("clipsieve.toml")).unwrap();
/// println!("Platform: {}", config.platform.domain);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is used to tell apart runs driven by different configurations.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok((Config, String))` - Successfully loaded configuration and its hash
/// * `Err(ConfigError)` - Failed to load or parse the configuration
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Loads a configuration file if one exists, falling back to defaults
///
/// The hash is `None` when the defaults were used.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok((Config, Option<String>))` - The configuration and its hash, if read from disk
/// * `Err(ConfigError)` - The file exists but failed to load, parse, or validate
pub fn load_config_or_default(path: &Path) -> Result<(Config, Option<String>), ConfigError> {
    if !path.exists() {
        let config = Config::default();
        validate(&config)?;
        return Ok((config, None));
    }

    let (config, hash) = load_config_with_hash(path)?;
    Ok((config, Some(hash)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[platform]
domain = "www.douyin.com"
comment-container = ".comment-mainContent"

[timing]
render-timeout-ms = 3000
poll-interval-ms = 100

[store]
path = "./runs.db"
retention-days = 1

[query]
search-term = "street food"
filter-keywords = ["recipe"]
item-limit = 3
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.platform.domain, "www.douyin.com");
        assert_eq!(config.timing.render_timeout_ms, 3000);
        assert_eq!(config.store.retention_days, Some(1));
        assert_eq!(config.query.search_term, "street food");
        assert_eq!(config.query.item_limit, 3);
        // Omitted fields fall back to their defaults
        assert_eq!(config.timing.reveal_settle_ms, 2000);
        assert_eq!(config.output.artifact_dir, ".");
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.platform.domain, "www.douyin.com");
        assert_eq!(config.platform.comment_container, ".comment-mainContent");
        assert_eq!(config.query.item_limit, 5);
        assert_eq!(config.store.retention_days, None);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/clipsieve.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[platform]
domain = "not a domain"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let config_content = "test content";
        let file = create_temp_config(config_content);

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_load_config_or_default_without_file() {
        let (config, hash) =
            load_config_or_default(Path::new("/nonexistent/clipsieve.toml")).unwrap();

        assert!(hash.is_none());
        assert_eq!(config.platform.domain, "www.douyin.com");
    }

    #[test]
    fn test_load_config_or_default_with_file() {
        let file = create_temp_config("[query]\nitem-limit = 2\n");
        let (config, hash) = load_config_or_default(file.path()).unwrap();

        assert_eq!(config.query.item_limit, 2);
        assert!(hash.is_some());
    }
}
