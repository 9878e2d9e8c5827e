use crate::config::types::{Config, CrawlerConfig, PolicyConfig, SeedEntry, SeenBackend};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_policy_config(&config.policy)?;
    validate_seen_config(config)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 256 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 256, got {}",
            config.workers
        )));
    }

    if config.fetch_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_ms must be >= 100ms, got {}ms",
            config.fetch_timeout_ms
        )));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 20, got {}",
            config.max_redirects
        )));
    }

    if let Some(secs) = config.epoch_timeout_secs {
        if secs == 0 {
            return Err(ConfigError::Validation(
                "epoch_timeout_secs must be > 0 when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(
    config: &crate::config::types::UserAgentConfig,
) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates policy configuration
fn validate_policy_config(config: &PolicyConfig) -> Result<(), ConfigError> {
    for entry in &config.blocked_substrings {
        if entry.is_empty() {
            return Err(ConfigError::Validation(
                "blocked_substrings entries cannot be empty".to_string(),
            ));
        }
    }

    for pattern in &config.blocked_domains {
        validate_domain_pattern(pattern)?;
    }

    Ok(())
}

/// Validates seen-set configuration
fn validate_seen_config(config: &Config) -> Result<(), ConfigError> {
    if config.seen.backend == SeenBackend::Sqlite {
        match &config.seen.database_path {
            Some(path) if !path.is_empty() => {}
            _ => {
                return Err(ConfigError::Validation(
                    "seen.database_path is required for the sqlite backend".to_string(),
                ))
            }
        }
    }

    Ok(())
}

/// Validates seed entries
fn validate_seeds(seeds: &[SeedEntry]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in seeds {
        let url = Url::parse(&seed.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed.url, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' must use http or https",
                seed.url
            )));
        }
    }

    Ok(())
}

/// Validates a domain pattern (exact or "*.domain")
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    let base = pattern.strip_prefix("*.").unwrap_or(pattern);

    if base.is_empty() || base.contains('*') || base.contains('/') || base.contains(' ') {
        return Err(ConfigError::Validation(format!(
            "Invalid domain pattern: '{}'",
            pattern
        )));
    }

    Ok(())
}

/// Basic email validation: one '@' with non-empty local and domain parts
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid contact_email: '{}'",
            email
        )));
    }

    Ok(())
}
