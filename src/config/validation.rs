use crate::config::types::{Config, OutputConfig, ScraperConfig, SelectorConfig};
use crate::ConfigError;
use scraper::Selector;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;

    if config.input.default_sitemap.trim().is_empty() {
        return Err(ConfigError::Validation(
            "default-sitemap cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates request behavior configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.checkpoint_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "checkpoint-interval must be >= 1, got {}",
            config.checkpoint_interval
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that both selectors compile
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    check_selector("author", &config.author)?;
    check_selector("title", &config.title)?;
    Ok(())
}

/// Parses a selector, mapping the failure to a config error
pub(crate) fn check_selector(field: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        field,
        message: format!("'{}': {:?}", selector, e),
    })
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    let paths = [
        ("csv-path", &config.csv_path),
        ("error-log-path", &config.error_log_path),
        ("progress-path", &config.progress_path),
    ];

    for (name, path) in paths {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    // The three files are rewritten independently, so they must not alias
    for i in 0..paths.len() {
        for j in (i + 1)..paths.len() {
            if paths[i].1 == paths[j].1 {
                return Err(ConfigError::Validation(format!(
                    "{} and {} must point to different files, both are '{}'",
                    paths[i].0, paths[j].0, paths[i].1
                )));
            }
        }
    }

    Ok(())
}
