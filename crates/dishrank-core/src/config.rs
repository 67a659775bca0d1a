use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let places_api_key = require("DISHRANK_PLACES_API_KEY")?;
    let extract_api_key = require("DISHRANK_EXTRACT_API_KEY")?;

    let env = parse_environment(&or_default("DISHRANK_ENV", "development"));
    let log_level = or_default("DISHRANK_LOG_LEVEL", "info");

    let places_base_url = or_default(
        "DISHRANK_PLACES_BASE_URL",
        "https://maps.googleapis.com/maps/api",
    );
    let extract_base_url = or_default(
        "DISHRANK_EXTRACT_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let extract_model = or_default("DISHRANK_EXTRACT_MODEL", "gemini-2.5-flash");

    let request_timeout_secs = parse_u64("DISHRANK_REQUEST_TIMEOUT_SECS", "10")?;
    let extract_max_concurrent = parse_usize("DISHRANK_EXTRACT_MAX_CONCURRENT", "4")?;
    let cache_ttl_secs = parse_u64("DISHRANK_CACHE_TTL_SECS", "900")?;
    let top_dishes = parse_usize("DISHRANK_TOP_DISHES", "10")?;

    Ok(AppConfig {
        env,
        log_level,
        places_api_key,
        places_base_url,
        extract_api_key,
        extract_base_url,
        extract_model,
        request_timeout_secs,
        extract_max_concurrent,
        cache_ttl_secs,
        top_dishes,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
