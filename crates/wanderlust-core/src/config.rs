use crate::app_config::{AppConfig, ClientConfig, Environment};
use crate::ConfigError;

/// Load server configuration from environment variables.
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

/// Load server configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load client configuration from the environment (after loading `.env`).
///
/// Every client setting has a default, so this only fails on malformed values.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if a numeric setting does not parse.
pub fn load_client_config() -> Result<ClientConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_client_config(|key| std::env::var(key))
}

/// Typed readers over an env-var lookup function.
///
/// Keeps parsing decoupled from the real environment so tests can feed a
/// plain `HashMap`.
struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    fn require(&self, var: &str) -> Result<String, ConfigError> {
        (self.lookup)(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    }

    fn or_default(&self, var: &str, default: &str) -> String {
        (self.lookup)(var).unwrap_or_else(|_| default.to_string())
    }

    fn parse<T>(&self, var: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.or_default(var, default);
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    }
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let env_reader = EnvReader { lookup };

    let database_url = env_reader.require("DATABASE_URL")?;
    let env = parse_environment(&env_reader.or_default("WANDERLUST_ENV", "development"));
    let bind_addr = env_reader.parse("WANDERLUST_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = env_reader.or_default("WANDERLUST_LOG_LEVEL", "info");

    let db_max_connections = env_reader.parse("WANDERLUST_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = env_reader.parse("WANDERLUST_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = env_reader.parse("WANDERLUST_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let default_page_size: u32 = env_reader.parse("WANDERLUST_DEFAULT_PAGE_SIZE", "12")?;
    let max_page_size: u32 = env_reader.parse("WANDERLUST_MAX_PAGE_SIZE", "48")?;
    if default_page_size == 0 || default_page_size > max_page_size {
        return Err(ConfigError::InvalidEnvVar {
            var: "WANDERLUST_DEFAULT_PAGE_SIZE".to_string(),
            reason: format!("must be between 1 and WANDERLUST_MAX_PAGE_SIZE ({max_page_size})"),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        default_page_size,
        max_page_size,
    })
}

fn build_client_config<F>(lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let env_reader = EnvReader { lookup };

    let page_size: u32 = env_reader.parse("WANDERLUST_CLIENT_PAGE_SIZE", "12")?;
    if page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "WANDERLUST_CLIENT_PAGE_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(ClientConfig {
        api_base_url: env_reader.or_default("WANDERLUST_API_BASE_URL", "http://127.0.0.1:3000"),
        page_size,
        filter_debounce_ms: env_reader.parse("WANDERLUST_FILTER_DEBOUNCE_MS", "300")?,
        request_timeout_secs: env_reader.parse("WANDERLUST_CLIENT_TIMEOUT_SECS", "30")?,
        user_agent: env_reader.or_default("WANDERLUST_CLIENT_USER_AGENT", "wanderlust/0.1 (browse)"),
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
