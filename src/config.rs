use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

use crate::auth::{messages::Locale, password::HashParams, validation::ValidationPolicy};

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub hash: HashParams,
    pub locale: Locale,
    pub validation: ValidationPolicy,
    /// Render unknown-user logins exactly like wrong-password logins.
    pub uniform_login_errors: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let auth = AuthConfig {
            hash: hash_params_from_env()?,
            locale: env_or("AUTH_LOCALE", Locale::default())?,
            validation: env_or("AUTH_VALIDATION", ValidationPolicy::default())?,
            uniform_login_errors: env_or("AUTH_UNIFORM_LOGIN_ERRORS", false)?,
        };
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://db.sqlite".into()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 3000)?,
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| ".".into()),
            auth,
        })
    }
}

fn hash_params_from_env() -> anyhow::Result<HashParams> {
    let defaults = HashParams::default();
    let params = HashParams {
        memory_kib: env_or("HASH_MEMORY_KIB", defaults.memory_kib)?,
        iterations: env_or("HASH_ITERATIONS", defaults.iterations)?,
        parallelism: env_or("HASH_PARALLELISM", defaults.parallelism)?,
    };
    params.validate().context("invalid HASH_* settings")?;
    Ok(params)
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}
