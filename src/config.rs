use std::{str::FromStr, time::Duration};

use anyhow::{bail, Context, Result};

pub const DEFAULT_SENSOR_URL: &str = "https://esp32-water-backend.onrender.com/api/water-level";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    /// Upper bound on pooled connections; extra callers wait for a free one.
    pub db_max_connections: u32,
    /// Applied both to pool acquisition and to every store operation.
    pub db_timeout: Duration,
    pub server_host: String,
    pub server_port: u16,
    pub sensor_url: String,
    pub sensor_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);
        Ok(Self {
            db_host: vars.required("DB_HOST")?,
            db_port: vars.parsed("DB_PORT", "5432")?,
            db_user: vars.required("DB_USER")?,
            db_password: vars.required("DB_PASSWORD")?,
            db_name: vars.required("DB_NAME")?,
            db_max_connections: vars.parsed("DB_MAX_CONNECTIONS", "10")?,
            db_timeout: vars.secs("DB_TIMEOUT_SECS", "5")?,
            server_host: vars.optional("SERVER_HOST", "0.0.0.0"),
            server_port: vars.parsed("PORT", "5000")?,
            sensor_url: vars.optional("SENSOR_URL", DEFAULT_SENSOR_URL),
            sensor_timeout: vars.secs("SENSOR_TIMEOUT_SECS", "10")?,
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn required(&self, key: &str) -> Result<String> {
        (self.0)(key).with_context(|| format!("missing required env var: {key}"))
    }

    fn optional(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_owned())
    }

    fn parsed<T>(&self, key: &str, default: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.optional(key, default)
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number"))
    }

    fn secs(&self, key: &str, default: &str) -> Result<Duration> {
        let secs: u64 = self.parsed(key, default)?;
        if secs == 0 {
            bail!("{key} must be greater than zero");
        }
        Ok(Duration::from_secs(secs))
    }
}
