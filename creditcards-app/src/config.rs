//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which persistence backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceKind {
    Memory,
    PayPal,
}

impl FromStr for PersistenceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(PersistenceKind::Memory),
            "paypal" => Ok(PersistenceKind::PayPal),
            other => Err(anyhow::anyhow!(
                "Unknown PERSISTENCE '{}', expected 'memory' or 'paypal'",
                other
            )),
        }
    }
}

/// PayPal vault settings, present when `PERSISTENCE=paypal`.
pub struct PayPalSettings {
    pub sandbox: bool,
    pub client_id: String,
    pub client_secret: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub persistence: PersistenceKind,
    pub paypal: Option<PayPalSettings>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = var("PORT").unwrap_or_else(|| "3000".to_string()).parse()?;

        let persistence = match var("PERSISTENCE") {
            Some(value) => value.parse()?,
            None => PersistenceKind::Memory,
        };

        let paypal = match persistence {
            PersistenceKind::Memory => None,
            PersistenceKind::PayPal => {
                let sandbox = match var("PAYPAL_SANDBOX") {
                    Some(value) => parse_bool(&value)?,
                    None => false,
                };
                let client_id = var("PAYPAL_CLIENT_ID").filter(|v| !v.is_empty()).ok_or_else(
                    || anyhow::anyhow!("PAYPAL_CLIENT_ID environment variable is required"),
                )?;
                let client_secret = var("PAYPAL_CLIENT_SECRET")
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| {
                        anyhow::anyhow!("PAYPAL_CLIENT_SECRET environment variable is required")
                    })?;
                let timeout_secs: u64 = var("PAYPAL_TIMEOUT_SECS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse()?;

                Some(PayPalSettings {
                    sandbox,
                    client_id,
                    client_secret,
                    base_url: var("PAYPAL_BASE_URL").filter(|v| !v.is_empty()),
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
        };

        Ok(Self {
            port,
            persistence,
            paypal,
        })
    }
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow::anyhow!("Invalid boolean value '{}'", other)),
    }
}
