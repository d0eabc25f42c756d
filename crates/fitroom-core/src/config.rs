//! Configuration loaded from the environment.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::{Error, Result};

/// Fixed per-request charges, in USD.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pricing {
    /// Cost of one try-on composition call.
    #[serde(rename = "tryOn")]
    pub try_on: Decimal,
    /// Surcharge when a garment image must be generated from text.
    pub generation: Decimal,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            try_on: dec!(0.05),
            generation: dec!(0.03),
        }
    }
}

/// Top-level fitroom configuration.
#[derive(Debug, Clone)]
pub struct FitroomConfig {
    /// HTTP server port.
    pub port: u16,
    /// fal.ai API key.
    pub fal_key: String,
    /// fal.ai base URL (overridable for tests and proxies).
    pub fal_base_url: String,
    /// Per-request pricing.
    pub pricing: Pricing,
    /// Shared per-user spending limit.
    pub user_limit: Decimal,
    /// Production mode suppresses raw error detail in responses.
    pub production: bool,
}

impl FitroomConfig {
    /// Read configuration from the environment. Missing FAL_KEY and
    /// malformed overrides are hard errors.
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3003);

        let fal_key = std::env::var("FAL_KEY")
            .map_err(|_| Error::Config("FAL_KEY is not set".into()))?;

        let fal_base_url = std::env::var("FAL_BASE_URL")
            .unwrap_or_else(|_| "https://fal.run".to_string());

        let defaults = Pricing::default();
        let pricing = Pricing {
            try_on: decimal_var("FITROOM_TRYON_COST", defaults.try_on)?,
            generation: decimal_var("FITROOM_GENERATION_COST", defaults.generation)?,
        };
        let user_limit = decimal_var("FITROOM_USER_LIMIT", dec!(0.50))?;

        let production = std::env::var("FITROOM_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            port,
            fal_key,
            fal_base_url,
            pricing,
            user_limit,
            production,
        })
    }
}

fn decimal_var(name: &str, default: Decimal) -> Result<Decimal> {
    match std::env::var(name) {
        Ok(raw) => Decimal::from_str(raw.trim())
            .map_err(|e| Error::Config(format!("{} is not a valid decimal: {}", name, e))),
        Err(_) => Ok(default),
    }
}
