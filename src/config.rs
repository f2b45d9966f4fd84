// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::services::session::MAX_SESSION_TTL_DAYS;
use std::env;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL (CORS origin and cookie security)
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Upper bound on pooled Postgres connections
    pub database_max_connections: u32,
    /// Session lifetime in days
    pub session_ttl_days: i64,
    /// Current-weather endpoint
    pub weather_api_url: String,

    // --- Secrets ---
    /// Postgres connection string
    pub database_url: String,
    /// HMAC key for session tokens (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// Weather API key; the proxy answers 500 when unset
    pub weather_api_key: Option<String>,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            port: 8080,
            database_max_connections: 5,
            session_ttl_days: 7,
            weather_api_url: DEFAULT_WEATHER_API_URL.to_string(),
            database_url: "postgres://localhost/trip_planner_test".to_string(),
            session_signing_key: b"test_session_key_32_bytes_min!!!".to_vec(),
            weather_api_key: None,
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let session_signing_key = env::var("SESSION_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
            .trim()
            .to_string();
        if session_signing_key.len() < 32 {
            return Err(ConfigError::Invalid(
                "SESSION_SIGNING_KEY",
                "must be at least 32 bytes".to_string(),
            ));
        }

        let session_ttl_days = parse_or("SESSION_TTL_DAYS", 7)?;
        if !(1..=MAX_SESSION_TTL_DAYS).contains(&session_ttl_days) {
            return Err(ConfigError::Invalid(
                "SESSION_TTL_DAYS",
                format!("must be between 1 and {}", MAX_SESSION_TTL_DAYS),
            ));
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            port: parse_or("PORT", 8080)?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            session_ttl_days,
            weather_api_url: env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| DEFAULT_WEATHER_API_URL.to_string()),

            database_url: env::var("DATABASE_URL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            session_signing_key: session_signing_key.into_bytes(),
            weather_api_key: env::var("WEATHER_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    /// Session cookies get the `Secure` attribute when the frontend is served over https.
    pub fn cookie_secure(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(key, e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
