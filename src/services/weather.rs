// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Current-weather lookup proxied to an OpenWeatherMap-compatible API.

use crate::config::Config;
use crate::error::AppError;
use anyhow::Context;
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Weather API client.
#[derive(Clone)]
pub struct WeatherService {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherService {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("failed building weather HTTP client")?;

        if config.weather_api_key.is_none() {
            tracing::warn!("WEATHER_API_KEY not set; /api/weather will fail");
        }

        Ok(Self {
            http,
            base_url: config.weather_api_url.clone(),
            api_key: config.weather_api_key.clone(),
        })
    }

    fn request_url(&self, place: &str, api_key: &str) -> String {
        format!(
            "{}?q={}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(place),
            urlencoding::encode(api_key)
        )
    }

    /// Current conditions for a place name, passed through as upstream JSON.
    pub async fn current(&self, place: &str) -> Result<serde_json::Value, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("Weather API key not configured".to_string()))?;

        let response = self
            .http
            .get(self.request_url(place, api_key))
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid weather response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_encodes_place() {
        let weather = WeatherService::new(&Config::test_default()).unwrap();
        let url = weather.request_url("São Paulo, BR", "k&y");

        assert_eq!(
            url,
            "https://api.openweathermap.org/data/2.5/weather?q=S%C3%A3o%20Paulo%2C%20BR&appid=k%26y&units=metric"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_is_upstream_error() {
        let weather = WeatherService::new(&Config::test_default()).unwrap();
        let err = weather.current("Rome").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
