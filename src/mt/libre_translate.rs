//! LibreTranslate provider
//!
//! Talks to a LibreTranslate instance (the public `libretranslate.com` service or
//! a self-hosted one). Public instances require an API key; self-hosted ones
//! usually do not, so the key is optional here.
//!
//! Endpoints used:
//! - `POST {url}/translate` with `{q, source, target, format, api_key?}`,
//!   answering `{"translatedText": "..."}`
//! - `GET {url}/languages`, answering `[{"code": "hi", "name": "Hindi"}, ...]`

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{Language, MachineTranslator};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

/// Environment variable holding the LibreTranslate API key
pub const LIBRE_API_KEY_ENV: &str = "LIBRETRANSLATE_API_KEY";

/// Default public LibreTranslate instance
pub const DEFAULT_LIBRE_URL: &str = "https://libretranslate.com";

#[derive(Clone)]
pub struct LibreTranslateProvider {
    api_key: Option<String>,
    client: reqwest::Client,
    base_url: String,
}

impl LibreTranslateProvider {
    /// Create a provider for the instance at `base_url`
    ///
    /// # Arguments
    ///
    /// * `base_url` - Instance root, e.g. `https://libretranslate.com`
    /// * `api_key` - Optional key; blank keys are treated as absent
    /// * `timeout` - Per-request timeout; `None` waits indefinitely
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Option<Duration>) -> MtResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(MtError::ConfigError(
                "LibreTranslate URL cannot be empty".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Public instance, key taken from `LIBRETRANSLATE_API_KEY` when set
    pub fn from_env() -> MtResult<Self> {
        Self::new(DEFAULT_LIBRE_URL, std::env::var(LIBRE_API_KEY_ENV).ok(), None)
    }

    fn request_body(&self, text: &str, source_locale: &str, target_locale: &str) -> Value {
        let mut body = json!({
            "q": text,
            "source": source_locale,
            "target": target_locale,
            "format": "text"
        });
        if let Some(key) = &self.api_key {
            body["api_key"] = json!(key);
        }
        body
    }

    async fn read_json(response: reqwest::Response) -> MtResult<Value> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(if status.is_client_error() {
                MtError::ConfigError(format!("API client error ({}): {}", status, error_text))
            } else {
                MtError::TranslationError(format!("API server error ({}): {}", status, error_text))
            });
        }

        response.json().await.map_err(|e| {
            MtError::TranslationError(format!("Failed to parse API response: {}", e))
        })
    }
}

fn parse_translation_response(json: &Value) -> MtResult<String> {
    if let Some(error) = json["error"].as_str() {
        return Err(MtError::TranslationError(error.to_string()));
    }
    json["translatedText"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| {
            MtError::TranslationError(
                "Invalid API response: missing 'translatedText' field".to_string(),
            )
        })
}

fn parse_languages_response(json: &Value) -> MtResult<Vec<Language>> {
    let languages = json.as_array().ok_or_else(|| {
        MtError::TranslationError("Invalid API response: expected a language array".to_string())
    })?;

    Ok(languages
        .iter()
        .filter_map(|l| {
            let code = l["code"].as_str()?;
            Some(Language::new(code, l["name"].as_str().unwrap_or(code)))
        })
        .collect())
}

impl std::fmt::Debug for LibreTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibreTranslateProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for LibreTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let url = format!("{}/translate", self.base_url);
        let body = self.request_body(text, source_locale, target_locale);
        let response = self.client.post(&url).json(&body).send().await?;
        let json = Self::read_json(response).await?;
        parse_translation_response(&json)
    }

    async fn supported_languages(&self) -> MtResult<Vec<Language>> {
        let url = format!("{}/languages", self.base_url);
        let response = self.client.get(&url).send().await?;
        let json = Self::read_json(response).await?;
        parse_languages_response(&json)
    }

    fn provider_name(&self) -> &str {
        "LibreTranslate"
    }
}
