//! Google Translate API provider for machine translation
//!
//! This module integrates with Google Translate API v2 to provide real
//! machine translation capabilities.
//!
//! # Authentication
//!
//! The provider takes the API key from the configuration file or, failing
//! that, from the `GOOGLE_TRANSLATE_API_KEY` environment variable. Obtain a key
//! from: https://console.cloud.google.com/
//!
//! # Example
//!
//! ```ignore
//! use curly_translate::mt::{MachineTranslator, GoogleTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::from_env()?;
//!     let result = provider.translate("Hello, world!", "en", "hi").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{Language, MachineTranslator};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

/// Environment variable holding the Google Translate API key
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

/// The key travels in a header so it never appears in request URLs
const API_KEY_HEADER: &str = "X-goog-api-key";

/// Google Translate API v2 provider
///
/// Sends one request per text. Language codes are passed through as given.
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// API key for authentication
    api_key: String,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL for Google Translate API
    base_url: String,
}

impl GoogleTranslateProvider {
    /// Maximum characters per string (30KB per Google Translate API limits)
    const MAX_CHARS_PER_STRING: usize = 30_000;

    const DEFAULT_BASE_URL: &'static str = "https://translation.googleapis.com/language/translate/v2";

    /// Create a new GoogleTranslateProvider with an explicit API key
    ///
    /// # Arguments
    ///
    /// * `api_key` - Google Translate API key
    /// * `timeout` - Per-request timeout; `None` waits for as long as the service takes
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(MtError)` - If API key is empty or HTTP client creation fails
    pub fn new(api_key: String, timeout: Option<Duration>) -> MtResult<Self> {
        if api_key.trim().is_empty() {
            return Err(MtError::ConfigError("API key cannot be empty".to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create a GoogleTranslateProvider from the `GOOGLE_TRANSLATE_API_KEY` environment variable
    pub fn from_env() -> MtResult<Self> {
        let api_key = std::env::var(GOOGLE_API_KEY_ENV).map_err(|_| {
            MtError::ConfigError(format!("{} environment variable not set", GOOGLE_API_KEY_ENV))
        })?;

        Self::new(api_key, None)
    }

    /// Point the provider at a different endpoint (proxies, test servers)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Check the HTTP status and decode the JSON body
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

/// Extract the first `translatedText` from a v2 translate response
fn parse_translation_response(json: &Value) -> MtResult<String> {
    let translations = json["data"]["translations"].as_array().ok_or_else(|| {
        MtError::TranslationError(
            "Invalid API response: missing 'data.translations' array".to_string(),
        )
    })?;

    translations
        .first()
        .and_then(|t| t["translatedText"].as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            MtError::TranslationError(
                "Invalid API response: missing 'translatedText' field".to_string(),
            )
        })
}

/// Extract `{language, name}` pairs from a v2 languages response
fn parse_languages_response(json: &Value) -> MtResult<Vec<Language>> {
    let languages = json["data"]["languages"].as_array().ok_or_else(|| {
        MtError::TranslationError("Invalid API response: missing 'data.languages' array".to_string())
    })?;

    Ok(languages
        .iter()
        .filter_map(|l| {
            let code = l["language"].as_str()?;
            let name = l["name"].as_str().unwrap_or(code);
            Some(Language::new(code, name))
        })
        .collect())
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        if text.len() > Self::MAX_CHARS_PER_STRING {
            return Err(MtError::TranslationError(format!(
                "Text exceeds maximum length of {} characters",
                Self::MAX_CHARS_PER_STRING
            )));
        }

        let body = json!({
            "q": [text],
            "source": source_locale,
            "target": target_locale,
            "format": "text"
        });

        let response = self
            .client
            .post(&self.base_url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let json = Self::read_json(response).await?;
        parse_translation_response(&json)
    }

    async fn supported_languages(&self) -> MtResult<Vec<Language>> {
        let url = format!("{}/languages?target=en", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let json = Self::read_json(response).await?;
        parse_languages_response(&json)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}
