//! Machine Translation trait and utilities
//!
//! This module defines the `MachineTranslator` trait for provider abstraction,
//! enabling support for different MT backends (Google Translate, LibreTranslate,
//! mock, etc.) without coupling the transform core to any specific implementation.
//!
//! # Example
//!
//! ```ignore
//! use curly_translate::mt::{MachineTranslator, GoogleTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::from_env()?;
//!
//!     let result = provider.translate("Hello, world!", "en", "fr").await?;
//!     println!("{}", result); // "Bonjour, le monde!"
//!
//!     for language in provider.supported_languages().await? {
//!         println!("{} ({})", language.name, language.code);
//!     }
//!     Ok(())
//! }
//! ```

use crate::mt::error::MtResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A target language as presented to operators: an opaque code plus a display name
///
/// Codes are passed through to the provider untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    #[serde(default)]
    pub name: String,
}

impl Language {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    /// A language known only by its code. The display name falls back to the code.
    pub fn from_code(code: &str) -> Self {
        Self::new(code, code)
    }

    /// Display name, or the code when no name is known
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.code
        } else {
            &self.name
        }
    }
}

/// Languages offered when a provider cannot list its own
pub fn fallback_languages() -> Vec<Language> {
    vec![
        Language::new("hi", "Hindi"),
        Language::new("ml", "Malayalam"),
        Language::new("ta", "Tamil"),
        Language::new("ar", "Arabic"),
    ]
}

/// Generic trait for machine translation providers
///
/// Implementations of this trait handle the actual translation work,
/// whether through an API (Google Translate, LibreTranslate) or deterministic
/// logic (Mock).
///
/// All methods are async to support I/O-bound operations like network requests.
/// Callers in this crate await one request at a time.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target locale
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `source_locale` - Source language code (e.g., "en")
    /// * `target_locale` - Target language code (e.g., "hi")
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(MtError)` - If translation fails
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// List the target languages this provider accepts
    ///
    /// Providers without a listing endpoint return the fallback list.
    async fn supported_languages(&self) -> MtResult<Vec<Language>> {
        Ok(fallback_languages())
    }

    /// Get the name of this translation provider
    ///
    /// Used for logging to identify which provider handled a translation.
    fn provider_name(&self) -> &str;
}
