//! Placeholder-preserving translation
//!
//! The transform at the heart of the crate. Given a string and a target
//! language it:
//!
//! 1. skips strings with nothing to translate (see [`is_symbolic_only`]),
//! 2. masks `{...}` placeholders with ordinal markers,
//! 3. sends the masked text to the configured [`MachineTranslator`],
//! 4. puts the placeholders back where the markers landed.
//!
//! Translation is advisory. [`PreservingTranslator::translate`] never fails: if
//! the provider errors, returns nothing, or loses a marker, the original text
//! comes back untouched and the reason is logged.

use crate::mt::error::{MtError, MtResult};
use crate::mt::placeholder::{mask_placeholders, placeholder_regex, restore_placeholders};
use crate::mt::translator::{Language, MachineTranslator};
use crate::table::Cell;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

/// Anything but letters, digits and the ASCII underscore
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_]").expect("non-word pattern is valid"));

/// True when `text` has no letters, digits or underscores outside its placeholders
///
/// Such strings (`""`, `"!!!"`, `"{a}{b}"`, `"{name}:"`) are left alone: there is
/// nothing for a translation engine to do with them. Letters and digits are
/// matched in the Unicode sense, so `"नमस्ते"` is not symbolic; combining marks
/// and connector punctuation other than `_` on their own are.
pub fn is_symbolic_only(text: &str) -> bool {
    let without_placeholders = placeholder_regex().replace_all(text, "");
    NON_WORD
        .replace_all(&without_placeholders, "")
        .trim()
        .is_empty()
}

/// Translator wrapper that keeps placeholders intact
///
/// Cheap to clone; clones share the provider.
#[derive(Clone)]
pub struct PreservingTranslator {
    backend: Arc<dyn MachineTranslator>,
    source_language: String,
}

impl PreservingTranslator {
    /// Wrap a provider. Source language defaults to English.
    pub fn new(backend: Arc<dyn MachineTranslator>) -> Self {
        Self {
            backend,
            source_language: "en".to_string(),
        }
    }

    pub fn with_source_language(mut self, code: &str) -> Self {
        self.source_language = code.to_string();
        self
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn provider_name(&self) -> &str {
        self.backend.provider_name()
    }

    /// Languages the provider accepts
    pub async fn supported_languages(&self) -> MtResult<Vec<Language>> {
        self.backend.supported_languages().await
    }

    /// Translate `text`, reporting why a translation could not be produced
    ///
    /// Symbolic-only text is returned unchanged without contacting the provider.
    ///
    /// # Errors
    /// * Whatever the provider reports (network, HTTP status, malformed body)
    /// * `MtError::TranslationError` when the provider returns blank text
    /// * `MtError::MarkerError` when a placeholder marker was lost on the way
    pub async fn try_translate(&self, text: &str, target_language: &str) -> MtResult<String> {
        if is_symbolic_only(text) {
            return Ok(text.to_string());
        }

        let masked = mask_placeholders(text);
        let translated = self
            .backend
            .translate(&masked.text, &self.source_language, target_language)
            .await?;

        if translated.trim().is_empty() {
            return Err(MtError::TranslationError(format!(
                "{} returned an empty translation",
                self.backend.provider_name()
            )));
        }

        if !masked.has_markers() {
            return Ok(translated);
        }

        let restored = restore_placeholders(&translated, &masked.markers)?;
        if restored.reordering_detected {
            debug!(
                target_language,
                "Placeholders reordered in translation of {:?}", text
            );
        }
        Ok(restored.text)
    }

    /// Translate `text`, falling back to the original on any failure
    pub async fn translate(&self, text: &str, target_language: &str) -> String {
        match self.try_translate(text, target_language).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(
                    provider = self.backend.provider_name(),
                    target_language, "Keeping original text {:?}: {}", text, e
                );
                text.to_string()
            }
        }
    }

    /// Translate a table cell. Only text cells are ever sent to the provider.
    pub async fn translate_cell(&self, cell: &Cell, target_language: &str) -> Cell {
        match cell {
            Cell::Text(text) => Cell::Text(self.translate(text, target_language).await),
            other => other.clone(),
        }
    }
}

impl std::fmt::Debug for PreservingTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreservingTranslator")
            .field("provider", &self.backend.provider_name())
            .field("source_language", &self.source_language)
            .finish()
    }
}
