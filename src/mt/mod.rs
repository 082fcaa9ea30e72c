/// Machine Translation Module
///
/// Translation providers and the placeholder-preserving wrapper that sits in
/// front of them.
///
/// # Overview
///
/// 1. **MT Trait & Providers** - Generic trait for MT systems with Google Translate,
///    LibreTranslate and mock implementations
/// 2. **Placeholder Masking** - Swaps `{name}` tokens for ordinal markers before
///    translation and restores them afterwards
/// 3. **Preserving Translator** - Skips symbolic-only strings and falls back to the
///    source text whenever a translation cannot be trusted
///
/// # Example
///
/// ```ignore
/// use curly_translate::mt::{GoogleTranslateProvider, PreservingTranslator};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = GoogleTranslateProvider::from_env()?;
///     let translator = PreservingTranslator::new(Arc::new(provider));
///
///     // "{name}" survives the round trip
///     let hindi = translator.translate("Hello {name}!", "hi").await;
///     println!("{}", hindi);
///     Ok(())
/// }
/// ```
pub mod error;
pub mod google_translate;
pub mod libre_translate;
pub mod mock;
pub mod placeholder;
pub mod preserving;
pub mod translator;

pub use error::{MtError, MtResult};
pub use google_translate::GoogleTranslateProvider;
pub use libre_translate::LibreTranslateProvider;
pub use mock::{MockMode, MockTranslator};
pub use placeholder::{MaskedText, find_placeholders, mask_placeholders, restore_placeholders};
pub use preserving::{PreservingTranslator, is_symbolic_only};
pub use translator::{Language, MachineTranslator, fallback_languages};
