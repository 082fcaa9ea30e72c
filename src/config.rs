//! Run configuration
//!
//! Everything that used to be hard-coded per script (input file names, target
//! languages, output folder, column naming, provider) lives in one TOML file.
//! Every field has a default, so an empty file, or no file at all, is valid.
//!
//! ```toml
//! source_language = "en"
//! column_naming = "code"
//! output_dir = "translated"
//!
//! [[languages]]
//! code = "hi"
//! name = "Hindi"
//!
//! [backend]
//! kind = "libre"
//! url = "https://libretranslate.com"
//! timeout_secs = 30
//! ```

use crate::batch::ColumnNaming;
use crate::mt::error::{MtError, MtResult};
use crate::mt::google_translate::{GOOGLE_API_KEY_ENV, GoogleTranslateProvider};
use crate::mt::libre_translate::{DEFAULT_LIBRE_URL, LIBRE_API_KEY_ENV, LibreTranslateProvider};
use crate::mt::mock::{MockMode, MockTranslator};
use crate::mt::preserving::PreservingTranslator;
use crate::mt::translator::{Language, MachineTranslator};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Google,
    Libre,
    /// Offline: returns text unchanged
    Mock,
}

impl std::str::FromStr for BackendKind {
    type Err = MtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(BackendKind::Google),
            "libre" | "libretranslate" => Ok(BackendKind::Libre),
            "mock" | "none" | "offline" => Ok(BackendKind::Mock),
            other => Err(MtError::ConfigError(format!("Unknown backend '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Falls back to the provider's environment variable when unset
    pub api_key: Option<String>,
    /// Instance URL, LibreTranslate only
    pub url: String,
    /// No timeout unless set
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            api_key: None,
            url: DEFAULT_LIBRE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl BackendConfig {
    fn api_key_or_env(&self, env_var: &str) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(env_var).ok())
    }

    /// Instantiate the configured provider
    pub fn build(&self) -> MtResult<Arc<dyn MachineTranslator>> {
        let timeout = self.timeout_secs.map(Duration::from_secs);
        Ok(match self.kind {
            BackendKind::Google => {
                let api_key = self.api_key_or_env(GOOGLE_API_KEY_ENV).ok_or_else(|| {
                    MtError::ConfigError(format!(
                        "No Google Translate API key: set backend.api_key or {}",
                        GOOGLE_API_KEY_ENV
                    ))
                })?;
                Arc::new(GoogleTranslateProvider::new(api_key, timeout)?)
            }
            BackendKind::Libre => Arc::new(LibreTranslateProvider::new(
                &self.url,
                self.api_key_or_env(LIBRE_API_KEY_ENV),
                timeout,
            )?),
            BackendKind::Mock => Arc::new(MockTranslator::new(MockMode::NoOp)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source_language: String,
    pub languages: Vec<Language>,
    pub column_naming: ColumnNaming,
    /// Columns to translate; empty means every column of the first input file
    pub columns: Vec<String>,
    pub output_dir: PathBuf,
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
    pub web: WebConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            languages: default_languages(),
            column_naming: ColumnNaming::default(),
            columns: Vec::new(),
            output_dir: PathBuf::from("translated"),
            backend: BackendConfig::default(),
            logging: LoggingConfig::default(),
            web: WebConfig::default(),
        }
    }
}

fn default_languages() -> Vec<Language> {
    vec![
        Language::new("ml", "Malayalam"),
        Language::new("hi", "Hindi"),
        Language::new("sa", "Sanskrit"),
        Language::new("ta", "Tamil"),
        Language::new("ar", "Arabic"),
    ]
}

impl Config {
    pub fn from_toml_str(content: &str) -> MtResult<Self> {
        toml::from_str(content).map_err(|e| MtError::ConfigError(e.to_string()))
    }

    pub fn load(path: &Path) -> MtResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MtError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| MtError::ConfigError(format!("{} ({})", e, path.display())))
    }

    /// Load `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> MtResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Look up a configured language by code; unknown codes get the code as name
    pub fn language(&self, code: &str) -> Language {
        self.languages
            .iter()
            .find(|l| l.code == code)
            .cloned()
            .unwrap_or_else(|| Language::from_code(code))
    }

    /// The configured provider wrapped for placeholder-preserving translation
    pub fn build_translator(&self) -> MtResult<PreservingTranslator> {
        Ok(PreservingTranslator::new(self.backend.build()?)
            .with_source_language(&self.source_language))
    }
}
