/// Error types for the Machine Translation module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// Missing or invalid provider configuration (API key, URL, config file)
    ConfigError(String),
    /// Transport failure while talking to the provider
    NetworkError(String),
    /// The provider answered, but not with a usable translation
    TranslationError(String),
    /// A placeholder marker did not survive the round trip through the provider
    MarkerError(String),
    /// A string resource document could not be read or written
    ResourceError(String),
    /// General error with context
    Other(String),
}

impl std::fmt::Display for MtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MtError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            MtError::TranslationError(msg) => write!(f, "Translation error: {}", msg),
            MtError::MarkerError(msg) => write!(f, "Marker error: {}", msg),
            MtError::ResourceError(msg) => write!(f, "Resource error: {}", msg),
            MtError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MtError {}

/// The request URL is stripped; it may carry credentials
impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        MtError::NetworkError(err.without_url().to_string())
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;
