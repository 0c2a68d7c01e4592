use thiserror::Error;

/// Error types for Google OAuth and Photos Library operations
#[derive(Error, Debug)]
pub enum GPhotosError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Failed to encode request body: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("HTTP error: {status}: {body}")]
    Http { status: u16, body: String },

    #[error("OAuth error: {error}: {description}")]
    OAuth { error: String, description: String },

    #[error("Malformed response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JWT decode error: {0}")]
    JwtDecode(#[from] jsonwebtoken::errors::Error),

    #[error("Missing claim in JWT: {0}")]
    MissingJwtClaim(String),

    #[cfg(feature = "browser")]
    #[error("Failed to open browser: {0}")]
    BrowserLaunch(String),
}

impl GPhotosError {
    /// Transport failure, timeout or cancellation
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Transport(_) | Self::Cancelled)
    }

    /// The remote answered, but not with something we could use
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::OAuth { .. } | Self::Decode(_)
        )
    }

    /// Local serialization failure
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for gphotos-client operations
pub type Result<T> = std::result::Result<T, GPhotosError>;
