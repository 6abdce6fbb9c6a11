//! Error types for the standard updater controller.

/// Why the update engine refused to start.
///
/// These are host misconfigurations: the application keeps running, the
/// controller logs the failure and later tells the user to contact the
/// developer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivationError {
    /// The host bundle identity is missing or malformed.
    #[error("invalid host bundle: {0}")]
    InvalidHost(String),

    /// No update feed URL was configured or supplied by the delegate.
    #[error("no update feed URL is configured")]
    MissingFeedUrl,

    /// The feed URL could not be parsed.
    #[error("invalid update feed URL {url:?}: {reason}")]
    InvalidFeedUrl {
        /// The URL as configured.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The feed URL uses a scheme that is not allowed.
    #[error("update feed URL {0:?} must use https")]
    InsecureFeedUrl(String),

    /// No EdDSA public key was configured.
    #[error("no EdDSA public key is configured")]
    MissingPublicKey,

    /// The EdDSA public key is not 32 base64-encoded bytes.
    #[error("invalid EdDSA public key: {0}")]
    InvalidPublicKey(String),

    /// Engine-specific failure.
    #[error("engine failed to start: {0}")]
    Engine(String),
}

impl ActivationError {
    /// Stable code used in log records.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidHost(_) => "invalid_host",
            Self::MissingFeedUrl => "missing_feed_url",
            Self::InvalidFeedUrl { .. } => "invalid_feed_url",
            Self::InsecureFeedUrl(_) => "insecure_feed_url",
            Self::MissingPublicKey => "missing_public_key",
            Self::InvalidPublicKey(_) => "invalid_public_key",
            Self::Engine(_) => "engine",
        }
    }
}

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum UpdaterError {
    /// Engine activation error.
    #[error("activation error: {0}")]
    Activation(#[from] ActivationError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, UpdaterError>;
