use thiserror::Error;

/// Failures raised while loading or reading a page
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The page did not finish loading within the allotted time
    #[error("timed out after {timeout_ms} ms loading {url}")]
    Timeout { url: String, timeout_ms: u64 },

    /// The browser reported a navigation failure
    #[error("failed to load {url}: {reason}")]
    Failed { url: String, reason: String },

    /// The rendered source could not be read back
    #[error("failed to read page source: {0}")]
    Content(String),

    /// No WebDriver session could be opened
    #[error("could not connect to WebDriver: {0}")]
    Connect(String),

    /// Every attempt failed; carries the last cause
    #[error("giving up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<NavigationError>,
    },
}

/// Top-level error for a harvest run
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
