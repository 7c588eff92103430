use thiserror::Error;

/// Errors that can occur during recipe import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// Input text could not be parsed into any recipe
    #[error("Failed to parse recipe text: {0}")]
    ParseError(String),

    /// The text was read but no block passed validation
    #[error("No valid recipe found in the provided text")]
    NoRecipesFound,

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// A required configuration value is absent
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    /// Backing store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Failed to read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Results could not be written out as JSON
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised by a [`RecipeStore`](crate::store::RecipeStore) backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport-level failure talking to the backend
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A row that was expected to exist is missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend refused a write
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}
