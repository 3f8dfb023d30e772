use thiserror::Error;

#[derive(Error, Debug)]
pub enum BazaarError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] bazaar_catalog::Error),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("invalid item id: {0}")]
    InvalidItemId(String),

    #[error("invalid form: {reason}")]
    Form { reason: String },

    #[error("form field {field} exceeds {limit} bytes")]
    TooLarge { field: String, limit: usize },

    #[error("Failed to read multipart form: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),
}

pub type Result<T> = std::result::Result<T, BazaarError>;

/// Extension trait for adding context to IO errors
pub trait IoErrorContext<T> {
    fn io_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> IoErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn io_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| BazaarError::Io {
            context: context.into(),
            source: e,
        })
    }
}
