use thiserror::Error;

/// Errors raised while issuing a retrieval key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("key space exhausted: all {key_space} keys are in use")]
    KeySpaceExhausted { key_space: u32 },
}

/// Errors related to loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("invalid config value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}
