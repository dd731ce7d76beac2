use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value for signal '{signal}': {value:?}")]
    InvalidSignalValue { signal: String, value: String },

    #[error("Signal not available: {0}")]
    SignalUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
