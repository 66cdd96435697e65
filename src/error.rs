/// Error types for the ambient layer (config loading, terminal I/O).
///
/// The simulation itself has no failure paths.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A key binding name that doesn't map to any terminal key.
    #[error("unknown key name: {0:?}")]
    UnknownKey(String),

    /// A numeric setting outside its allowed range.
    #[error("invalid value for {field}: {value} ({reason})")]
    Invalid {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
