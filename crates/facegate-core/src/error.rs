use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // State machine errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Setup errors
    #[error("License not activated: {0}")]
    LicenseDenied(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    // Coordinator errors
    #[error("Coordinator is not running")]
    CoordinatorStopped,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration key: {0}")]
    MissingConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
