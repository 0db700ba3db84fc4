//! Error types shared by the simulation engine.

use thiserror::Error;

/// Contract violations raised by the engine.
///
/// Both kinds are programming errors rather than runtime conditions: the
/// engine never retries and a run either completes or aborts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

pub type SimResult<T> = Result<T, SimError>;
