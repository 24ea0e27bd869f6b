//! Error types for lru_guard
//!
//! Cache operations never fail; errors only arise when building a limiter or
//! validating configuration.

use thiserror::Error;

// == Error Enum ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Rate limiter parameters that cannot describe a token bucket
    #[error("Invalid quota: {0}")]
    InvalidQuota(String),

    /// Configuration values that are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
pub type Result<T> = std::result::Result<T, Error>;
