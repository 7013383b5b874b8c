//! Result type alias for rule evaluation

use crate::error::LintelError;

/// Standard Result type for lintel operations
pub type Result<T> = std::result::Result<T, LintelError>;
