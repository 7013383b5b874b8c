//! Error types and handling for lintel rule evaluation

use thiserror::Error;

/// Main error type for rule evaluation and correction
#[derive(Debug, Error)]
pub enum LintelError {
    /// An offset or range reaches past the end of the document, or a range
    /// the rule needs (such as a container body) was not supplied
    #[error("Offset out of range: {message}")]
    OutOfRange { message: String },

    /// A byte offset lands inside a multi-byte character
    #[error("Byte offset {offset} does not fall on a character boundary")]
    EncodingBoundary { offset: usize },

    /// The raw source could not be decoded
    #[error("Invalid source encoding: {message}")]
    InvalidEncoding { message: String },

    /// The syntax tree handed over by the parser breaks a structural invariant
    #[error("Malformed syntax tree: {message}")]
    MalformedTree { message: String },

    /// A rule pattern failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    PatternError { pattern: String, message: String },

    /// Configuration parsing or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Rule execution errors
    #[error("Rule error in '{rule_id}': {message}")]
    RuleError { rule_id: String, message: String },

    /// Edit validation or application errors
    #[error("Autofix error: {message}")]
    AutofixError { message: String },

    /// The external parser failed to produce a document
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    OutOfRange,
    Encoding,
    Tree,
    Pattern,
    Config,
    Rule,
    Autofix,
    Parse,
    Internal,
}

impl LintelError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LintelError::OutOfRange { .. } => ErrorKind::OutOfRange,
            LintelError::EncodingBoundary { .. } => ErrorKind::Encoding,
            LintelError::InvalidEncoding { .. } => ErrorKind::Encoding,
            LintelError::MalformedTree { .. } => ErrorKind::Tree,
            LintelError::PatternError { .. } => ErrorKind::Pattern,
            LintelError::ConfigError { .. } => ErrorKind::Config,
            LintelError::RuleError { .. } => ErrorKind::Rule,
            LintelError::AutofixError { .. } => ErrorKind::Autofix,
            LintelError::ParseError { .. } => ErrorKind::Parse,
            LintelError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error only affects a single node, so evaluation can
    /// continue with the next one
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::OutOfRange | ErrorKind::Encoding | ErrorKind::Rule
        )
    }

    /// Create an out-of-range error
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange {
            message: message.into(),
        }
    }

    /// Create an encoding boundary error
    pub fn encoding_boundary(offset: usize) -> Self {
        Self::EncodingBoundary { offset }
    }

    /// Create a malformed tree error
    pub fn malformed_tree(message: impl Into<String>) -> Self {
        Self::MalformedTree {
            message: message.into(),
        }
    }

    /// Create a pattern compilation error
    pub fn pattern_error(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PatternError {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a rule error
    pub fn rule_error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RuleError {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create an autofix error
    pub fn autofix_error(message: impl Into<String>) -> Self {
        Self::AutofixError {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<std::str::Utf8Error> for LintelError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::InvalidEncoding {
            message: err.to_string(),
        }
    }
}

impl From<regex::Error> for LintelError {
    fn from(err: regex::Error) -> Self {
        Self::PatternError {
            pattern: String::new(),
            message: err.to_string(),
        }
    }
}
