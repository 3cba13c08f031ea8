use thiserror::Error;

/// Result type for API description reading
pub type ApiDocResult<T> = Result<T, ApiDocError>;

/// Errors that can occur while resolving an API description
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiDocError {
    /// Two members of one resolved hierarchy cannot be reconciled
    #[error("Model conflict in {model}: member '{member}' is declared as {first} and {second}")]
    ModelConflict {
        model: String,
        member: String,
        first: String,
        second: String,
    },

    /// A registered extension failed while resolving an operation
    #[error("Extension '{extension}' failed: {message}")]
    ExtensionFailure { extension: String, message: String },

    /// Metadata is present but internally inconsistent
    #[error("Malformed metadata on {target}: {message}")]
    MalformedMetadata { target: String, message: String },

    /// A type name could not be found in the registry
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

impl ApiDocError {
    /// Create a new model conflict error
    pub fn model_conflict<M, N, A, B>(model: M, member: N, first: A, second: B) -> Self
    where
        M: ToString,
        N: ToString,
        A: ToString,
        B: ToString,
    {
        Self::ModelConflict {
            model: model.to_string(),
            member: member.to_string(),
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    /// Create a new extension failure
    pub fn extension_failure<E: ToString, T: ToString>(extension: E, msg: T) -> Self {
        Self::ExtensionFailure {
            extension: extension.to_string(),
            message: msg.to_string(),
        }
    }

    /// Create a new malformed metadata error
    pub fn malformed<T: ToString, M: ToString>(target: T, msg: M) -> Self {
        Self::MalformedMetadata {
            target: target.to_string(),
            message: msg.to_string(),
        }
    }

    /// Create a new configuration error
    pub fn config_error<T: ToString>(msg: T) -> Self {
        Self::Config(msg.to_string())
    }

    /// Whether this error only degrades output instead of dropping it
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedMetadata { .. } | Self::UnknownType(_))
    }
}

impl From<std::io::Error> for ApiDocError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ApiDocError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for ApiDocError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(format!("YAML: {}", err))
    }
}

impl From<toml::de::Error> for ApiDocError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML: {}", err))
    }
}

/// Warning severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningLevel {
    /// Something was dropped from the output
    Error,
    /// Output was degraded to a default policy
    Warning,
}

/// A non-fatal problem attributed to the smallest unit that caused it
#[derive(Debug, Clone, PartialEq)]
pub struct ReadWarning {
    /// Root type, operation (`Type#method`) or model the warning belongs to
    pub source: String,
    /// Severity
    pub level: WarningLevel,
    /// Underlying error
    pub error: ApiDocError,
}

impl ReadWarning {
    pub fn new<S: ToString>(source: S, error: ApiDocError) -> Self {
        let level = if error.is_recoverable() {
            WarningLevel::Warning
        } else {
            WarningLevel::Error
        };
        Self {
            source: source.to_string(),
            level,
            error,
        }
    }
}

impl std::fmt::Display for ReadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}
