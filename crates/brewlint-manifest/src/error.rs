//! Errors raised while reading manifests.

/// Why a manifest could not be turned into a record.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: unsupported statement `{statement}`")]
    Unsupported { line: usize, statement: String },

    #[error("line {line}: duplicate `{keyword}` stanza")]
    Duplicate { line: usize, keyword: String },

    #[error("missing required stanza `{0}`")]
    MissingField(&'static str),

    #[error("unexpected end of file inside `{0}` block")]
    UnclosedBlock(&'static str),

    #[error("invalid {format} record: {message}")]
    Format {
        format: &'static str,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(line: usize, statement: &str) -> Self {
        Self::Unsupported {
            line,
            statement: statement.to_string(),
        }
    }

    /// Line the error points at, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. }
            | Self::Unsupported { line, .. }
            | Self::Duplicate { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the manifest crate.
pub type Result<T> = std::result::Result<T, ParseError>;
