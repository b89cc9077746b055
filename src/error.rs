//! Error types for translation and for the external tool collaborators.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Structural invariant violations raised by the construct translators.
///
/// Continuing past one of these would emit C++ that is either invalid or
/// silently means something else, so the engine aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// `a, b := 1` and friends.
    #[error("{names} names but {values} values in `{text}`")]
    DeclarationCountMismatch {
        names: usize,
        values: usize,
        text: String,
    },

    /// Map literal entry without a key/value separator.
    #[error("map entry `{entry}` has no `:` separator")]
    MissingPairSeparator { entry: String },

    /// A var/const/type line that matches none of the supported shapes.
    #[error("unrecognized {kind} declaration `{text}`")]
    UnrecognizedDeclaration { kind: &'static str, text: String },

    /// A statement whose head was recognized but whose body could not be split.
    #[error("malformed {kind} `{text}`")]
    MalformedStatement { kind: &'static str, text: String },
}

/// A line that was passed through best-effort because no translator
/// recognized it, or because it uses an unsupported construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Fatal error for one translation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("line {line}: {source}")]
    Structural {
        line: usize,
        #[source]
        source: StructuralError,
    },
}

impl TranslateError {
    pub fn line(&self) -> usize {
        match self {
            TranslateError::Structural { line, .. } => *line,
        }
    }
}

/// Failures of the formatter or compiler subprocesses.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{tool} is not available: {source}")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran and rejected its input. `translated` is the C++ that was fed to it.
    #[error("{tool} exited with {status}")]
    ToolFailed {
        tool: String,
        status: ExitStatus,
        diagnostics: String,
        translated: String,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_display_carries_line() {
        let err = TranslateError::Structural {
            line: 7,
            source: StructuralError::MissingPairSeparator {
                entry: "\"a\" \"b\"".to_string(),
            },
        };
        assert_eq!(err.line(), 7);
        assert!(err.to_string().starts_with("line 7: map entry"));
    }

    #[test]
    fn test_count_mismatch_display() {
        let err = StructuralError::DeclarationCountMismatch {
            names: 2,
            values: 3,
            text: "var a, b = 1, 2, 3".to_string(),
        };
        assert_eq!(err.to_string(), "2 names but 3 values in `var a, b = 1, 2, 3`");
    }
}
