//! Results produced by checkers.
//!
//! A failed check is an outcome, not an error: the edit session resolves it
//! interactively. Only [`FailureKind::ToolUnavailable`] is treated as a skip.

use std::fmt;

/// Category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The content does not parse.
    Syntax,
    /// The content parses but breaks a structural rule of the format.
    Format,
    /// The content is not valid UTF-8.
    Encoding,
    /// The external tool backing the check could not be run.
    ToolUnavailable,
}

impl FailureKind {
    /// Lower-case label for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Format => "format",
            Self::Encoding => "encoding",
            Self::ToolUnavailable => "tool unavailable",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describes a single problem found in a staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    kind: FailureKind,
    message: String,
    /// One-based line number.
    line: Option<u32>,
    /// One-based column number.
    column: Option<u32>,
}

impl ValidationFailure {
    /// Builds a failure without location information.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Builds a syntax failure.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Syntax, message)
    }

    /// Builds a format failure.
    #[must_use]
    pub fn format(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Format, message)
    }

    /// Builds an encoding failure.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Encoding, message)
    }

    /// Builds a failure reporting that `tool` could not be run.
    #[must_use]
    pub fn tool_unavailable(tool: &str, reason: impl fmt::Display) -> Self {
        Self::new(FailureKind::ToolUnavailable, format!("{tool}: {reason}"))
    }

    /// Attaches a line number.
    #[must_use]
    pub const fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Attaches a line and column.
    #[must_use]
    pub const fn at_location(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Attaches a line number when one is known.
    #[must_use]
    pub const fn with_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }

    /// Attaches a line and column when they are known.
    #[must_use]
    pub const fn with_location(mut self, location: Option<(u32, u32)>) -> Self {
        if let Some((line, column)) = location {
            self.line = Some(line);
            self.column = Some(column);
        }
        self
    }

    /// Failure category.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-based line, when known.
    #[must_use]
    pub const fn line(&self) -> Option<u32> {
        self.line
    }

    /// One-based column, when known.
    #[must_use]
    pub const fn column(&self) -> Option<u32> {
        self.column
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, " (line {line}, column {column})"),
            (Some(line), None) => write!(f, " (line {line})"),
            _ => Ok(()),
        }
    }
}

/// Result of one validation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The staged file is acceptable.
    Passed,
    /// The staged file was rejected, or the check could not run.
    Failed(ValidationFailure),
}

impl ValidationOutcome {
    /// Returns true when the check passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns true when the check could not run and should be skipped.
    #[must_use]
    pub fn skipped(&self) -> bool {
        self.failure()
            .is_some_and(|failure| failure.kind() == FailureKind::ToolUnavailable)
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Passed => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

impl From<Result<(), ValidationFailure>> for ValidationOutcome {
    fn from(result: Result<(), ValidationFailure>) -> Self {
        match result {
            Ok(()) => Self::Passed,
            Err(failure) => Self::Failed(failure),
        }
    }
}
