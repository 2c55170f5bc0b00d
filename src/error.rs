use crate::Span;
use crate::number::NumberFault;
use std::fmt::{self, Debug, Display};

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

/// Error produced when a document fails to parse.
///
/// Parsing stops at the first error; no partial tree is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The error kind
    pub kind: ErrorKind,
    /// The span where the error occurs.
    pub span: Span,
    /// Zero-based line and column (in bytes) of `span.start`, when known.
    pub line_info: Option<(usize, usize)>,
}

impl std::error::Error for Error {}

impl From<(ErrorKind, Span)> for Error {
    fn from((kind, span): (ErrorKind, Span)) -> Self {
        Self {
            kind,
            span,
            line_info: None,
        }
    }
}

/// The ways a document can fail to parse.
#[derive(Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input ended where a key or value was required.
    UnexpectedEof,

    /// The input is larger than the maximum supported size of 4GiB.
    FileTooLarge,

    /// A character that cannot start a value, or that may not appear at
    /// this position of a statement.
    UnexpectedCharacter(char),

    /// A numeric literal is structurally invalid.
    MalformedNumber(NumberFault),

    /// A string reached a line break or the end of input before its closing
    /// quote.
    UnterminatedString,

    /// An array or inline table was not closed before the end of the
    /// statement or input.
    UnterminatedContainer {
        /// The closing delimiter that was never found, `]` or `}`.
        delimiter: char,
    },

    /// An identifier starting with `t` or `f` that is not exactly `true` or
    /// `false`.
    MalformedBoolean,

    /// A key not followed by `=`.
    MissingAssignment,

    /// A misplaced or missing comma inside an array or inline table.
    UnexpectedSeparator {
        /// What the parser wanted at this position.
        expected: &'static str,
        /// What was found instead.
        found: &'static str,
    },
}

impl ErrorKind {
    /// Stable kebab-case code identifying the kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnexpectedEof => "unexpected-eof",
            Self::FileTooLarge => "file-too-large",
            Self::UnexpectedCharacter(..) => "unexpected-character",
            Self::MalformedNumber(..) => "malformed-number",
            Self::UnterminatedString => "unterminated-string",
            Self::UnterminatedContainer { .. } => "unterminated-container",
            Self::MalformedBoolean => "malformed-boolean",
            Self::MissingAssignment => "missing-assignment",
            Self::UnexpectedSeparator { .. } => "unexpected-separator",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::UnexpectedEof => f.write_str("unexpected eof encountered")?,
            ErrorKind::FileTooLarge => f.write_str("file is too large (maximum 4GiB)")?,
            ErrorKind::UnexpectedCharacter(c) => {
                write!(f, "unexpected character found: `{}`", Escape(*c))?
            }
            ErrorKind::MalformedNumber(fault) => write!(f, "malformed number: {fault}")?,
            ErrorKind::UnterminatedString => f.write_str("unterminated string")?,
            ErrorKind::UnterminatedContainer { delimiter } => {
                write!(f, "unterminated container, expected `{delimiter}`")?
            }
            ErrorKind::MalformedBoolean => {
                f.write_str("invalid boolean, expected `true` or `false`")?
            }
            ErrorKind::MissingAssignment => f.write_str("expected `=` after key")?,
            ErrorKind::UnexpectedSeparator { expected, found } => {
                write!(f, "expected {expected}, found {found}")?
            }
        }
        if let Some((line, col)) = self.line_info {
            write!(f, " at line {} column {}", line + 1, col + 1)?;
        }
        Ok(())
    }
}

#[cfg(feature = "reporting")]
#[cfg_attr(docsrs, doc(cfg(feature = "reporting")))]
impl Error {
    /// Converts this [`Error`] into a [`codespan_reporting::diagnostic::Diagnostic`]
    pub fn to_diagnostic<FileId: Copy + PartialEq>(
        &self,
        fid: FileId,
    ) -> codespan_reporting::diagnostic::Diagnostic<FileId> {
        use codespan_reporting::diagnostic::{Diagnostic, Label};

        let diag = Diagnostic::error().with_code(self.kind.code());
        let label = Label::primary(fid, self.span);

        match &self.kind {
            ErrorKind::UnexpectedCharacter(c) => diag.with_labels(vec![
                label.with_message(format!("unexpected character '{}'", Escape(*c))),
            ]),
            ErrorKind::MalformedNumber(fault) => diag
                .with_message(format!("malformed number: {fault}"))
                .with_labels(vec![label.with_message("unable to recognize number")]),
            ErrorKind::UnterminatedString => diag.with_labels(vec![
                label.with_message("line break or eof reached before string terminator"),
            ]),
            ErrorKind::UnterminatedContainer { delimiter } => diag
                .with_message(self.to_string())
                .with_labels(vec![label.with_message(format!("missing `{delimiter}`"))]),
            ErrorKind::MalformedBoolean => diag
                .with_message("invalid boolean")
                .with_labels(vec![label.with_message("expected `true` or `false`")]),
            ErrorKind::MissingAssignment => {
                diag.with_labels(vec![label.with_message("expected `=` after key")])
            }
            ErrorKind::UnexpectedSeparator { expected, .. } => {
                diag.with_labels(vec![label.with_message(format!("expected {expected}"))])
            }
            ErrorKind::UnexpectedEof => diag
                .with_message("unexpected end of file")
                .with_labels(vec![label]),
            ErrorKind::FileTooLarge => diag
                .with_message("file is too large (maximum 4GiB)")
                .with_labels(vec![label]),
        }
    }
}
