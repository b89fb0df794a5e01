//! Error types for parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Malformed or unterminated markup; parsing continued
    #[error("Parse error at {line}:{column}: {message}")]
    Structural {
        span: Span,
        line: usize,
        column: usize,
        message: String,
    },

    /// Parsing was abandoned
    #[error("Fatal parse error at {line}:{column}: {message}")]
    Fatal {
        span: Span,
        line: usize,
        column: usize,
        message: String,
    },
}

impl ParseError {
    pub fn message(&self) -> &str {
        match self {
            ParseError::Structural { message, .. } | ParseError::Fatal { message, .. } => message,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            ParseError::Structural { span, .. } | ParseError::Fatal { span, .. } => span,
        }
    }

    /// 1-based line of the offending token
    pub fn line(&self) -> usize {
        match self {
            ParseError::Structural { line, .. } | ParseError::Fatal { line, .. } => *line,
        }
    }

    /// 1-based column of the offending token
    pub fn column(&self) -> usize {
        match self {
            ParseError::Structural { column, .. } | ParseError::Fatal { column, .. } => *column,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::Fatal { .. })
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().clone();
        let kind = if self.is_fatal() { "fatal" } else { "here" };
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.message())
            .with_label(
                Label::new((filename, span))
                    .with_message(kind)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// A recoverable issue noticed while parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "warning at {}:{}: {}", self.line, self.column, self.message)
    }
}
