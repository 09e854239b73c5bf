use std::fmt;

use thiserror::Error as ThisError;

/// Every problem the lexer or the checker can detect.
///
/// None of these stop processing; they are collected in [`Diagnostics`] and
/// the caller decides what a non-empty list means.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Invalid character: '{0}'")]
    InvalidCharacter(char),

    #[error("Unclosed multi-line comment")]
    UnclosedComment,

    #[error("Unclosed string literal")]
    UnclosedString,

    #[error("Unclosed character literal")]
    UnclosedChar,

    #[error("Empty character literal")]
    EmptyChar,

    #[error("Decimal exceeds 5 places: {0}")]
    DecimalTooLong(String),

    #[error("Invalid exponent: {0}")]
    InvalidExponent(String),

    #[error("Missing closing brace")]
    MissingClosingBrace,

    #[error("Invalid identifier '{0}'. Must be a single lowercase letter.")]
    InvalidIdentifier(String),

    #[error("Variable '{0}' already declared in this scope.")]
    AlreadyDeclared(String),

    #[error("Variable '{0}' used in initialization is not declared.")]
    UndeclaredInInitializer(String),

    #[error("Variable '{0}' is not declared.")]
    Undeclared(String),

    #[error("Expected '=' in declaration for variable {0}")]
    ExpectedAssignInDeclaration(String),

    #[error("Expected '=' in assignment for variable {0}")]
    ExpectedAssignInAssignment(String),

    #[error("Missing semicolon after declaration of {0}")]
    MissingSemicolonInDeclaration(String),

    #[error("Missing semicolon in assignment for variable {0}")]
    MissingSemicolonInAssignment(String),

    #[error("Expected identifier after type keyword {0}")]
    ExpectedIdentifier(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: Option<usize>,
    pub kind: ErrorKind,
}

impl Diagnostic {
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "[Line {}] ", line)?;
        }
        write!(f, "ERROR: {}", self.kind)
    }
}

/// Append-only error list shared by the lexer and the checker of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, line: usize, kind: ErrorKind) {
        log::trace!("line {}: {}", line, kind);
        self.entries.push(Diagnostic {
            line: Some(line),
            kind,
        });
    }

    pub fn report_unlocated(&mut self, kind: ErrorKind) {
        self.entries.push(Diagnostic { line: None, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_line_prefix() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(3, ErrorKind::InvalidCharacter('@'));
        diagnostics.report_unlocated(ErrorKind::MissingClosingBrace);

        assert_eq!(
            diagnostics.iter().next().map(Diagnostic::message).as_deref(),
            Some("Invalid character: '@'")
        );

        let rendered: Vec<_> = diagnostics.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "[Line 3] ERROR: Invalid character: '@'".to_string(),
                "ERROR: Missing closing brace".to_string(),
            ]
        );
    }
}
