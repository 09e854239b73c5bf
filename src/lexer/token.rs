use std::fmt;

use phf::phf_set;

pub static KEYWORDS: phf::Set<&'static str> = phf_set! {
    "if", "else", "while", "for",
    "int", "decimal", "bool", "char", "string",
    "true", "false", "input", "output",
};

/// Keywords that start a declaration.
pub static TYPE_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "int", "decimal", "bool", "char", "string",
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    Operator,
    String,
    Char,
    LBrace,
    RBrace,
    SemiColon,
    Eof,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::Operator => "OPERATOR",
            TokenKind::String => "STRING",
            TokenKind::Char => "CHAR",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::SemiColon => "SEMICOLON",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified slice of source text.
///
/// For string and character literals `lexeme` holds the resolved text, with
/// escape sequences already applied. `line` is where the token started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    pub fn is_type_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword && TYPE_KEYWORDS.contains(self.lexeme.as_str())
    }

    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.lexeme == op
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} (Line {})", self.kind, self.lexeme, self.line)
    }
}
