use crate::diagnostics::{Diagnostics, ErrorKind};

use super::{
    automaton::Automaton,
    token::{Token, TokenKind, KEYWORDS},
};

const OPERATOR_START: &str = "=<>!+-*/%^";
const MAX_FRACTION_DIGITS: usize = 5;

/// Owns the lexical automata; build once, tokenize any number of sources.
#[derive(Clone, Debug)]
pub struct Lexer {
    identifier: Automaton,
    number: Automaton,
    operator: Automaton,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            identifier: Automaton::identifier(),
            number: Automaton::number(),
            operator: Automaton::operator(),
        }
    }

    pub fn identifier_automaton(&self) -> &Automaton {
        &self.identifier
    }

    pub fn number_automaton(&self) -> &Automaton {
        &self.number
    }

    pub fn operator_automaton(&self) -> &Automaton {
        &self.operator
    }

    /// Splits `source` into tokens, always ending with a single `Eof` token.
    ///
    /// Lexical problems go to `diagnostics`; scanning never stops early.
    pub fn tokenize(&self, source: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
        let mut scanner = Scanner {
            lexer: self,
            chars: source.chars().collect(),
            index: 0,
            line: 1,
            tokens: vec![],
            diagnostics,
        };
        scanner.run();

        log::debug!("total tokens: {}", scanner.tokens.len());
        scanner.tokens
    }
}

struct Scanner<'a> {
    lexer: &'a Lexer,
    chars: Vec<char>,
    index: usize,
    line: usize,
    tokens: Vec<Token>,
    diagnostics: &'a mut Diagnostics,
}

impl Scanner<'_> {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    fn new_token(&mut self, kind: TokenKind, lexeme: impl Into<String>, line: usize) {
        self.tokens.push(Token::new(kind, lexeme, line));
    }

    /// Emits the `len` chars at the cursor as one token and moves past them.
    fn take(&mut self, kind: TokenKind, len: usize) -> String {
        let lexeme: String = self.chars[self.index..self.index + len].iter().collect();
        let line = self.line;
        self.new_token(kind, lexeme.clone(), line);
        self.index += len;
        lexeme
    }

    /// Consumes one char, keeping the line counter in sync.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        if c == '\n' {
            self.line += 1;
        }
        self.index += 1;
        Some(c)
    }

    fn run(&mut self) {
        while let Some(c) = self.peek(0) {
            let before = self.index;
            self.scan_one(c);
            debug_assert!(self.index > before, "lexer stalled at {}", before);
        }
        let line = self.line;
        self.new_token(TokenKind::Eof, "", line);
    }

    fn scan_one(&mut self, c: char) {
        if c.is_whitespace() {
            self.bump();
            return;
        }

        match c {
            '{' => {
                self.take(TokenKind::LBrace, 1);
                return;
            }
            '}' => {
                self.take(TokenKind::RBrace, 1);
                return;
            }
            ';' => {
                self.take(TokenKind::SemiColon, 1);
                return;
            }
            '/' if matches!(self.peek(1), Some('/')) => {
                self.skip_line_comment();
                return;
            }
            '/' if matches!(self.peek(1), Some('*')) => {
                self.skip_block_comment();
                return;
            }
            '"' => {
                self.read_string();
                return;
            }
            '\'' => {
                self.read_char();
                return;
            }
            _ => {}
        }

        if c.is_alphabetic() {
            let len = self.lexer.identifier.longest_accepted_len(&self.chars, self.index);
            if len > 0 {
                let word: String = self.chars[self.index..self.index + len].iter().collect();
                let kind = if KEYWORDS.contains(word.as_str()) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                self.take(kind, len);
                return;
            }
        }

        if c.is_ascii_digit() {
            let len = self.lexer.number.longest_accepted_len(&self.chars, self.index);
            if len > 0 {
                let line = self.line;
                let lexeme = self.take(TokenKind::Number, len);
                self.validate_number(&lexeme, line);
                return;
            }
        }

        if OPERATOR_START.contains(c) {
            let len = self.lexer.operator.longest_accepted_len(&self.chars, self.index);
            if len > 0 {
                self.take(TokenKind::Operator, len);
                return;
            }
        }

        let line = self.line;
        self.diagnostics.report(line, ErrorKind::InvalidCharacter(c));
        self.index += 1;
    }

    /// Malformed numbers are still emitted; only a diagnostic is added.
    fn validate_number(&mut self, lexeme: &str, line: usize) {
        let mantissa = lexeme.split(['E', 'e']).next().unwrap_or(lexeme);
        if let Some((_, fraction)) = mantissa.split_once('.') {
            if fraction.len() > MAX_FRACTION_DIGITS {
                self.diagnostics
                    .report(line, ErrorKind::DecimalTooLong(lexeme.to_string()));
            }
        }

        if lexeme.contains(['E', 'e']) && !has_valid_exponent(lexeme) {
            self.diagnostics
                .report(line, ErrorKind::InvalidExponent(lexeme.to_string()));
        }
    }

    fn skip_line_comment(&mut self) {
        self.index += 2;
        while matches!(self.peek(0), Some(c) if c != '\n') {
            self.index += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        let start_line = self.line;
        self.index += 2;
        loop {
            match (self.peek(0), self.peek(1)) {
                (Some('*'), Some('/')) => {
                    self.index += 2;
                    return;
                }
                (Some(_), _) => {
                    self.bump();
                }
                (None, _) => break,
            }
        }
        self.diagnostics.report(start_line, ErrorKind::UnclosedComment);
    }

    /// Consumes the char after a backslash and returns what it stands for.
    fn read_escape(&mut self) -> Option<char> {
        let c = self.bump()?;
        Some(match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            other => other,
        })
    }

    fn read_string(&mut self) {
        let start_line = self.line;
        let mut value = String::new();
        self.index += 1;

        loop {
            match self.bump() {
                Some('"') => {
                    self.new_token(TokenKind::String, value, start_line);
                    return;
                }
                Some('\\') => value.extend(self.read_escape()),
                Some(c) => value.push(c),
                None => break,
            }
        }

        self.diagnostics.report(start_line, ErrorKind::UnclosedString);
        self.new_token(TokenKind::String, value, start_line);
    }

    fn read_char(&mut self) {
        let start_line = self.line;
        let mut value = String::new();
        self.index += 1;

        match self.peek(0) {
            Some('\'') => {
                self.index += 1;
                self.diagnostics.report(start_line, ErrorKind::EmptyChar);
                self.new_token(TokenKind::Char, value, start_line);
                return;
            }
            Some('\\') => {
                self.index += 1;
                value.extend(self.read_escape());
            }
            Some(_) => value.extend(self.bump()),
            None => {}
        }

        if self.peek(0) == Some('\'') {
            self.index += 1;
        } else {
            self.diagnostics.report(start_line, ErrorKind::UnclosedChar);
        }
        self.new_token(TokenKind::Char, value, start_line);
    }
}

/// True when `lexeme` ends in `E`, an optional sign, and at least one digit.
fn has_valid_exponent(lexeme: &str) -> bool {
    let Some(pos) = lexeme.rfind('E') else {
        return false;
    };
    let exponent = &lexeme[pos + 1..];
    let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::has_valid_exponent;

    #[test]
    fn exponent_suffix() {
        assert!(has_valid_exponent("2E10"));
        assert!(has_valid_exponent("1.5E-3"));
        assert!(has_valid_exponent("1E+0"));
        assert!(!has_valid_exponent("2E"));
        assert!(!has_valid_exponent("2E+"));
        assert!(!has_valid_exponent("2e5"));
        assert!(!has_valid_exponent("25"));
    }
}
