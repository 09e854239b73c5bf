use crate::diagnostics::{Diagnostics, ErrorKind};
use crate::lexer::{Token, TokenKind};

use super::symbol_table::{Symbol, SymbolTable, Visibility};

/// Which statement an initializer or right-hand side belongs to. Only affects
/// the wording of the diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Statement {
    Declaration,
    Assignment,
}

/// Single pass over a token stream that tracks block scopes and checks
/// declarations and variable uses.
///
/// Nothing here aborts: every problem is pushed to the diagnostics and the
/// walk resumes at the next plausible token, so the whole stream is consumed
/// exactly once. Recursion depth equals brace nesting depth.
#[derive(Debug)]
pub struct Checker<'a> {
    tokens: &'a [Token],
    index: usize,
    symbols: &'a mut SymbolTable,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Checker<'a> {
    pub fn new(
        tokens: &'a [Token],
        symbols: &'a mut SymbolTable,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            tokens,
            index: 0,
            symbols,
            diagnostics,
        }
    }

    pub fn check(&mut self) {
        while !self.is_eof() {
            self.check_statement();
        }
    }

    /// True at the `Eof` token, or past the end of a stream that lacks one.
    fn is_eof(&self) -> bool {
        self.peek().map_or(true, |t| t.kind == TokenKind::Eof)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn advance(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn consume_assign(&mut self) -> bool {
        if self.peek().is_some_and(|t| t.is_operator("=")) {
            self.advance();
            return true;
        }
        false
    }

    fn check_statement(&mut self) {
        let Some(token) = self.peek() else {
            return;
        };

        match token.kind {
            TokenKind::LBrace => self.check_block(token),
            TokenKind::Keyword if token.is_type_keyword() => self.check_declaration(token),
            TokenKind::Identifier => self.check_assignment(token),
            // Stray tokens, a lone `;` included, are skipped without comment.
            _ => self.advance(),
        }
    }

    /// block = "{" statement* "}"
    fn check_block(&mut self, open: &Token) {
        self.symbols.enter_scope();
        self.advance();

        while !self.at(TokenKind::RBrace) && !self.is_eof() {
            self.check_statement();
        }

        if self.consume(TokenKind::RBrace) {
            self.symbols.exit_scope();
        } else {
            // The scope stays open so it shows up as still active.
            self.diagnostics
                .report(open.line, ErrorKind::MissingClosingBrace);
        }
    }

    /// declaration = type-keyword ident "=" expr ";"
    fn check_declaration(&mut self, keyword: &Token) {
        self.advance();

        let Some(ident) = self.peek().filter(|t| t.kind == TokenKind::Identifier) else {
            self.diagnostics.report(
                keyword.line,
                ErrorKind::ExpectedIdentifier(keyword.lexeme.clone()),
            );
            return;
        };
        let name = &ident.lexeme;

        if name.chars().count() != 1 {
            self.diagnostics
                .report(ident.line, ErrorKind::InvalidIdentifier(name.clone()));
        }

        if self.symbols.exists_in_current_scope(name) {
            self.diagnostics
                .report(ident.line, ErrorKind::AlreadyDeclared(name.clone()));
        } else {
            let visibility = Visibility::for_depth(self.symbols.scope_depth());
            self.symbols
                .add_symbol(name, Symbol::new(keyword.lexeme.as_str(), visibility));
        }
        self.advance();

        if !self.consume_assign() {
            self.diagnostics.report(
                keyword.line,
                ErrorKind::ExpectedAssignInDeclaration(name.clone()),
            );
        }

        self.check_expression(Statement::Declaration);

        if !self.consume(TokenKind::SemiColon) {
            self.diagnostics.report(
                keyword.line,
                ErrorKind::MissingSemicolonInDeclaration(name.clone()),
            );
        }
    }

    /// assignment = ident "=" expr ";"
    fn check_assignment(&mut self, ident: &Token) {
        let name = &ident.lexeme;
        if !self.symbols.lookup(name) {
            self.diagnostics
                .report(ident.line, ErrorKind::Undeclared(name.clone()));
        }
        self.advance();

        if !self.consume_assign() {
            self.diagnostics.report(
                ident.line,
                ErrorKind::ExpectedAssignInAssignment(name.clone()),
            );
        }

        self.check_expression(Statement::Assignment);

        if !self.consume(TokenKind::SemiColon) {
            self.diagnostics.report(
                ident.line,
                ErrorKind::MissingSemicolonInAssignment(name.clone()),
            );
        }
    }

    /// Skips to the terminating `;` (or `Eof`), flagging every identifier
    /// that no active scope declares. The `;` itself is left in place.
    fn check_expression(&mut self, statement: Statement) {
        while !self.at(TokenKind::SemiColon) && !self.is_eof() {
            if let Some(token) = self.peek() {
                if token.kind == TokenKind::Identifier && !self.symbols.lookup(&token.lexeme) {
                    let kind = match statement {
                        Statement::Declaration => {
                            ErrorKind::UndeclaredInInitializer(token.lexeme.clone())
                        }
                        Statement::Assignment => ErrorKind::Undeclared(token.lexeme.clone()),
                    };
                    self.diagnostics.report(token.line, kind);
                }
            }
            self.advance();
        }
    }
}
