//! Front-end for a small block-structured language.
//!
//! ```text
//! source → Lexer (DFA longest match) → tokens → Checker (+ SymbolTable) → diagnostics
//! ```
//!
//! Both stages report into one [`Diagnostics`] sink and never stop early, so a
//! run always yields a full token stream, a symbol table and an error list.

pub mod analyzer;
pub mod diagnostics;
pub mod lexer;

use analyzer::{Checker, SymbolTable};
pub use diagnostics::{Diagnostic, Diagnostics, ErrorKind};
use lexer::{Lexer, Token};

/// Everything one run over a source text produced.
#[derive(Clone, Debug)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
}

impl Compilation {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

pub fn compile(source: &str) -> Compilation {
    compile_with(&Lexer::new(), source)
}

/// Like [`compile`], reusing an already built lexer.
pub fn compile_with(lexer: &Lexer, source: &str) -> Compilation {
    let mut diagnostics = Diagnostics::new();
    let tokens = lexer.tokenize(source, &mut diagnostics);

    let mut symbols = SymbolTable::new();
    Checker::new(&tokens, &mut symbols, &mut diagnostics).check();
    log::debug!(
        "checked {} tokens, {} diagnostics",
        tokens.len(),
        diagnostics.len()
    );

    Compilation {
        tokens,
        symbols,
        diagnostics,
    }
}
