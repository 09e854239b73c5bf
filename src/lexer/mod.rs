mod automaton;
mod lexer;
mod token;

pub use automaton::*;
pub use lexer::*;
pub use token::*;
