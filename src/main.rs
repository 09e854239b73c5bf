use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap_stdin::FileOrStdin;

use scopelex::{compile_with, lexer::Lexer, Compilation};

/// Tokenize a source file and check its declarations and scopes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source file, or `-` for stdin.
    input: FileOrStdin,

    /// Don't list the tokens.
    #[arg(long)]
    no_tokens: bool,

    /// Don't print the symbol table.
    #[arg(long)]
    no_symbols: bool,

    /// Also print the transition tables of the lexer's automata.
    #[arg(long)]
    dfa: bool,
}

fn print_report(cli: &Cli, lexer: &Lexer, compilation: &Compilation) {
    if !cli.no_tokens {
        println!("=== Tokens ===");
        for token in &compilation.tokens {
            println!("{}", token);
        }
        println!("Total tokens: {}", compilation.tokens.len());
    }

    if !cli.no_symbols {
        println!("\n=== Symbol Table ===");
        print!("{}", compilation.symbols);
    }

    if !compilation.diagnostics.is_empty() {
        println!("\n=== Errors ===");
        for diagnostic in &compilation.diagnostics {
            println!("{}", diagnostic);
        }
    }

    if cli.dfa {
        for (name, automaton) in [
            ("Identifier", lexer.identifier_automaton()),
            ("Number", lexer.number_automaton()),
            ("Operator", lexer.operator_automaton()),
        ] {
            println!("\n=== {} DFA Transition Table ===", name);
            println!("{}", automaton);
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    let source = cli.input.clone().contents()?;

    let lexer = Lexer::new();
    let compilation = compile_with(&lexer, &source);
    print_report(&cli, &lexer, &compilation);

    if compilation.is_valid() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
