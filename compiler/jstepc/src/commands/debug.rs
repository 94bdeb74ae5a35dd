//! Debug commands: `parse` and `lex` for inspecting the front end.

use jstep_parse::{parse_program, UnitKind};

use super::read_file;

/// Parse a file and display its units, blocks and functions.
pub fn parse_file(path: &str) {
    let content = read_file(path);

    let program = match parse_program(&content) {
        Ok(program) => program,
        Err(error) => {
            eprintln!("{path}:{}: SyntaxError: {}", error.line, error.message);
            std::process::exit(1);
        }
    };

    println!("Parse result for '{path}':");
    println!("  Units: {}", program.units.len());
    println!("  Functions: {}", program.functions.len());
    println!("  Lines: {}", program.line_count);

    println!();
    println!("Units:");
    for (index, unit) in program.units.iter().enumerate() {
        let kind = match unit.kind {
            UnitKind::Statement => "stmt",
            UnitKind::Header => "head",
            UnitKind::BlockEnd => "end ",
        };
        let partner = program
            .blocks
            .end_of(index)
            .filter(|_| unit.kind == UnitKind::Header)
            .map(|end| format!(" -> #{end}"))
            .unwrap_or_default();
        match &unit.stmt {
            Ok(stmt) => println!("  #{index:<3} L{:<4} {kind} {stmt:?}{partner}", unit.line),
            Err(error) => println!(
                "  #{index:<3} L{:<4} {kind} <{:?}: {}>{partner}",
                unit.line, error.kind, error.message
            ),
        }
    }

    if !program.functions.is_empty() {
        println!();
        println!("Functions:");
        for func in program.functions.iter() {
            println!(
                "  {}({}) lines {}-{}",
                func.name,
                func.params.join(", "),
                func.start_line,
                func.end_line
            );
        }
    }
}

/// Lex a file and display the token stream.
pub fn lex_file(path: &str) {
    let content = read_file(path);
    let output = jstep_lexer::lex(&content);

    println!("Tokens for '{}' ({} tokens):", path, output.tokens.len());
    for tok in &output.tokens {
        println!("  {:?} @ {} (line {})", tok.kind, tok.span, tok.line);
    }

    if !output.errors.is_empty() {
        println!();
        println!("Errors:");
        for error in &output.errors {
            println!("  line {}: {}", error.line, error.kind);
        }
    }
}
