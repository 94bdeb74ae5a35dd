#![allow(clippy::unwrap_used, clippy::expect_used)]

use jstep_eval::{EvalErrorKind, ErrorInfo, SessionConfig, UnsupportedPolicy};
use pretty_assertions::assert_eq;

use super::{parse_run_options, render_error};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[test]
fn run_options_defaults() {
    let options = parse_run_options(&args(&["prog.js"])).unwrap();
    assert_eq!(options.path, "prog.js");
    assert_eq!(options.config, SessionConfig::default());
    assert!(!options.json);
}

#[test]
fn run_options_flags_in_any_order() {
    let options =
        parse_run_options(&args(&["--json", "prog.js", "--max-steps=25", "--lenient"])).unwrap();
    assert_eq!(options.path, "prog.js");
    assert_eq!(options.config.max_steps, 25);
    assert_eq!(options.config.unsupported, UnsupportedPolicy::Ignore);
    assert!(options.json);
}

#[test]
fn run_options_errors() {
    assert_eq!(
        parse_run_options(&args(&[])).unwrap_err(),
        "missing file path"
    );
    assert_eq!(
        parse_run_options(&args(&["a.js", "--max-steps=lots"])).unwrap_err(),
        "invalid --max-steps value 'lots'"
    );
    assert_eq!(
        parse_run_options(&args(&["a.js", "--fast"])).unwrap_err(),
        "unknown option '--fast'"
    );
    assert_eq!(
        parse_run_options(&args(&["a.js", "b.js"])).unwrap_err(),
        "unexpected argument 'b.js'"
    );
}

#[test]
fn error_rendering_shows_source_line() {
    let error = ErrorInfo {
        name: EvalErrorKind::TypeError,
        message: "Assignment to constant variable.".to_string(),
        line: 2,
    };
    let rendered = render_error("prog.js", "const limit = 3;\nlimit = 4;\n", &error);
    assert_eq!(
        rendered,
        "TypeError: Assignment to constant variable.\n  --> prog.js:2\n   |\n 2 | limit = 4;\n"
    );
}

#[test]
fn error_rendering_past_end_of_source() {
    let error = ErrorInfo {
        name: EvalErrorKind::SyntaxError,
        message: "Unexpected end of input".to_string(),
        line: 9,
    };
    assert_eq!(
        render_error("p.js", "let a = 1;", &error),
        "SyntaxError: Unexpected end of input\n  --> p.js:9\n"
    );
}
