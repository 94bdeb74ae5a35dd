#![allow(clippy::unwrap_used, clippy::expect_used)]

use jstep_parse::{parse_program, BlockIndex, Program};
use pretty_assertions::assert_eq;

use super::{ControlStack, Executor, Flow};
use crate::errors::{EvalError, EvalErrorKind};
use crate::scope::Scope;
use crate::session::UnsupportedPolicy;

/// Drives an [`Executor`] the way a session does, recording visited lines.
struct Run {
    program: Program,
    scope: Scope,
    frames: ControlStack,
    output: Vec<String>,
    lines: Vec<u32>,
    error: Option<EvalError>,
}

impl Run {
    fn new(source: &str, policy: UnsupportedPolicy) -> Self {
        Run::with_program(parse_program(source).unwrap(), policy)
    }

    fn with_program(program: Program, policy: UnsupportedPolicy) -> Self {
        let mut run = Run {
            program,
            scope: Scope::new(),
            frames: ControlStack::new(),
            output: Vec::new(),
            lines: Vec::new(),
            error: None,
        };
        run.drive(policy);
        run
    }

    fn drive(&mut self, policy: UnsupportedPolicy) {
        let mut pointer = 0;
        for _ in 0..1_000 {
            if pointer >= self.program.units.len() {
                return;
            }
            self.lines.push(self.program.units[pointer].line);
            let flow = Executor::new(
                &self.program,
                &mut self.scope,
                &mut self.frames,
                &mut self.output,
                policy,
            )
            .execute(pointer);
            match flow {
                Ok(Flow::Next) => pointer += 1,
                Ok(Flow::Jump(target)) => pointer = target,
                Err(error) => {
                    self.error = Some(error);
                    return;
                }
            }
        }
        panic!("program did not finish");
    }

    fn var(&self, name: &str) -> String {
        self.scope.lookup(name).unwrap().to_display()
    }

    fn error(&self) -> (EvalErrorKind, &str) {
        let error = self.error.as_ref().expect("expected an error");
        (error.kind, error.message.as_str())
    }
}

fn run(source: &str) -> Run {
    Run::new(source, UnsupportedPolicy::Error)
}

#[test]
fn straight_line_statements() {
    let r = run("let x = 5;\nlet y = x + 3;\nconsole.log(y);");
    assert_eq!(r.var("x"), "5");
    assert_eq!(r.var("y"), "8");
    assert_eq!(r.output, vec!["8"]);
    assert_eq!(r.lines, vec![1, 2, 3]);
    assert!(r.frames.is_empty());
}

#[test]
fn for_loop_visits_header_body_and_close_each_iteration() {
    let r = run("let x = 0;\nfor (let i = 0; i < 2; i++) {\n  x += i;\n}\n");
    assert_eq!(r.lines, vec![1, 2, 3, 4, 2, 3, 4]);
    assert_eq!(r.var("x"), "1");
    assert_eq!(r.var("i"), "2");
    assert!(r.frames.is_empty());
}

#[test]
fn loop_condition_false_on_entry_passes_through_close() {
    let r = run("while (false) {\n  x = 1;\n}\nlet done = true;");
    assert_eq!(r.lines, vec![1, 3, 4]);
    assert!(r.scope.lookup("x").is_none());
    assert!(r.frames.is_empty());
}

#[test]
fn while_loop_counts_down() {
    let r = run("let n = 3;\nlet s = '';\nwhile (n > 0) {\n  s += n;\n  n--;\n}");
    assert_eq!(r.var("s"), "321");
    assert_eq!(r.var("n"), "0");
}

#[test]
fn else_if_chain_takes_one_branch() {
    let src = "let x = 5;\nlet y;\nif (x > 10) {\n  y = 1;\n} else if (x > 3) {\n  y = 2;\n} else {\n  y = 3;\n}\nlet z = y;";
    let r = run(src);
    assert_eq!(r.var("y"), "2");
    assert_eq!(r.var("z"), "2");
    assert_eq!(r.lines, vec![1, 2, 3, 5, 6, 7, 10]);
}

#[test]
fn final_else_runs_when_all_conditions_fail() {
    let r = run("let y;\nif (false) {\n  y = 1;\n} else if (0) {\n  y = 2;\n} else {\n  y = 3;\n}");
    assert_eq!(r.var("y"), "3");
}

#[test]
fn braceless_bodies() {
    let r = run("let n = 0;\nfor (let i = 0; i < 4; i++) n += i;\nif (n > 5) n = -n;\nelse n = 0;");
    assert_eq!(r.var("n"), "-6");
}

#[test]
fn break_leaves_innermost_loop() {
    let src = "let hits = 0;\nfor (let i = 0; i < 3; i++) {\n  for (let j = 0; j < 10; j++) {\n    if (j == 2) {\n      break;\n    }\n    hits++;\n  }\n}";
    let r = run(src);
    assert_eq!(r.var("hits"), "6");
    assert!(r.frames.is_empty());
}

#[test]
fn continue_runs_update_and_condition() {
    let src = "let odd = [];\nfor (let i = 0; i < 6; i++) {\n  if (i % 2 === 0) {\n    continue;\n  }\n  odd.push(i);\n}";
    let r = run(src);
    assert_eq!(r.var("odd"), "[1,3,5]");
    assert_eq!(r.var("i"), "6");
    assert!(r.frames.is_empty());
}

#[test]
fn while_true_with_break() {
    let r = run("let n = 0;\nwhile (true) {\n  n++;\n  if (n >= 4) break;\n}");
    assert_eq!(r.var("n"), "4");
}

#[test]
fn break_outside_loop_is_syntax_error() {
    let r = run("let a = 1;\nbreak;");
    assert_eq!(r.error(), (EvalErrorKind::SyntaxError, "Illegal break statement"));
    assert_eq!(r.lines, vec![1, 2]);
}

#[test]
fn continue_outside_loop_is_syntax_error() {
    let r = run("if (true) {\n  continue;\n}");
    assert_eq!(r.error().0, EvalErrorKind::SyntaxError);
}

#[test]
fn array_destructuring_declaration_and_swap() {
    let r = run("let [a, , b] = [1, 2, 3];\n[a, b] = [b, a];");
    assert_eq!(r.var("a"), "3");
    assert_eq!(r.var("b"), "1");
}

#[test]
fn destructuring_a_number_is_not_iterable() {
    let r = run("let n = 5;\nlet [a] = n;");
    assert_eq!(r.error(), (EvalErrorKind::TypeError, "n is not iterable"));
}

#[test]
fn const_reassignment_is_type_error() {
    let r = run("const c = 1;\nc = 2;");
    assert_eq!(
        r.error(),
        (EvalErrorKind::TypeError, "Assignment to constant variable.")
    );
    assert_eq!(r.var("c"), "1");
}

#[test]
fn const_increment_is_type_error() {
    let r = run("const c = 1;\nc++;");
    assert_eq!(r.error().0, EvalErrorKind::TypeError);
}

#[test]
fn const_array_elements_can_change() {
    let r = run("const a = [1, 2];\na[0] = 9;\na.push(3);");
    assert_eq!(r.var("a"), "[9,2,3]");
}

#[test]
fn compound_assignment_to_element() {
    let r = run("let o = { n: 1, list: [1, 2] };\no.n *= 5;\no.list[1] += 10;");
    assert_eq!(r.var("o"), r#"{"n":5,"list":[1,12]}"#);
}

#[test]
fn exponent_assignment() {
    let r = run("let i = 2;\ni **= 3;");
    assert_eq!(r.var("i"), "8");
}

#[test]
fn function_body_is_skipped() {
    let src = "function add(a, b) {\n  return a + b;\n}\nlet r = add(1, 2);";
    let r = run(src);
    assert_eq!(r.lines, vec![1, 4]);
    assert_eq!(r.var("r"), "undefined");
}

#[test]
fn return_at_top_level_binds_hidden_slot() {
    let r = run("return 4;");
    assert_eq!(r.scope.lookup(crate::scope::RETURN_SLOT).unwrap().to_display(), "4");
    assert!(r.scope.visible().is_empty());
}

#[test]
fn unsupported_statement_errors_by_default() {
    let r = run("let a = 1;\nthrow a;\nlet b = 2;");
    assert_eq!(
        r.error(),
        (EvalErrorKind::UnsupportedSyntax, "`throw` is not supported")
    );
    assert!(r.scope.lookup("b").is_none());
}

#[test]
fn unsupported_statement_is_skipped_when_ignored() {
    let r = Run::new("let a = 1;\nthrow a;\nlet b = 2;", UnsupportedPolicy::Ignore);
    assert!(r.error.is_none());
    assert_eq!(r.var("b"), "2");
}

#[test]
fn unsupported_header_skips_its_block_when_ignored() {
    let src = "let a = 1;\nfor (const x of [1, 2]) {\n  a = x;\n}\nlet b = a;";
    let r = Run::new(src, UnsupportedPolicy::Ignore);
    assert!(r.error.is_none());
    assert_eq!(r.var("b"), "1");
}

const UNSUPPORTED_IF: &str =
    "let x = 1;\nif (x instanceof Foo) {\n  x = 2;\n} else {\n  x = 3;\n}\nconsole.log(x);";

const UNSUPPORTED_ELSE_IF: &str = "let a = 1;\nif (a == 1) {\n  a = 2;\n} else if (a instanceof Foo) {\n  a = 3;\n} else {\n  a = 4;\n}\nconsole.log(a);";

#[test]
fn unsupported_if_condition_errors_when_reached() {
    let r = run(UNSUPPORTED_IF);
    assert_eq!(
        r.error(),
        (EvalErrorKind::UnsupportedSyntax, "`instanceof` is not supported")
    );
    assert_eq!(r.lines, vec![1, 2]);
    assert_eq!(r.var("x"), "1");
}

#[test]
fn unsupported_if_skips_the_whole_chain_when_ignored() {
    let r = Run::new(UNSUPPORTED_IF, UnsupportedPolicy::Ignore);
    assert!(r.error.is_none());
    assert_eq!(r.lines, vec![1, 2, 7]);
    assert_eq!(r.output, vec!["1"]);
}

#[test]
fn taken_if_jumps_past_an_unsupported_else_if() {
    for policy in [UnsupportedPolicy::Error, UnsupportedPolicy::Ignore] {
        let r = Run::new(UNSUPPORTED_ELSE_IF, policy);
        assert!(r.error.is_none());
        assert_eq!(r.lines, vec![1, 2, 3, 4, 9]);
        assert_eq!(r.output, vec!["2"]);
    }
}

#[test]
fn reached_unsupported_else_if_follows_the_policy() {
    let source = UNSUPPORTED_ELSE_IF.replacen("let a = 1;", "let a = 0;", 1);

    let strict = run(&source);
    assert_eq!(strict.error().0, EvalErrorKind::UnsupportedSyntax);
    assert_eq!(strict.lines, vec![1, 2, 4]);

    let lenient = Run::new(&source, UnsupportedPolicy::Ignore);
    assert!(lenient.error.is_none());
    assert_eq!(lenient.output, vec!["0"]);
}

const UNMODELLED_OPERATORS: &str =
    "let a = 1;\nlet b = a ?? 2;\nlet c = 5 & 3;\nlet r = /ab+/;\na ||= 4;\nlet d = a << 1;\nlet e = 3;";

#[test]
fn unmodelled_operators_error_when_reached() {
    let r = run(UNMODELLED_OPERATORS);
    assert_eq!(
        r.error(),
        (EvalErrorKind::UnsupportedSyntax, "the `??` operator is not supported")
    );
    assert_eq!(r.lines, vec![1, 2]);
}

#[test]
fn unmodelled_operators_are_skipped_when_ignored() {
    let r = Run::new(UNMODELLED_OPERATORS, UnsupportedPolicy::Ignore);
    assert!(r.error.is_none());
    assert_eq!(r.lines, vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(r.var("a"), "1");
    assert_eq!(r.var("e"), "3");
    assert!(r.scope.lookup("b").is_none());
}

#[test]
fn syntax_errors_raise_under_ignore_policy() {
    let r = Run::new("let a = 1;\nlet = ;", UnsupportedPolicy::Ignore);
    assert_eq!(r.error().0, EvalErrorKind::SyntaxError);
}

#[test]
fn reference_error_stops_execution() {
    let r = run("let a = 1;\nlet b = missing + 1;\nlet c = 3;");
    assert_eq!(
        r.error(),
        (EvalErrorKind::ReferenceError, "missing is not defined")
    );
    assert!(r.scope.lookup("c").is_none());
}

#[test]
fn header_without_a_block_end_is_a_syntax_error() {
    for source in [
        "let x = 1;\nif (x) {\n  x = 2;\n}",
        "let x = 1;\nwhile (x < 3) {\n  x++;\n}",
        "let x = 1;\nfunction f() {\n}",
    ] {
        let mut program = parse_program(source).unwrap();
        program.blocks = BlockIndex::default();
        let r = Run::with_program(program, UnsupportedPolicy::Error);
        assert_eq!(r.error(), (EvalErrorKind::SyntaxError, "Unexpected end of input"), "{source}");
        assert_eq!(r.lines, vec![1, 2]);
    }
}
