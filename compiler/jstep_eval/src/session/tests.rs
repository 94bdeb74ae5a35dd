#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::*;

const SCENARIO_A: &str = "let x = 5;\nlet y = x + 3;\nconsole.log(y);";

fn session(source: &str) -> Session {
    Session::with_source(SessionConfig::default(), source)
}

fn vars(session: &Session) -> Vec<(String, String, bool)> {
    session
        .state()
        .variables
        .iter()
        .map(|v| (v.name.clone(), v.value.to_display(), v.changed))
        .collect()
}

fn var(name: &str, value: &str, changed: bool) -> (String, String, bool) {
    (name.to_string(), value.to_string(), changed)
}

#[test]
fn fresh_session_publishes_initial_state() {
    let s = session(SCENARIO_A);
    let state = s.state();
    assert_eq!(state.current_line, 1);
    assert_eq!(state.call_stack, vec![GLOBAL_FRAME.to_string()]);
    assert!(state.variables.is_empty());
    assert!(state.output.is_empty());
    assert!(!state.is_complete);
    assert!(state.error.is_none());
    assert!(!s.can_step_back());
}

#[test]
fn stepping_flags_changed_variables() {
    let mut s = session(SCENARIO_A);

    assert!(s.step());
    assert_eq!(vars(&s), vec![var("x", "5", true)]);
    assert_eq!(s.state().current_line, 2);

    assert!(s.step());
    assert_eq!(vars(&s), vec![var("x", "5", false), var("y", "8", true)]);

    assert!(!s.step());
    assert_eq!(vars(&s), vec![var("x", "5", false), var("y", "8", false)]);
    assert_eq!(s.state().output, vec!["8".to_string()]);
    assert!(s.state().is_complete);
    assert_eq!(s.state().current_line, 4);
    assert_eq!(s.steps(), 3);
}

#[test]
fn step_after_completion_is_a_no_op() {
    let mut s = session("let a = 1;");
    s.step();
    let before = s.state().clone();
    assert!(!s.step());
    assert_eq!(s.state(), &before);
    assert_eq!(s.steps(), 1);
}

#[test]
fn step_back_restores_previous_state() {
    let mut s = session("let a = [1];\na.push(2);\nconsole.log(a);");
    s.run_to_end();
    assert_eq!(s.state().output, vec!["[1,2]".to_string()]);

    assert!(s.step_back());
    assert!(s.state().output.is_empty());
    assert_eq!(s.state().current_line, 3);
    assert!(!s.state().is_complete);

    assert!(s.step_back());
    assert_eq!(vars(&s), vec![var("a", "[1]", true)]);
    assert_eq!(s.state().current_line, 2);

    assert!(s.step_back());
    assert!(s.state().variables.is_empty());
    assert!(!s.step_back());
}

#[test]
fn step_back_clears_the_error() {
    let mut s = session("let a = 1;\nlet b = nope;");
    s.run_to_end();
    let error = s.state().error.clone().unwrap();
    assert_eq!(error.name, EvalErrorKind::ReferenceError);
    assert_eq!(error.line, 2);
    assert_eq!(s.state().current_line, 2);
    assert!(!s.step());

    assert!(s.step_back());
    assert!(s.state().error.is_none());
    assert_eq!(s.state().current_line, 2);
    assert!(s.can_step());
}

#[test]
fn timeout_keeps_state() {
    let config = SessionConfig::new().max_steps(50);
    let mut s = Session::with_source(config, "let n = 0;\nwhile (true) {\n  n++;\n}");
    s.run_to_end();

    let error = s.state().error.clone().unwrap();
    assert_eq!(error.name, EvalErrorKind::Timeout);
    assert_eq!(error.message, "Execution exceeded 50 steps (possible infinite loop)");
    assert_eq!(s.steps(), 50);
    assert!(s.scope().lookup("n").unwrap().to_number() > 10.0);

    // Further runs do nothing until the error is undone.
    s.run_to_end();
    assert_eq!(s.steps(), 50);
}

#[test]
fn parse_failure_is_published_on_initialize() {
    let s = session("let a = 1;\n}");
    let error = s.state().error.clone().unwrap();
    assert_eq!(error.name, EvalErrorKind::SyntaxError);
    assert_eq!(error.line, 2);
    assert!(!s.can_step());
    assert!(!s.state().is_complete);
}

#[test]
fn unsupported_if_condition_fails_at_its_line_not_on_initialize() {
    let source = "let x = 1;\nif (x instanceof Foo) {\n  x = 2;\n} else {\n  x = 3;\n}\nconsole.log(x);";

    let mut strict = session(source);
    assert!(strict.state().error.is_none());
    strict.run_to_end();
    let error = strict.state().error.clone().unwrap();
    assert_eq!((error.name, error.line), (EvalErrorKind::UnsupportedSyntax, 2));
    assert_eq!(vars(&strict), vec![var("x", "1", false)]);

    let mut lenient = Session::with_source(SessionConfig::new().lenient(), source);
    lenient.run_to_end();
    assert!(lenient.state().is_complete);
    assert_eq!(lenient.state().output, vec!["1".to_string()]);
}

#[test]
fn reset_reloads_the_source() {
    let mut s = session(SCENARIO_A);
    s.run_to_end();
    s.reset();
    assert_eq!(s.source(), SCENARIO_A);
    assert_eq!(s.state(), &ExecutionState::default());
    assert_eq!(s.steps(), 0);
    s.run_to_end();
    assert_eq!(s.state().output, vec!["8".to_string()]);
}

#[test]
fn initialize_replaces_previous_program() {
    let mut s = session(SCENARIO_A);
    s.run_to_end();
    s.initialize_code("let z = 1;");
    assert!(s.state().variables.is_empty());
    assert!(s.state().output.is_empty());
    s.step();
    assert_eq!(vars(&s), vec![var("z", "1", true)]);
}

#[test]
fn empty_program_is_complete_immediately() {
    let s = session("");
    assert!(s.state().is_complete);
    assert_eq!(s.state().current_line, 1);
}

#[test]
fn lenient_config_skips_unsupported_lines() {
    let mut s = Session::with_source(SessionConfig::new().lenient(), "let a = 1;\nthrow a;\nlet b = 2;");
    s.run_to_end();
    assert!(s.state().is_complete);
    assert_eq!(vars(&s), vec![var("a", "1", false), var("b", "2", true)]);
}

#[test]
fn hidden_bindings_are_not_published() {
    let mut s = session("return 1;");
    s.run_to_end();
    assert!(s.state().variables.is_empty());
}

#[test]
fn state_serializes_in_camel_case() {
    let mut s = session("let a = 1;\nlet b = a.c.d;");
    s.run_to_end();
    let json = serde_json::to_string(s.state()).unwrap();
    assert_eq!(
        json,
        concat!(
            r#"{"variables":[{"name":"a","value":1,"type":"number","changed":false}],"#,
            r#""currentLine":2,"callStack":["(global)"],"output":[],"isComplete":false,"#,
            r#""error":{"name":"TypeError","message":"Cannot read properties of undefined (reading 'd')","line":2}}"#
        )
    );
}

#[test]
fn config_builder() {
    let config = SessionConfig::new().max_steps(7).lenient();
    assert_eq!(config.max_steps, 7);
    assert_eq!(config.unsupported, UnsupportedPolicy::Ignore);
    assert_eq!(SessionConfig::default().max_steps, DEFAULT_MAX_STEPS);
    assert_eq!(SessionConfig::default().unsupported, UnsupportedPolicy::Error);
}
