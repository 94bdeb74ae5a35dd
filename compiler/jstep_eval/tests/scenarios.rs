//! End-to-end debugging sessions over whole programs.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use jstep_eval::{EvalErrorKind, ExecutionState, Session, SessionConfig, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn session(source: &str) -> Session {
    Session::with_source(SessionConfig::default(), source)
}

fn value_of(state: &ExecutionState, name: &str) -> Value {
    state
        .variables
        .iter()
        .find(|v| v.name == name)
        .map(|v| v.value.clone())
        .unwrap_or_else(|| panic!("no variable {name}"))
}

fn counting_loop(n: u32) -> String {
    format!("let count = 0;\nfor (let i = 0; i < {n}; i++) {{\n  count++;\n}}\nlet done = true;")
}

const BUBBLE_SORT: &str = "\
let arr = [3, 1, 2];
let n = arr.length;
for (let i = 0; i < n - 1; i++) {
  for (let j = 0; j < n - 1 - i; j++) {
    if (arr[j] > arr[j + 1]) {
      let tmp = arr[j];
      arr[j] = arr[j + 1];
      arr[j + 1] = tmp;
    }
  }
}
console.log(arr.join(', '));
";

#[test]
fn scenario_straight_line() {
    let mut s = session("let x = 5;\nlet y = x + 3;\nconsole.log(y);");
    for _ in 0..3 {
        s.step();
    }
    let state = s.state();
    assert_eq!(value_of(state, "x"), Value::Number(5.0));
    assert_eq!(value_of(state, "y"), Value::Number(8.0));
    assert_eq!(state.output, vec!["8".to_string()]);
    assert!(state.is_complete);
}

#[test]
fn scenario_logging_loop() {
    let mut s = session("for (let i = 0; i < 3; i++) {\n  console.log(i);\n}");
    s.run_to_end();
    let state = s.state();
    assert_eq!(state.output, vec!["0", "1", "2"]);
    assert_eq!(value_of(state, "i"), Value::Number(3.0));
    assert!(state.is_complete);
    assert!(state.error.is_none());
}

#[test]
fn scenario_bubble_sort() {
    let mut s = session(BUBBLE_SORT);
    s.run_to_end();
    let state = s.state();
    assert!(state.error.is_none(), "{:?}", state.error);
    assert_eq!(value_of(state, "arr").to_display(), "[1,2,3]");
    assert_eq!(
        serde_json::to_string(&value_of(state, "arr")).unwrap(),
        "[1,2,3]"
    );
    assert_eq!(state.output, vec!["1, 2, 3"]);
}

#[test]
fn infinite_loop_times_out() {
    let config = SessionConfig::new().max_steps(1_000);
    let mut s = Session::with_source(config, "while (true) {\n}");
    s.run_to_end();
    let error = s.state().error.clone().unwrap();
    assert_eq!(error.name, EvalErrorKind::Timeout);
    assert!(s.steps() <= 1_000);
    assert!(!s.state().is_complete);
}

#[test]
fn reading_state_is_idempotent() {
    let mut s = session(BUBBLE_SORT);
    for _ in 0..7 {
        s.step();
    }
    let first = s.state().clone();
    let second = s.state().clone();
    assert_eq!(first, second);
}

#[test]
fn each_statement_changes_only_its_target() {
    let source = "let a = 1;\nlet b = [1, 2];\nlet c = { k: 1 };\na += 2;\nb[1] = 5;\nc.k++;\nb.push(a);";
    let expected_changes = [
        vec!["a"],
        vec!["b"],
        vec!["c"],
        vec!["a"],
        vec!["b"],
        vec!["c"],
        vec!["b"],
    ];
    let mut s = session(source);
    for expected in expected_changes {
        s.step();
        let changed: Vec<&str> = s
            .state()
            .variables
            .iter()
            .filter(|v| v.changed)
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(changed, expected);
    }
    assert_eq!(value_of(s.state(), "b").to_display(), "[1,5,3]");
}

#[test]
fn const_reassignment_surfaces_type_error() {
    let mut s = session("const limit = 3;\nlimit = 4;\nconsole.log(limit);");
    s.run_to_end();
    let error = s.state().error.clone().unwrap();
    assert_eq!(error.name, EvalErrorKind::TypeError);
    assert_eq!(error.message, "Assignment to constant variable.");
    assert_eq!(error.line, 2);
    assert!(s.state().output.is_empty());
}

#[test]
fn unsupported_syntax_policy() {
    let source = "let total = 1;\nclass Point {\n}\ntotal = 2;";

    let mut strict = session(source);
    strict.run_to_end();
    let error = strict.state().error.clone().unwrap();
    assert_eq!(error.name, EvalErrorKind::UnsupportedSyntax);
    assert_eq!(error.line, 2);

    let mut lenient = Session::with_source(SessionConfig::new().lenient(), source);
    lenient.run_to_end();
    assert!(lenient.state().is_complete);
    assert_eq!(value_of(lenient.state(), "total"), Value::Number(2.0));
}

#[test]
fn doubling_an_array_stops_at_the_length_cap() {
    let source = "let a = [1];\nfor (let i = 0; i < 40; i++) {\n  a = a.concat(a);\n}";
    let mut s = session(source);
    s.run_to_end();
    let state = s.state();
    let error = state.error.clone().unwrap();
    assert_eq!(error.name, EvalErrorKind::RangeError);
    assert_eq!(error.message, "Invalid array length");
    assert_eq!(error.line, 3);
    assert_eq!(value_of(state, "i"), Value::Number(22.0));
    assert_eq!(value_of(state, "a").as_array().map(<[Value]>::len), Some(1 << 22));
}

#[test]
fn doubling_a_string_stops_at_the_length_cap() {
    let source = "let s = 'ab';\nfor (let i = 0; i < 40; i++) {\n  s = s + s;\n}";
    let mut s = session(source);
    s.run_to_end();
    let state = s.state();
    let error = state.error.clone().unwrap();
    assert_eq!(error.name, EvalErrorKind::RangeError);
    assert_eq!(error.message, "Invalid string length");
    assert_eq!(error.line, 3);
    assert_eq!(value_of(state, "i"), Value::Number(23.0));
}

#[test]
fn user_function_calls_return_undefined() {
    let source = "function square(n) {\n  return n * n;\n}\nlet r = square(4);\nconsole.log(typeof r);";
    let mut s = session(source);
    s.run_to_end();
    assert_eq!(s.state().output, vec!["undefined"]);
}

#[test]
fn nested_data_and_builtins() {
    let source = "\
let people = [{ name: 'Ada', age: 36 }, { name: 'Alan', age: 41 }];
let names = [];
let total = 0;
for (let k = 0; k < people.length; k++) {
  names.push(people[k].name.toUpperCase());
  total += people[k].age;
}
console.log(names.join('+'), Math.round(total / people.length));
console.log(`${names.length} people`, JSON.stringify(people[0]));
";
    let mut s = session(source);
    s.run_to_end();
    assert!(s.state().error.is_none(), "{:?}", s.state().error);
    assert_eq!(
        s.state().output,
        vec![
            "ADA+ALAN 39".to_string(),
            r#"2 people {"name":"Ada","age":36}"#.to_string(),
        ]
    );
}

proptest! {
    #[test]
    fn for_loop_runs_body_n_times(n in 0u32..25) {
        let mut s = session(&counting_loop(n));
        s.run_to_end();
        let state = s.state();
        prop_assert!(state.is_complete);
        prop_assert_eq!(value_of(state, "count"), Value::Number(f64::from(n)));
        prop_assert_eq!(value_of(state, "i"), Value::Number(f64::from(n)));
    }

    #[test]
    fn replay_after_step_back_is_deterministic(forward in 1usize..24, back in 1usize..12) {
        let mut s = session(BUBBLE_SORT);
        let mut states = vec![s.state().clone()];
        for _ in 0..forward {
            s.step();
            states.push(s.state().clone());
        }

        let back = back.min(forward);
        for _ in 0..back {
            prop_assert!(s.step_back());
        }
        prop_assert_eq!(s.state(), &states[forward - back]);

        for _ in 0..back {
            s.step();
        }
        prop_assert_eq!(s.state(), &states[forward]);
    }
}

#[test]
fn empty_loop_lands_on_closing_brace() {
    let mut s = session(&counting_loop(0));
    s.step();
    s.step();
    assert_eq!(s.state().current_line, 4);
    assert_eq!(value_of(s.state(), "count"), Value::Number(0.0));
    s.step();
    assert_eq!(s.state().current_line, 5);
}
