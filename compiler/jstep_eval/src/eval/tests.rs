#![allow(clippy::unwrap_used, clippy::expect_used)]

use jstep_ir::{Expr, Stmt};
use jstep_parse::{parse_program, FunctionRegistry};
use pretty_assertions::assert_eq;

use super::Evaluator;
use crate::errors::{EvalError, EvalErrorKind, EvalResult};
use crate::scope::{Mutability, Scope};
use crate::Value;

fn parse_expr(src: &str) -> Expr {
    let program = parse_program(&format!("({src});")).unwrap();
    match &program.units[0].stmt {
        Ok(Stmt::Expr(expr)) => expr.clone(),
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

#[derive(Default)]
struct Harness {
    scope: Scope,
    output: Vec<String>,
    functions: FunctionRegistry,
}

impl Harness {
    fn with_functions(source: &str) -> Self {
        Harness {
            functions: parse_program(source).unwrap().functions,
            ..Harness::default()
        }
    }

    fn set(&mut self, name: &str, src: &str) -> &mut Self {
        let value = self.eval(src).unwrap();
        self.scope.define(name, value, Mutability::Mutable);
        self
    }

    fn set_const(&mut self, name: &str, src: &str) -> &mut Self {
        let value = self.eval(src).unwrap();
        self.scope.define(name, value, Mutability::Immutable);
        self
    }

    fn eval(&mut self, src: &str) -> EvalResult {
        let expr = parse_expr(src);
        Evaluator::new(&mut self.scope, &mut self.output, &self.functions).eval(&expr)
    }

    fn show(&mut self, src: &str) -> String {
        self.eval(src).unwrap().to_display()
    }

    fn var(&self, name: &str) -> String {
        self.scope.lookup(name).unwrap().to_display()
    }
}

fn show(src: &str) -> String {
    Harness::default().show(src)
}

fn error(src: &str) -> (EvalErrorKind, String) {
    let err = Harness::default().eval(src).unwrap_err();
    (err.kind, err.message)
}

// Operators

#[test]
fn arithmetic_precedence() {
    assert_eq!(show("1 + 2 * 3"), "7");
    assert_eq!(show("(1 + 2) * 3"), "9");
    assert_eq!(show("2 ** 3 ** 2"), "512");
    assert_eq!(show("-7 % 3"), "-1");
    assert_eq!(show("1 / 0"), "Infinity");
    assert_eq!(show("0 / 0"), "NaN");
}

#[test]
fn plus_concatenates_strings() {
    assert_eq!(show("'a' + 1"), "a1");
    assert_eq!(show("1 + 2 + '3'"), "33");
    assert_eq!(show("[1, 2] + ''"), "1,2");
    assert_eq!(show("true + 1"), "2");
}

#[test]
fn mixed_operator_classes() {
    let mut h = Harness::default();
    h.set("a", "1").set("b", "2").set("c", "2");
    assert_eq!(h.show("(a + b) > c"), "true");
    assert_eq!(h.show("a + b > c && c > a"), "true");
    assert_eq!(h.show("a < b === b > a"), "true");
}

#[test]
fn equality_and_comparison() {
    assert_eq!(show("1 == '1'"), "true");
    assert_eq!(show("1 === '1'"), "false");
    assert_eq!(show("null == undefined"), "true");
    assert_eq!(show("'b' > 'a'"), "true");
    assert_eq!(show("'10' < '9'"), "true");
    assert_eq!(show("1 < undefined"), "false");
}

#[test]
fn logical_operators_return_operands() {
    assert_eq!(show("0 || 'x'"), "x");
    assert_eq!(show("1 && 0"), "0");
    assert_eq!(show("!''"), "true");
    assert_eq!(show("1 > 2 ? 'a' : 'b'"), "b");
}

#[test]
fn logical_operators_short_circuit() {
    // The right side would throw if evaluated.
    assert_eq!(show("false && missing"), "false");
    assert_eq!(show("true || missing()"), "true");
}

#[test]
fn typeof_tolerates_undeclared_names() {
    assert_eq!(show("typeof undeclared"), "undefined");
    assert_eq!(show("typeof [1]"), "object");
    assert_eq!(show("typeof 'x'"), "string");
    assert_eq!(show("typeof Math"), "object");
    assert_eq!(show("typeof parseInt"), "function");
}

#[test]
fn template_literals() {
    let mut h = Harness::default();
    h.set("name", "'Ada'");
    assert_eq!(h.show("`hi ${name}, ${1 + 1}`"), "hi Ada, 2");
}

// Identifiers and access

#[test]
fn undeclared_variable_is_reference_error() {
    assert_eq!(
        error("y + 1"),
        (EvalErrorKind::ReferenceError, "y is not defined".to_string())
    );
}

#[test]
fn member_and_index_access() {
    let mut h = Harness::default();
    h.set("arr", "[10, 20, 30]")
        .set("obj", "{ name: 'x', nested: { k: 1 } }")
        .set("n", "null");
    assert_eq!(h.show("arr.length"), "3");
    assert_eq!(h.show("arr[1]"), "20");
    assert_eq!(h.show("arr[10]"), "undefined");
    assert_eq!(h.show("arr[arr.length - 1]"), "30");
    assert_eq!(h.show("obj.nested.k"), "1");
    assert_eq!(h.show("obj['name']"), "x");
    assert_eq!(h.show("obj.missing"), "undefined");
    assert_eq!(h.show("'hello'.length"), "5");
    assert_eq!(h.show("'abc'[1]"), "b");

    let err = h.eval("n.x").unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::TypeError);
    assert_eq!(err.message, "Cannot read properties of null (reading 'x')");
}

#[test]
fn spread_in_array_literals() {
    let mut h = Harness::default();
    h.set("xs", "[1, 2]");
    assert_eq!(h.show("[0, ...xs, ...'ab']"), r#"[0,1,2,"a","b"]"#);
    assert_eq!(
        error("[...5]"),
        (EvalErrorKind::TypeError, "5 is not iterable".to_string())
    );
}

// Builtins

#[test]
fn math_functions_and_constants() {
    assert_eq!(show("Math.max(1, 5, 3)"), "5");
    assert_eq!(show("Math.min()"), "Infinity");
    assert_eq!(show("Math.floor(2.7)"), "2");
    assert_eq!(show("Math.round(-2.5)"), "-2");
    assert_eq!(show("Math.round(2.5)"), "3");
    assert_eq!(show("Math.abs(-3)"), "3");
    assert_eq!(show("Math.pow(2, 10)"), "1024");
    assert_eq!(show("Math.PI > 3.14"), "true");
    assert_eq!(error("Math.random()").0, EvalErrorKind::UnsupportedSyntax);
}

#[test]
fn shadowed_namespace_is_a_plain_variable() {
    let mut h = Harness::default();
    h.set("Math", "5");
    let err = h.eval("Math.max(1, 2)").unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::TypeError);
    assert_eq!(err.message, "Math.max is not a function");
}

#[test]
fn global_functions() {
    assert_eq!(show("parseInt('42px')"), "42");
    assert_eq!(show("parseFloat('2.5kg')"), "2.5");
    assert_eq!(show("Number('x')"), "NaN");
    assert_eq!(show("String(12) + 1"), "121");
    assert_eq!(show("Boolean('')"), "false");
    assert_eq!(show("isNaN('abc')"), "true");
    assert_eq!(show("Number.isInteger(5)"), "true");
    assert_eq!(show("Array.isArray([])"), "true");
}

#[test]
fn json_and_object_helpers() {
    assert_eq!(show("JSON.stringify({ a: [1, 2] })"), r#"{"a":[1,2]}"#);
    assert_eq!(
        show(r#"JSON.parse('{"b":1,"a":[true,null]}')"#),
        r#"{"b":1,"a":[true,null]}"#
    );
    assert_eq!(error("JSON.parse('{')").0, EvalErrorKind::SyntaxError);
    assert_eq!(show("Object.keys({ b: 1, a: 2 })"), r#"["b","a"]"#);
    assert_eq!(show("Object.values({ b: 1, a: 2 })"), "[1,2]");
    assert_eq!(show("Object.entries({ k: 'v' })"), r#"[["k","v"]]"#);
}

#[test]
fn console_writes_one_line_per_call() {
    let mut h = Harness::default();
    assert_eq!(h.show("console.log('a', 1, [1, 2], { k: 'v' })"), "undefined");
    h.eval("console.error('oops')").unwrap();
    assert_eq!(h.output, vec![r#"a 1 [1,2] {"k":"v"}"#, "oops"]);
}

// Methods

#[test]
fn mutating_methods_write_back_to_the_variable() {
    let mut h = Harness::default();
    h.set("arr", "[3, 1, 2]");
    assert_eq!(h.show("arr.push(4, 5)"), "5");
    assert_eq!(h.var("arr"), "[3,1,2,4,5]");
    assert_eq!(h.show("arr.pop()"), "5");
    assert_eq!(h.show("arr.shift()"), "3");
    assert_eq!(h.show("arr.unshift(0)"), "4");
    assert_eq!(h.var("arr"), "[0,1,2,4]");
    assert_eq!(h.show("arr.reverse()"), "[4,2,1,0]");
    assert_eq!(h.show("arr.splice(1, 2, 'x')"), "[2,1]");
    assert_eq!(h.var("arr"), r#"[4,"x",0]"#);
}

#[test]
fn const_arrays_can_be_mutated() {
    let mut h = Harness::default();
    h.set_const("arr", "[]");
    h.eval("arr.push(1)").unwrap();
    assert_eq!(h.var("arr"), "[1]");
}

#[test]
fn nested_receivers_are_updated_in_place() {
    let mut h = Harness::default();
    h.set("grid", "[[3, 1], [2]]");
    h.eval("grid[0].sort()").unwrap();
    assert_eq!(h.var("grid"), "[[1,3],[2]]");
}

#[test]
fn mutation_does_not_leak_between_bindings() {
    let mut h = Harness::default();
    h.set("a", "[1]");
    let copy = h.scope.lookup("a").unwrap().clone();
    h.scope.define("b", copy, Mutability::Mutable);
    h.eval("b.push(2)").unwrap();
    assert_eq!(h.var("a"), "[1]");
    assert_eq!(h.var("b"), "[1,2]");
}

#[test]
fn default_sort_is_by_string() {
    assert_eq!(show("[3, 1, 10, 2].sort()"), "[1,10,2,3]");
    assert_eq!(show("['b', undefined, 'a'].sort()"), r#"["a","b",null]"#);
}

#[test]
fn array_queries() {
    assert_eq!(show("[1, 2, 3].slice(1)"), "[2,3]");
    assert_eq!(show("[1, 2, 3].slice(-2, -1)"), "[2]");
    assert_eq!(show("[1, 2].concat([3], 4)"), "[1,2,3,4]");
    assert_eq!(show("[1, null, 'a'].join('-')"), "1--a");
    assert_eq!(show("[1, 2, 3].indexOf(3)"), "2");
    assert_eq!(show("[1, 2, 3].indexOf(9)"), "-1");
    assert_eq!(show("[NaN].includes(NaN)"), "true");
    assert_eq!(show("[1, 2, 3].at(-1)"), "3");
    assert_eq!(show("[0, 0, 0].fill(7, 1)"), "[0,7,7]");
}

#[test]
fn callback_methods_are_unsupported() {
    let (kind, message) = error("[1].forEach()");
    assert_eq!(kind, EvalErrorKind::UnsupportedSyntax);
    assert_eq!(message, "`forEach` with a callback is not supported");
}

#[test]
fn string_methods() {
    assert_eq!(show("'Hello'.toUpperCase()"), "HELLO");
    assert_eq!(show("'a,b,c'.split(',')"), r#"["a","b","c"]"#);
    assert_eq!(show("'abc'.split('')"), r#"["a","b","c"]"#);
    assert_eq!(show("'abc'.slice(-2)"), "bc");
    assert_eq!(show("'abcdef'.substring(4, 1)"), "bcd");
    assert_eq!(show("'x'.repeat(3)"), "xxx");
    assert_eq!(show("'5'.padStart(3, '0')"), "005");
    assert_eq!(show("'ab'.padEnd(5, 'xy')"), "abxyx");
    assert_eq!(show("' hi '.trim()"), "hi");
    assert_eq!(show("'hello'.indexOf('l')"), "2");
    assert_eq!(show("'hello'.lastIndexOf('l')"), "3");
    assert_eq!(show("'abc'.charAt(5)"), "");
    assert_eq!(show("'abc'.charCodeAt(0)"), "97");
    assert_eq!(show("'abc'.replace('b', 'x')"), "axc");
    assert_eq!(show("'hello'.startsWith('he')"), "true");
    assert_eq!(show("'hello'.includes('ell')"), "true");
    assert_eq!(error("'x'.repeat(-1)").0, EvalErrorKind::RangeError);
}

#[test]
fn number_methods() {
    assert_eq!(show("(3.14159).toFixed(2)"), "3.14");
    assert_eq!(show("(2.5).toFixed(0)"), "3");
    assert_eq!(show("(255).toString(16)"), "ff");
    assert_eq!(error("(1).toFixed(101)").0, EvalErrorKind::RangeError);
}

// Size limits

fn range_error(h: &mut Harness, src: &str) -> String {
    let err = h.eval(src).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::RangeError, "{src}");
    err.message
}

#[test]
fn building_a_string_past_the_cap_is_a_range_error() {
    let mut h = Harness::default();
    h.set("s", "'x'.repeat(16777216)");
    assert_eq!(h.show("s.length"), "16777216");
    for src in [
        "s + 'y'",
        "`${s}!`",
        "s.concat('y')",
        "[s, s].join('')",
        "String([s, s])",
        "JSON.stringify([s])",
        "s.padEnd(16777217)",
        "s.replace('x', 'yy')",
    ] {
        assert_eq!(range_error(&mut h, src), "Invalid string length");
    }
    assert_eq!(range_error(&mut h, "'x'.repeat(1e9)"), "Invalid string length");
    assert_eq!(range_error(&mut h, "'ab'.padStart(1e9)"), "Invalid string length");
}

#[test]
fn building_an_array_past_the_cap_is_a_range_error() {
    let mut h = Harness::default();
    h.set("b", "Array.from({ length: 1000000 })");
    assert_eq!(h.show("b.concat(b, b, b).length"), "4000000");
    for src in [
        "b.concat(b, b, b, b)",
        "[...b, ...b, ...b, ...b, ...b]",
        "b.push(...b, ...b, ...b, ...b)",
        "b.unshift(...b, ...b, ...b, ...b)",
        "b.splice(0, 0, ...b, ...b, ...b, ...b)",
    ] {
        assert_eq!(range_error(&mut h, src), "Invalid array length");
    }
    assert_eq!(h.show("b.length"), "1000000");
}

// Calls

#[test]
fn user_functions_return_undefined_without_running() {
    let mut h = Harness::with_functions("function add(a, b) {\n  console.log('inside');\n}\n");
    assert_eq!(h.show("add(1, 2)"), "undefined");
    assert!(h.output.is_empty());

    let err = h.eval("add").unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::UnsupportedSyntax);
}

#[test]
fn calling_non_functions() {
    let mut h = Harness::default();
    h.set("x", "1");
    let err = h.eval("x()").unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::TypeError);
    assert_eq!(err.message, "x is not a function");

    let err = h.eval("x.foo()").unwrap_err();
    assert_eq!(err.message, "x.foo is not a function");

    assert_eq!(
        error("nope()"),
        (EvalErrorKind::ReferenceError, "nope is not defined".to_string())
    );
}

// Places

#[test]
fn writes_through_resolved_places() {
    let mut h = Harness::default();
    h.set("arr", "[1]").set_const("obj", "{ a: { b: 1 } }").set("n", "null");

    let write = |h: &mut Harness, target: &str, value: Value| -> Result<(), EvalError> {
        let place = parse_expr(target).as_place().unwrap();
        let mut ev = Evaluator::new(&mut h.scope, &mut h.output, &h.functions);
        let resolved = ev.resolve(&place)?;
        ev.write_resolved(&resolved, value)
    };

    write(&mut h, "arr[3]", Value::Number(9.0)).unwrap();
    assert_eq!(h.var("arr"), "[1,null,null,9]");
    write(&mut h, "arr.length", Value::Number(2.0)).unwrap();
    assert_eq!(h.var("arr"), "[1,null]");
    write(&mut h, "obj.a.b", Value::Number(2.0)).unwrap();
    write(&mut h, "obj.c", Value::Boolean(true)).unwrap();
    assert_eq!(h.var("obj"), r#"{"a":{"b":2},"c":true}"#);

    let err = write(&mut h, "obj", Value::Null).unwrap_err();
    assert_eq!(err.message, "Assignment to constant variable.");
    let err = write(&mut h, "n.x", Value::Null).unwrap_err();
    assert_eq!(err.message, "Cannot set properties of null (setting 'x')");
    let err = write(&mut h, "obj.missing.x", Value::Null).unwrap_err();
    assert_eq!(
        err.message,
        "Cannot set properties of undefined (setting 'x')"
    );

    write(&mut h, "fresh", Value::Number(1.0)).unwrap();
    assert_eq!(h.var("fresh"), "1");
}
