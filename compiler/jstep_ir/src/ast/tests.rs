#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

fn ident(name: &str) -> Expr {
    Expr::Ident(name.to_string())
}

#[test]
fn as_place_accepts_access_chains() {
    // arr[i].value
    let expr = Expr::Member {
        object: Box::new(Expr::Index {
            object: Box::new(ident("arr")),
            index: Box::new(ident("i")),
        }),
        property: "value".to_string(),
    };
    let place = expr.as_place().unwrap();
    assert_eq!(place.root(), "arr");
    assert_eq!(place.to_string(), "arr[i].value");
}

#[test]
fn as_place_rejects_calls_and_literals() {
    let call = Expr::Call {
        callee: Box::new(ident("f")),
        args: vec![],
    };
    assert_eq!(call.as_place(), None);
    assert_eq!(Expr::Number(1.0).as_place(), None);

    // f()[0] is not rooted at a variable
    let indexed_call = Expr::Index {
        object: Box::new(call),
        index: Box::new(Expr::Number(0.0)),
    };
    assert_eq!(indexed_call.as_place(), None);
}

#[test]
fn binding_names_skip_holes() {
    let binding = Binding::Array(vec![Some("a".to_string()), None, Some("c".to_string())]);
    assert_eq!(binding.names(), vec!["a", "c"]);
    assert_eq!(Binding::Name("x".to_string()).names(), vec!["x"]);
}

#[test]
fn display_parenthesises_binary_operators() {
    let expr = Expr::Binary {
        op: BinaryOp::Gt,
        left: Box::new(Expr::Binary {
            op: BinaryOp::Add,
            left: Box::new(ident("a")),
            right: Box::new(ident("b")),
        }),
        right: Box::new(ident("c")),
    };
    assert_eq!(expr.to_string(), "((a + b) > c)");
}

#[test]
fn headers_open_blocks() {
    assert!(Stmt::WhileHeader {
        condition: Expr::Bool(true)
    }
    .opens_block());
    assert!(Stmt::Else { condition: None }.opens_block());
    assert!(!Stmt::BlockEnd.opens_block());
    assert!(!Stmt::Break.opens_block());
}

#[test]
fn operator_precedence_orders_classes() {
    assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
    assert!(BinaryOp::Add.precedence() > BinaryOp::Lt.precedence());
    assert!(BinaryOp::Lt.precedence() > BinaryOp::StrictEq.precedence());
    assert!(BinaryOp::Pow.precedence() > BinaryOp::Mul.precedence());
}
