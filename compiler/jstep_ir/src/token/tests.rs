use super::*;
use pretty_assertions::assert_eq;

#[test]
fn binary_operators_continue_the_line() {
    assert!(TokenKind::Plus.continues_line());
    assert!(TokenKind::AmpAmp.continues_line());
    assert!(TokenKind::Comma.continues_line());
    assert!(!TokenKind::RParen.continues_line());
    assert!(!TokenKind::PlusPlus.continues_line());
    assert!(!TokenKind::Ident("x".to_string()).continues_line());
}

#[test]
fn display_names_for_diagnostics() {
    assert_eq!(TokenKind::EqEqEq.display_name(), "`===`");
    assert_eq!(
        TokenKind::Ident("foo".to_string()).display_name(),
        "identifier `foo`"
    );
    assert_eq!(TokenKind::Eof.display_name(), "end of input");
}

#[test]
fn token_list_iterates_in_order() {
    let mut list = TokenList::new();
    list.push(Token::new(TokenKind::Let, Span::new(0, 3), 1));
    list.push(Token::new(TokenKind::Eof, Span::point(3), 1));
    let kinds: Vec<_> = list.iter().map(|t| t.kind.clone()).collect();
    assert_eq!(kinds, vec![TokenKind::Let, TokenKind::Eof]);
    assert_eq!(list.len(), 2);
}
