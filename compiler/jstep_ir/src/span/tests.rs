use super::*;
use pretty_assertions::assert_eq;

#[test]
fn merge_covers_both_spans() {
    let a = Span::new(4, 9);
    let b = Span::new(2, 6);
    assert_eq!(a.merge(b), Span::new(2, 9));
}

#[test]
fn line_of_offsets_on_line_boundaries() {
    let table = LineTable::build("a\nbb\nccc");
    assert_eq!(table.line_of(0), 1);
    assert_eq!(table.line_of(1), 1); // the newline itself
    assert_eq!(table.line_of(2), 2);
    assert_eq!(table.line_of(5), 3);
    assert_eq!(table.line_of(7), 3);
}

#[test]
fn line_count_ignores_trailing_newline() {
    assert_eq!(LineTable::build("").line_count(), 0);
    assert_eq!(LineTable::build("x").line_count(), 1);
    assert_eq!(LineTable::build("x\n").line_count(), 1);
    assert_eq!(LineTable::build("x\n\ny").line_count(), 3);
}

#[test]
fn from_range_round_trips_to_range() {
    let span = Span::from_range(3..8);
    assert_eq!(span.to_range(), 3..8);
    assert_eq!(span.len(), 5);
    assert!(!span.is_empty());
    assert!(Span::point(4).is_empty());
}
