// tests/lexer_tests.rs

use dotquery::ErrorKind;
use dotquery::lexer::{Lexer, find_top_level, split};

// ============================================================================
// Splitting
// ============================================================================

#[test]
fn test_split_on_top_level_commas() {
    let parts = split("1, 2, [3, 4]", ',').unwrap();
    assert_eq!(parts, vec!["1", " 2", " [3, 4]"]);
}

#[test]
fn test_split_ignores_commas_in_quotes() {
    let parts = split("1, 2, '3, 4'", ',').unwrap();
    assert_eq!(parts, vec!["1", " 2", " '3, 4'"]);
}

#[test]
fn test_split_ignores_dots_in_calls() {
    let parts = split("site.find('notes.md').title", '.').unwrap();
    assert_eq!(parts, vec!["site", "find('notes.md')", "title"]);
}

#[test]
fn test_split_ignores_dots_in_nested_calls() {
    let parts = split("a.b(c.d(e.f), [g.h]).i", '.').unwrap();
    assert_eq!(parts, vec!["a", "b(c.d(e.f), [g.h])", "i"]);
}

#[test]
fn test_split_mixed_quotes() {
    // Each quote kind is plain text inside the other
    let parts = split(r#"'a"b', "c'd""#, ',').unwrap();
    assert_eq!(parts, vec![r#"'a"b'"#, r#" "c'd""#]);
}

#[test]
fn test_split_brackets_inside_quotes() {
    let parts = split("'(', ']'", ',').unwrap();
    assert_eq!(parts, vec!["'('", " ']'"]);
}

#[test]
fn test_split_empty_input() {
    assert_eq!(split("", ',').unwrap(), vec![""]);
}

#[test]
fn test_split_without_delimiter() {
    assert_eq!(split("title", '.').unwrap(), vec!["title"]);
}

#[test]
fn test_split_unicode() {
    assert_eq!(split("größe.länge", '.').unwrap(), vec!["größe", "länge"]);
}

// ============================================================================
// Malformed Input
// ============================================================================

#[test]
fn test_unclosed_paren() {
    let err = split("foo(1, 2", ',').unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedArgument);
    assert!(err.to_string().contains("unclosed '('"), "{}", err);
}

#[test]
fn test_unclosed_bracket() {
    let err = split("[1, 2", ',').unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedArgument);
}

#[test]
fn test_unterminated_string() {
    let err = split("'abc, d", ',').unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedArgument);
    assert!(err.to_string().contains("unterminated"), "{}", err);
}

#[test]
fn test_unexpected_closer() {
    let err = split("a)b", '.').unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedArgument);
    assert!(err.to_string().contains("unexpected ')'"), "{}", err);
}

#[test]
fn test_mismatched_closer() {
    let err = split("foo(1]", ',').unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedArgument);
}

// ============================================================================
// Token Flags
// ============================================================================

#[test]
fn test_top_level_flags() {
    let tokens = Lexer::new("f(a)").tokenize().unwrap();
    let flags: Vec<bool> = tokens.iter().map(|t| t.top_level).collect();
    assert_eq!(flags, vec![true, true, false, true]);
}

#[test]
fn test_quote_flags() {
    let tokens = Lexer::new("'a'b").tokenize().unwrap();
    let flags: Vec<bool> = tokens.iter().map(|t| t.top_level).collect();
    assert_eq!(flags, vec![true, false, true, true]);
}

#[test]
fn test_token_offsets_are_bytes() {
    let tokens = Lexer::new("ä.b").tokenize().unwrap();
    let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![0, 2, 3]);
}

#[test]
fn test_find_top_level() {
    assert_eq!(find_top_level("say('(')", '(').unwrap(), Some(3));
    assert_eq!(find_top_level("'(' x", '(').unwrap(), None);
    assert_eq!(find_top_level("a.b", '?').unwrap(), None);
}
