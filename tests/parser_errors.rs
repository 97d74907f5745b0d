// Parser error path tests
// These systematically test unhappy paths and the offsets they report

use crash_report_core::{parse_document, ParserError, ReportError};

fn parser_error(source: &str) -> ParserError {
    match parse_document(source, "test.json") {
        Err(ReportError::Parser(err)) => err,
        Err(other) => panic!("Expected parser error, got {other:?}"),
        Ok(doc) => panic!("Should fail: {source:?} parsed to {doc:?}"),
    }
}

#[test]
fn test_parser_error_missing_closing_brace() {
    let err = parser_error(r#"{ "key": 123"#);
    assert!(matches!(err, ParserError::Syntax { .. }));
    assert_eq!(err.offset(), 12);
}

#[test]
fn test_parser_error_missing_closing_bracket() {
    let err = parser_error(r#"{ "arr": [1, 2, 3 }"#);
    assert!(matches!(err, ParserError::Syntax { .. }));
    assert_eq!(err.offset(), 18);
}

#[test]
fn test_parser_error_missing_colon() {
    let err = parser_error(r#"{ "key" 123 }"#);
    assert_eq!(err.offset(), 8);
}

#[test]
fn test_parser_error_unquoted_key() {
    let err = parser_error("{ key: 1 }");
    assert!(matches!(err, ParserError::Syntax { .. }));
    assert_eq!(err.offset(), 2);
}

#[test]
fn test_parser_error_unexpected_eof() {
    assert!(matches!(parser_error(r#"{ "key": "#), ParserError::Syntax { .. }));
}

#[test]
fn test_parser_error_double_comma() {
    let err = parser_error("[1,, 2]");
    assert_eq!(err.offset(), 3);
}

#[test]
fn test_parser_error_unterminated_string() {
    let err = parser_error(r#"{ "key": "value }"#);
    assert!(matches!(err, ParserError::Syntax { .. }));
    assert_eq!(err.offset(), 9);
}

#[test]
fn test_parser_error_invalid_escape() {
    let err = parser_error(r#"["ok", "bad \x escape"]"#);
    assert!(matches!(err, ParserError::MalformedString { .. }));
    assert_eq!(err.offset(), 12);
}

#[test]
fn test_parser_error_short_unicode_escape() {
    let err = parser_error(r#"["\u12"]"#);
    assert!(matches!(err, ParserError::MalformedString { .. }));
    assert_eq!(err.offset(), 2);
}

#[test]
fn test_parser_error_raw_newline_in_string() {
    let err = parser_error("[\"line\nbreak\"]");
    assert!(matches!(err, ParserError::MalformedString { .. }));
    assert_eq!(err.offset(), 6);
}

#[test]
fn test_parser_error_truncated_numbers() {
    for source in ["[-]", "[1.]", "[1e]", "[1e+]", "[01]", "[.5]", "[+1]"] {
        let err = parser_error(source);
        assert!(
            matches!(err, ParserError::Syntax { .. }),
            "{source} gave {err:?}"
        );
        assert_eq!(err.offset(), 1, "{source}");
    }
}

#[test]
fn test_parser_error_numeric_overflow_keeps_lexeme() {
    match parser_error(r#"{"id": -9223372036854775809}"#) {
        ParserError::NumericOverflow { lexeme, .. } => {
            assert_eq!(lexeme, "-9223372036854775809")
        }
        other => panic!("Expected overflow, got {other:?}"),
    }
}

#[test]
fn test_parser_error_bad_literal() {
    let err = parser_error("[True]");
    assert!(matches!(err, ParserError::Syntax { .. }));
    assert_eq!(err.offset(), 1);
}

#[test]
fn test_parser_error_duplicate_nested_field() {
    match parser_error(r#"{"frame": {"file": "a", "file": "b"}}"#) {
        ParserError::DuplicateField { field, .. } => assert_eq!(field, "file"),
        other => panic!("Expected duplicate field, got {other:?}"),
    }
}

#[test]
fn test_parser_error_comments_are_not_json() {
    assert!(matches!(
        parser_error("// comment\n{}"),
        ParserError::Syntax { .. }
    ));
}
