//! Integration tests for the selector tokenizer.

use cssq_selector::{CSSTokenizer, HashType, NumericType, SyntaxError, Token, tokenize};

fn tokens(input: &str) -> Vec<Token> {
    tokenize(input).unwrap()
}

#[test]
fn test_empty_input() {
    assert!(tokens("").is_empty());
    assert!(tokens("   \n\t ").is_empty());
}

#[test]
fn test_leading_and_trailing_whitespace_is_dropped() {
    assert_eq!(tokens("  div  "), vec![Token::ident("div")]);
}

#[test]
fn test_child_combinator_sequence() {
    assert_eq!(
        tokens("a > b"),
        vec![
            Token::ident("a"),
            Token::Whitespace,
            Token::delim('>'),
            Token::Whitespace,
            Token::ident("b"),
        ]
    );
}

#[test]
fn test_whitespace_run_is_one_token() {
    assert_eq!(
        tokens("a \n\t b"),
        vec![Token::ident("a"), Token::Whitespace, Token::ident("b")]
    );
}

#[test]
fn test_hash_types() {
    assert_eq!(
        tokens("#main"),
        vec![Token::Hash {
            value: "main".to_string(),
            hash_type: HashType::Id,
        }]
    );
    assert_eq!(
        tokens("#123"),
        vec![Token::Hash {
            value: "123".to_string(),
            hash_type: HashType::Unrestricted,
        }]
    );
    // A lone `#` is a delimiter.
    assert_eq!(tokens("# a")[0], Token::delim('#'));
}

#[test]
fn test_function_and_parens() {
    assert_eq!(
        tokens(":not(.a)"),
        vec![
            Token::Colon,
            Token::function("not"),
            Token::delim('.'),
            Token::ident("a"),
            Token::RightParen,
        ]
    );
}

#[test]
fn test_vendor_prefixed_function() {
    assert_eq!(tokens("-moz-any(")[0], Token::function("-moz-any"));
}

#[test]
fn test_strings() {
    assert_eq!(tokens(r#""hello""#), vec![Token::string("hello")]);
    assert_eq!(tokens("'it\\'s'"), vec![Token::string("it's")]);
    // Backslash-newline continues the string.
    assert_eq!(tokens("\"a\\\nb\""), vec![Token::string("ab")]);
}

#[test]
fn test_unterminated_string() {
    assert_eq!(
        tokenize("[a=\"https://"),
        Err(SyntaxError::UnterminatedString("https://".to_string()))
    );
}

#[test]
fn test_newline_in_string() {
    assert_eq!(tokenize("\"a\nb\""), Err(SyntaxError::NewlineInString));
}

#[test]
fn test_comments_are_dropped() {
    assert_eq!(tokens("/* note */a"), vec![Token::ident("a")]);
    assert_eq!(
        tokens("a/**/b"),
        vec![Token::ident("a"), Token::ident("b")]
    );
}

#[test]
fn test_unterminated_comment() {
    assert_eq!(tokenize("a /* never"), Err(SyntaxError::UnterminatedComment));
}

#[test]
fn test_numbers() {
    let Token::Number(number) = &tokens("42")[0] else {
        panic!("expected number");
    };
    assert_eq!(number.int_value, Some(42));
    assert_eq!(number.numeric_type, NumericType::Integer);

    let Token::Number(number) = &tokens("-1.5")[0] else {
        panic!("expected number");
    };
    assert_eq!(number.int_value, None);
    assert_eq!(number.numeric_type, NumericType::Number);
    assert!((number.value + 1.5).abs() < f64::EPSILON);

    let Token::Number(number) = &tokens("+.5e2")[0] else {
        panic!("expected number");
    };
    assert_eq!(number.repr, "+.5e2");
    assert!((number.value - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_dimension() {
    match &tokens("2n")[0] {
        Token::Dimension { number, unit } => {
            assert_eq!(number.int_value, Some(2));
            assert_eq!(unit, "n");
        }
        other => panic!("expected dimension, got {other:?}"),
    }
}

#[test]
fn test_at_keyword() {
    assert_eq!(tokens("@media"), vec![Token::AtKeyword("media".to_string())]);
    assert_eq!(tokens("@ ")[0], Token::delim('@'));
}

#[test]
fn test_single_code_point_escape() {
    assert_eq!(tokens(r"a\.b"), vec![Token::ident("a.b")]);
    assert_eq!(tokens(r"\:hover"), vec![Token::ident(":hover")]);
}

#[test]
fn test_hex_escape_is_not_decoded() {
    assert_eq!(tokens(r"\41"), vec![Token::ident("41")]);
}

#[test]
fn test_escape_at_end_of_input() {
    assert_eq!(tokenize("a\\"), Err(SyntaxError::UnterminatedEscape));
    assert_eq!(tokenize("\\"), Err(SyntaxError::InvalidEscape));
}

#[test]
fn test_backslash_newline_outside_string() {
    assert_eq!(tokenize("a \\\nb"), Err(SyntaxError::InvalidEscape));
}

#[test]
fn test_attribute_matcher_delims() {
    assert_eq!(
        tokens("[lang|=en]"),
        vec![
            Token::LeftBracket,
            Token::ident("lang"),
            Token::delim('|'),
            Token::delim('='),
            Token::ident("en"),
            Token::RightBracket,
        ]
    );
}

#[test]
fn test_tokenizer_struct_api() {
    let mut tokenizer = CSSTokenizer::new(".a, .b");
    tokenizer.run().unwrap();
    assert_eq!(tokenizer.tokens().len(), 6);
    assert_eq!(tokenizer.into_tokens()[2], Token::Comma);
}

#[test]
fn test_token_json() {
    let json = serde_json::to_value(tokens("a")).unwrap();
    assert_eq!(json, serde_json::json!([{ "type": "ident", "value": "a" }]));
}
