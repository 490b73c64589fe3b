// tests/lexer_tests.rs

use sprig_expr::ast::Token;
use sprig_expr::lexer::Lexer;

fn tokens(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize().unwrap()
}

fn number(text: &str) -> Token {
    Token::Number(text.to_string())
}

fn ident(name: &str) -> Token {
    Token::Identifier(name.to_string())
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("+", Token::Plus),
        ("-", Token::Minus),
        ("*", Token::Star),
        ("/", Token::Slash),
        ("\\", Token::Backslash),
        ("^", Token::Caret),
        ("!", Token::Exclamation),
        ("?", Token::Question),
        (":", Token::Colon),
        (",", Token::Comma),
        ("<", Token::Lt),
        (">", Token::Gt),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        ("{", Token::LBrace),
        ("}", Token::RBrace),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        assert_eq!(lexer.next_token(), Ok(expected), "input: {}", input);
        assert_eq!(lexer.next_token(), Ok(Token::Eof));
    }
}

// ============================================================================
// Multi Character Operators
// ============================================================================

#[test]
fn test_two_char_operators() {
    let test_cases = vec![
        ("==", Token::EqEq),
        ("!=", Token::NotEq),
        ("<>", Token::NotEq),
        ("<=", Token::LtEq),
        ("=<", Token::LtEq),
        (">=", Token::GtEq),
        ("=>", Token::GtEq),
        ("&&", Token::AndAnd),
        ("||", Token::OrOr),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tokens(input), vec![expected, Token::Eof], "input: {}", input);
    }
}

#[test]
fn test_lone_halves_of_operators_are_errors() {
    for input in ["=", "&", "|", "1 = 2", "a & b", "a | b"] {
        assert!(Lexer::new(input).tokenize().is_err(), "input: {}", input);
    }
}

#[test]
fn test_not_followed_by_space_then_equals() {
    assert_eq!(
        tokens("! =<"),
        vec![Token::Exclamation, Token::LtEq, Token::Eof]
    );
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_number_forms() {
    for input in ["567", "567.123", "567e12", "567.123e12", ".123", "0.123", "1E+5", "1e-5"] {
        assert_eq!(tokens(input), vec![number(input), Token::Eof], "input: {}", input);
    }
}

#[test]
fn test_leading_minus_is_separate_token() {
    assert_eq!(
        tokens("-567.123e12"),
        vec![Token::Minus, number("567.123e12"), Token::Eof]
    );
}

#[test]
fn test_malformed_numbers() {
    for input in ["12.", "12..", "12..32", "12.e15", "12ee51", "1e", "1e+", "."] {
        let err = Lexer::new(input).tokenize().unwrap_err();
        assert!(
            err.message.contains("expected digits"),
            "input: {}, error: {}",
            input,
            err
        );
    }
}

#[test]
fn test_number_stops_at_second_exponent() {
    // The parser rejects the trailing identifier
    assert_eq!(
        tokens("12.32e13e15"),
        vec![number("12.32e13"), ident("e15"), Token::Eof]
    );
    assert_eq!(tokens("12e5.15"), vec![number("12e5"), number(".15"), Token::Eof]);
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_identifiers() {
    assert_eq!(
        tokens("x _tmp $total rate2 Hours"),
        vec![
            ident("x"),
            ident("_tmp"),
            ident("$total"),
            ident("rate2"),
            ident("Hours"),
            Token::Eof
        ]
    );
}

#[test]
fn test_identifier_cannot_start_with_digit() {
    assert_eq!(tokens("2x"), vec![number("2"), ident("x"), Token::Eof]);
}

#[test]
fn test_function_call_tokens() {
    assert_eq!(
        tokens("min(a, 1)"),
        vec![
            ident("min"),
            Token::LParen,
            ident("a"),
            Token::Comma,
            number("1"),
            Token::RParen,
            Token::Eof
        ]
    );
}

// ============================================================================
// Whitespace & Errors
// ============================================================================

#[test]
fn test_whitespace_is_insignificant() {
    assert_eq!(tokens(" \t1\n+\r\n2 "), tokens("1+2"));
}

#[test]
fn test_empty_input() {
    assert_eq!(tokens(""), vec![Token::Eof]);
    assert_eq!(tokens("   "), vec![Token::Eof]);
}

#[test]
fn test_unexpected_character_position() {
    let err = Lexer::new("1 + #").tokenize().unwrap_err();
    assert_eq!(err.position, 4);
    assert!(err.message.contains('#'));
}
