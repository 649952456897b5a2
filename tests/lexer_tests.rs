// tests/lexer_tests.rs

use specl::ast::Token;
use specl::lexer::{Lexer, Position};

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token().token;
        if token == Token::Eof {
            return tokens;
        }
        tokens.push(token);
    }
}

// ============================================================================
// Punctuation
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("$", Token::Dollar),
        (".", Token::Dot),
        (",", Token::Comma),
        (";", Token::Semicolon),
        ("=", Token::Equals),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        ("*", Token::Star),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        assert_eq!(lexer.next_token().token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().token, Token::Eof);
    }
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(
        tokens("0 42 -7 3.25 -1.5"),
        vec![
            Token::Integer(0),
            Token::Integer(42),
            Token::Integer(-7),
            Token::Float(3.25),
            Token::Float(-1.5),
        ]
    );
}

#[test]
fn test_integer_followed_by_dot_is_not_float() {
    assert_eq!(
        tokens("items[0].price"),
        vec![
            Token::Identifier("items".to_string()),
            Token::LBracket,
            Token::Integer(0),
            Token::RBracket,
            Token::Dot,
            Token::Identifier("price".to_string()),
        ]
    );
}

#[test]
fn test_strings_and_escapes() {
    assert_eq!(
        tokens(r#""ok" 'single' "a\"b\n""#),
        vec![
            Token::String("ok".to_string()),
            Token::String("single".to_string()),
            Token::String("a\"b\n".to_string()),
        ]
    );
}

#[test]
fn test_unterminated_string_is_invalid() {
    let mut lexer = Lexer::new("\"open");
    assert!(matches!(lexer.next_token().token, Token::Invalid(_)));
}

#[test]
fn test_invalid_escape_is_invalid() {
    let mut lexer = Lexer::new(r#""bad\q""#);
    assert!(matches!(lexer.next_token().token, Token::Invalid(msg) if msg.contains("\\q")));
}

#[test]
fn test_invalid_escape_consumes_whole_string() {
    let tokens = tokens(r#""a\qb\z" ; exists(c)"#);
    assert_eq!(tokens.len(), 6);
    assert!(matches!(&tokens[0], Token::Invalid(msg) if msg.contains("\\q")));
    assert_eq!(tokens[1], Token::Semicolon);
    assert_eq!(tokens[2], Token::Identifier("exists".to_string()));
}

#[test]
fn test_integer_overflow_is_invalid() {
    let mut lexer = Lexer::new("99999999999999999999");
    assert!(matches!(lexer.next_token().token, Token::Invalid(_)));
}

// ============================================================================
// Identifiers, variables and keywords
// ============================================================================

#[test]
fn test_hyphenated_and_namespaced_identifiers() {
    assert_eq!(
        tokens("greater-than soap:Body not-equals"),
        vec![
            Token::Identifier("greater-than".to_string()),
            Token::Identifier("soap:Body".to_string()),
            Token::Identifier("not-equals".to_string()),
        ]
    );
}

#[test]
fn test_trailing_hyphen_is_not_part_of_identifier() {
    let mut lexer = Lexer::new("a- b");
    assert_eq!(lexer.next_token().token, Token::Identifier("a".to_string()));
    assert!(matches!(lexer.next_token().token, Token::Invalid(_)));
}

#[test]
fn test_variables_and_root() {
    assert_eq!(
        tokens("$total $ $.a"),
        vec![
            Token::Variable("total".to_string()),
            Token::Dollar,
            Token::Dollar,
            Token::Dot,
            Token::Identifier("a".to_string()),
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(
        tokens("letter android nothing"),
        vec![
            Token::Identifier("letter".to_string()),
            Token::Identifier("android".to_string()),
            Token::Identifier("nothing".to_string()),
        ]
    );
}

// ============================================================================
// Trivia and positions
// ============================================================================

#[test]
fn test_comments_are_skipped() {
    let source = "// leading comment\nexists(a) # trailing\n";
    assert_eq!(
        tokens(source),
        vec![
            Token::Identifier("exists".to_string()),
            Token::LParen,
            Token::Identifier("a".to_string()),
            Token::RParen,
        ]
    );
}

#[test]
fn test_positions_are_one_based() {
    let mut lexer = Lexer::new("let x = y;\n\n   equals(x, 1)");
    assert_eq!(lexer.next_token().position, Position { line: 1, column: 1 });
    let mut token = lexer.next_token();
    while token.token != Token::Identifier("equals".to_string()) {
        token = lexer.next_token();
    }
    assert_eq!(token.position, Position { line: 3, column: 4 });
}

#[test]
fn test_eof_is_repeated() {
    let mut lexer = Lexer::new("");
    assert_eq!(lexer.next_token().token, Token::Eof);
    assert_eq!(lexer.next_token().token, Token::Eof);
}
