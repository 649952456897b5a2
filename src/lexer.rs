use crate::ast::Token;

/// 1-based location of a token in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A token together with where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub position: Position,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn here(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Skips whitespace and `//` or `#` line comments.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' || (ch == '/' && self.peek_char(1) == Some('/')) {
                while self.current_char().is_some_and(|c| c != '\n') {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn is_identifier_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_'
    }

    /// Reads an identifier. `-` and `:` are kept only when they join two
    /// identifier characters, so `greater-than` and `soap:Body` stay whole.
    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_identifier_char(ch) {
                result.push(ch);
                self.advance();
            } else if (ch == '-' || ch == ':')
                && !result.is_empty()
                && self.peek_char(1).is_some_and(Self::is_identifier_char)
            {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Token {
        let mut result = String::new();
        // First bad escape; reported once the closing quote is found
        let mut bad_escape = None;
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return match bad_escape {
                        Some(escape) => Token::Invalid(format!("invalid escape sequence '\\{}'", escape)),
                        None => Token::String(result),
                    };
                }
                '\\' => {
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some(ch) => {
                            bad_escape.get_or_insert(ch);
                        }
                        None => {
                            return Token::Invalid(
                                "unterminated string: unexpected end of input after backslash"
                                    .to_string(),
                            );
                        }
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Token::Invalid("unterminated string: missing closing quote".to_string())
    }

    fn read_number(&mut self) -> Token {
        let mut number = String::new();
        let mut is_float = false;

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if is_float {
            match number.parse::<f64>() {
                Ok(n) => Token::Float(n),
                Err(_) => Token::Invalid(format!("invalid number '{}'", number)),
            }
        } else {
            match number.parse::<i64>() {
                Ok(n) => Token::Integer(n),
                Err(_) => Token::Invalid(format!("integer '{}' is out of range", number)),
            }
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    pub fn next_token(&mut self) -> SpannedToken {
        self.skip_trivia();
        let position = self.here();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('$') => {
                if self
                    .peek_char(1)
                    .is_some_and(|c| c.is_alphabetic() || c == '_')
                {
                    self.advance();
                    Token::Variable(self.read_identifier())
                } else {
                    self.single(Token::Dollar)
                }
            }
            Some('.') => self.single(Token::Dot),
            Some(',') => self.single(Token::Comma),
            Some(';') => self.single(Token::Semicolon),
            Some('=') => self.single(Token::Equals),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some('*') => self.single(Token::Star),
            Some('"') => self.read_string('"'),
            Some('\'') => self.read_string('\''),
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "let" => Token::Let,
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "all" => Token::All,
                    "any" => Token::Any,
                    "true" => Token::Boolean(true),
                    "false" => Token::Boolean(false),
                    "null" => Token::Null,
                    _ => Token::Identifier(ident),
                }
            }
            Some(ch) => {
                self.advance();
                Token::Invalid(format!("unexpected character '{}'", ch))
            }
        };

        SpannedToken { token, position }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("let and or not all any true false null");
    assert_eq!(lexer.next_token().token, Token::Let);
    assert_eq!(lexer.next_token().token, Token::And);
    assert_eq!(lexer.next_token().token, Token::Or);
    assert_eq!(lexer.next_token().token, Token::Not);
    assert_eq!(lexer.next_token().token, Token::All);
    assert_eq!(lexer.next_token().token, Token::Any);
    assert_eq!(lexer.next_token().token, Token::Boolean(true));
    assert_eq!(lexer.next_token().token, Token::Boolean(false));
    assert_eq!(lexer.next_token().token, Token::Null);
    assert_eq!(lexer.next_token().token, Token::Eof);
}

#[test]
fn test_declaration() {
    let mut lexer = Lexer::new("let s = order.items[0];");
    assert_eq!(lexer.next_token().token, Token::Let);
    assert_eq!(lexer.next_token().token, Token::Identifier("s".to_string()));
    assert_eq!(lexer.next_token().token, Token::Equals);
    assert_eq!(lexer.next_token().token, Token::Identifier("order".to_string()));
    assert_eq!(lexer.next_token().token, Token::Dot);
    assert_eq!(lexer.next_token().token, Token::Identifier("items".to_string()));
    assert_eq!(lexer.next_token().token, Token::LBracket);
    assert_eq!(lexer.next_token().token, Token::Integer(0));
    assert_eq!(lexer.next_token().token, Token::RBracket);
    assert_eq!(lexer.next_token().token, Token::Semicolon);
}

#[test]
fn test_positions_track_lines() {
    let mut lexer = Lexer::new("let a = b;\n  exists(a)");
    let mut last = lexer.next_token();
    while last.token != Token::Identifier("exists".to_string()) {
        last = lexer.next_token();
    }
    assert_eq!(last.position, Position { line: 2, column: 3 });
}
