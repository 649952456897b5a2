use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -10
    /// ```
    Integer(i64),

    /// Floating-point literal
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// -1.5
    /// ```
    Float(f64),

    /// String literal enclosed in double or single quotes
    ///
    /// # Examples
    /// ```text
    /// "ok"
    /// 'item #1'
    /// ```
    String(String),

    /// Boolean values
    Boolean(bool),

    /// Null value
    Null,

    // Identifiers and References
    /// Field name, form name or declared variable name
    ///
    /// Starts with a letter or underscore; `-` and `:` may join identifier
    /// characters.
    ///
    /// # Examples
    /// ```text
    /// status
    /// greater-than
    /// soap:Body
    /// ```
    Identifier(String),

    /// Explicit variable reference
    ///
    /// # Examples
    /// ```text
    /// $total
    /// $items
    /// ```
    Variable(String),

    /// Document root (`$`)
    Dollar,

    // Keywords
    /// Declaration keyword (`let`)
    Let,

    /// Logical AND (word, not symbol)
    And,

    /// Logical OR (word, not symbol)
    Or,

    /// Logical NOT (word, not symbol)
    Not,

    /// Universal quantifier (`all`)
    All,

    /// Existential quantifier (`any`)
    Any,

    // Delimiters
    /// Binding operator in declarations
    Equals,
    Dot,
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// Wildcard step
    Star,

    /// Text the lexer could not turn into a token.
    ///
    /// Carries the reason; the parser reports it as a syntax error.
    Invalid(String),

    /// End of file
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "integer {}", n),
            Token::Float(n) => write!(f, "number {}", n),
            Token::String(s) => write!(f, "string {:?}", s),
            Token::Boolean(b) => write!(f, "'{}'", b),
            Token::Null => write!(f, "'null'"),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::Variable(name) => write!(f, "variable '${}'", name),
            Token::Dollar => write!(f, "'$'"),
            Token::Let => write!(f, "'let'"),
            Token::And => write!(f, "'and'"),
            Token::Or => write!(f, "'or'"),
            Token::Not => write!(f, "'not'"),
            Token::All => write!(f, "'all'"),
            Token::Any => write!(f, "'any'"),
            Token::Equals => write!(f, "'='"),
            Token::Dot => write!(f, "'.'"),
            Token::Comma => write!(f, "','"),
            Token::Semicolon => write!(f, "';'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Star => write!(f, "'*'"),
            Token::Invalid(reason) => write!(f, "invalid input ({})", reason),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
