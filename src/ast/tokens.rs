use std::fmt;

/// Lexical token of the expression language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Number literal, kept as source text
    ///
    /// The text is converted to a double at evaluation time.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 567.123e12
    /// .5
    /// ```
    Number(String),

    /// Variable or function name
    ///
    /// Starts with a letter, `_` or `$`, followed by letters, digits, `_` or `$`.
    ///
    /// # Examples
    /// ```text
    /// x
    /// $total
    /// dateserial
    /// ```
    Identifier(String),

    // Arithmetic
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    Backslash, // \ (integer division)
    Caret,     // ^

    // Comparison
    Lt,    // <
    LtEq,  // <= or =<
    Gt,    // >
    GtEq,  // >= or =>
    EqEq,  // ==
    NotEq, // != or <>

    // Logical
    Exclamation, // !
    AndAnd,      // &&
    OrOr,        // ||

    // Ternary
    Question, // ?
    Colon,    // :

    // Delimiters
    Comma,    // ,
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(text) => write!(f, "{}", text),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Backslash => write!(f, "\\"),
            Token::Caret => write!(f, "^"),
            Token::Lt => write!(f, "<"),
            Token::LtEq => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::GtEq => write!(f, ">="),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Exclamation => write!(f, "!"),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::Question => write!(f, "?"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
