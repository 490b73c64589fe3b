use thiserror::Error;

use crate::ast::Token;

/// Input that does not form a valid token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct LexError {
    pub message: String,
    /// Character offset of the offending input
    pub position: usize,
}

pub struct Lexer {
    source: String,
    input: Vec<char>,
    position: usize,
    token_start: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            source: input.to_string(),
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// The complete text being tokenized.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Character offset where the most recently returned token starts.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            message: message.into(),
            position: self.position,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_digits(&mut self, into: &mut String) {
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                into.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// `digits [. digits] [e [+|-] digits]` or `. digits [e [+|-] digits]`
    fn read_number(&mut self) -> Result<Token, LexError> {
        let mut number = String::new();
        self.read_digits(&mut number);

        if self.current_char() == Some('.') {
            if !self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error("expected digits after '.'"));
            }
            number.push('.');
            self.advance();
            self.read_digits(&mut number);
        }

        if let Some(e @ ('e' | 'E')) = self.current_char() {
            let sign = match self.peek_char(1) {
                Some(s @ ('+' | '-')) => Some(s),
                _ => None,
            };
            let digits_at = if sign.is_some() { 2 } else { 1 };
            if !self.peek_char(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error("expected digits in exponent"));
            }
            number.push(e);
            self.advance();
            if let Some(s) = sign {
                number.push(s);
                self.advance();
            }
            self.read_digits(&mut number);
        }

        Ok(Token::Number(number))
    }

    /// Consume `ch` and return `long` when it follows, otherwise `short`.
    fn either(&mut self, ch: char, long: Token, short: Token) -> Token {
        self.advance();
        if self.current_char() == Some(ch) {
            self.advance();
            long
        } else {
            short
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.position;

        let Some(ch) = self.current_char() else {
            return Ok(Token::Eof);
        };

        let token = match ch {
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '*' => self.single(Token::Star),
            '/' => self.single(Token::Slash),
            '\\' => self.single(Token::Backslash),
            '^' => self.single(Token::Caret),
            '?' => self.single(Token::Question),
            ':' => self.single(Token::Colon),
            ',' => self.single(Token::Comma),
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '>' => self.either('=', Token::GtEq, Token::Gt),
            '!' => self.either('=', Token::NotEq, Token::Exclamation),
            '<' => match self.peek_char(1) {
                Some('=') => {
                    self.advance();
                    self.single(Token::LtEq)
                }
                Some('>') => {
                    self.advance();
                    self.single(Token::NotEq)
                }
                _ => self.single(Token::Lt),
            },
            '=' => match self.peek_char(1) {
                Some('=') => {
                    self.advance();
                    self.single(Token::EqEq)
                }
                Some('<') => {
                    self.advance();
                    self.single(Token::LtEq)
                }
                Some('>') => {
                    self.advance();
                    self.single(Token::GtEq)
                }
                _ => return Err(self.error("unexpected '=' (did you mean '=='?)")),
            },
            '&' => {
                if self.peek_char(1) != Some('&') {
                    return Err(self.error("unexpected '&' (did you mean '&&'?)"));
                }
                self.advance();
                self.single(Token::AndAnd)
            }
            '|' => {
                if self.peek_char(1) != Some('|') {
                    return Err(self.error("unexpected '|' (did you mean '||'?)"));
                }
                self.advance();
                self.single(Token::OrOr)
            }
            '.' => {
                if !self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                    return Err(self.error("expected digits after '.'"));
                }
                self.read_number()?
            }
            c if c.is_ascii_digit() => self.read_number()?,
            c if c.is_alphabetic() || c == '_' || c == '$' => Token::Identifier(self.read_identifier()),
            c => return Err(self.error(format!("unexpected character '{}'", c))),
        };

        Ok(token)
    }

    /// Tokenize the entire input, ending with [`Token::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

#[test]
fn test_alternative_relational_spellings() {
    let mut lexer = Lexer::new("=< => <> <=");
    assert_eq!(lexer.next_token(), Ok(Token::LtEq));
    assert_eq!(lexer.next_token(), Ok(Token::GtEq));
    assert_eq!(lexer.next_token(), Ok(Token::NotEq));
    assert_eq!(lexer.next_token(), Ok(Token::LtEq));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_token_start_tracks_whitespace() {
    let mut lexer = Lexer::new("  abs ( 1 )");
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("abs".to_string())));
    assert_eq!(lexer.token_start(), 2);
    assert_eq!(lexer.next_token(), Ok(Token::LParen));
    assert_eq!(lexer.token_start(), 6);
}
