use std::mem;

use thiserror::Error;

use crate::{
    ast::{Node, NodeKind, Token},
    lexer::{LexError, Lexer},
    stack::ensure_sufficient_stack,
};

/// Nesting depth accepted by a parser unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Malformed or incomplete input.
///
/// Always carries the complete source text, not just the offending part.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid syntax: {input} ({message} at position {position})")]
pub struct ParseError {
    pub input: String,
    pub message: String,
    /// Character offset where the problem was found
    pub position: usize,
}

impl ParseError {
    fn from_lex(input: &str, error: LexError) -> Self {
        ParseError {
            input: input.to_string(),
            message: error.message,
            position: error.position,
        }
    }
}

type ParseResult = Result<Node, ParseError>;

/// Recursive-descent parser over the operator precedence table.
///
/// Each precedence level is one method. Additive and multiplicative levels
/// fold to the left; every other binary level, and the ternary, recurse to the
/// right.
///
/// # Examples
///
/// ```
/// use sprig_expr::{lexer::Lexer, parser::Parser, NodeKind};
///
/// let mut parser = Parser::new(Lexer::new("1 - 2 - 3")).unwrap();
/// let root = parser.parse().unwrap();
///
/// // (1 - 2) - 3
/// assert_eq!(root.kind(), NodeKind::Sub);
/// assert_eq!(root.children()[0].kind(), NodeKind::Sub);
/// ```
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer
            .next_token()
            .map_err(|e| ParseError::from_lex(lexer.source(), e))?;
        Ok(Parser {
            lexer,
            current_token,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Limit the nesting of brackets, prefix operators, right-associative
    /// chains and ternaries. Left-associative chains and argument lists are
    /// parsed iteratively and are not limited.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self
            .lexer
            .next_token()
            .map_err(|e| ParseError::from_lex(self.lexer.source(), e))?;
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.error(format!(
                "expected '{}', found {}",
                expected,
                self.describe_current()
            )));
        }
        self.advance()
    }

    fn describe_current(&self) -> String {
        match &self.current_token {
            Token::Eof => "end of input".to_string(),
            token => format!("'{}'", token),
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            input: self.lexer.source().to_string(),
            message: message.into(),
            position: self.lexer.token_start(),
        }
    }

    fn too_deep(&self) -> ParseError {
        self.error(format!(
            "expression nested too deeply (limit is {})",
            self.max_depth
        ))
    }

    /// Run one level of recursion, enforcing the depth limit.
    fn descend(&mut self, level: fn(&mut Self) -> ParseResult) -> ParseResult {
        if self.depth >= self.max_depth {
            return Err(self.too_deep());
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| level(self));
        self.depth -= 1;
        result
    }

    /// Parse the whole input as one expression.
    pub fn parse(&mut self) -> ParseResult {
        let root = self.parse_expression()?;
        if !self.check(&Token::Eof) {
            return Err(self.error(format!("unexpected {}", self.describe_current())));
        }
        Ok(root)
    }

    pub fn parse_expression(&mut self) -> ParseResult {
        self.descend(Self::parse_conditional)
    }

    /// `or ("?" expression ":" conditional)?`
    fn parse_conditional(&mut self) -> ParseResult {
        let condition = self.parse_or()?;
        if !self.check(&Token::Question) {
            return Ok(condition);
        }
        self.advance()?;
        let then = self.parse_expression()?;
        self.expect(Token::Colon)?;
        let otherwise = self.descend(Self::parse_conditional)?;
        Ok(Node::operator(NodeKind::Conditional, vec![condition, then, otherwise]))
    }

    /// `operand (op level)?`
    fn parse_right_assoc(
        &mut self,
        operand: fn(&mut Self) -> ParseResult,
        level: fn(&mut Self) -> ParseResult,
        op: fn(&Token) -> Option<NodeKind>,
    ) -> ParseResult {
        let left = operand(self)?;
        let Some(kind) = op(&self.current_token) else {
            return Ok(left);
        };
        self.advance()?;
        let right = self.descend(level)?;
        Ok(Node::operator(kind, vec![left, right]))
    }

    /// `operand (op operand)*`
    fn parse_left_assoc(
        &mut self,
        operand: fn(&mut Self) -> ParseResult,
        op: fn(&Token) -> Option<NodeKind>,
    ) -> ParseResult {
        let mut left = operand(self)?;
        while let Some(kind) = op(&self.current_token) {
            self.advance()?;
            let right = operand(self)?;
            left = Node::operator(kind, vec![left, right]);
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> ParseResult {
        self.parse_right_assoc(Self::parse_and, Self::parse_or, |t| {
            matches!(t, Token::OrOr).then_some(NodeKind::Or)
        })
    }

    fn parse_and(&mut self) -> ParseResult {
        self.parse_right_assoc(Self::parse_equality, Self::parse_and, |t| {
            matches!(t, Token::AndAnd).then_some(NodeKind::And)
        })
    }

    fn parse_equality(&mut self) -> ParseResult {
        self.parse_right_assoc(Self::parse_relation, Self::parse_equality, |t| match t {
            Token::EqEq => Some(NodeKind::Eq),
            Token::NotEq => Some(NodeKind::Ne),
            _ => None,
        })
    }

    fn parse_relation(&mut self) -> ParseResult {
        self.parse_right_assoc(Self::parse_additive, Self::parse_relation, |t| match t {
            Token::Lt => Some(NodeKind::Lt),
            Token::LtEq => Some(NodeKind::Le),
            Token::Gt => Some(NodeKind::Gt),
            Token::GtEq => Some(NodeKind::Ge),
            _ => None,
        })
    }

    fn parse_additive(&mut self) -> ParseResult {
        self.parse_left_assoc(Self::parse_multiplicative, |t| match t {
            Token::Plus => Some(NodeKind::Add),
            Token::Minus => Some(NodeKind::Sub),
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> ParseResult {
        self.parse_left_assoc(Self::parse_power, |t| match t {
            Token::Star => Some(NodeKind::Mul),
            Token::Slash => Some(NodeKind::Div),
            Token::Backslash => Some(NodeKind::IntDiv),
            _ => None,
        })
    }

    fn parse_power(&mut self) -> ParseResult {
        self.parse_right_assoc(Self::parse_signed, Self::parse_power, |t| {
            matches!(t, Token::Caret).then_some(NodeKind::Pow)
        })
    }

    /// `("+" | "-" | "!") signed | atom`
    fn parse_signed(&mut self) -> ParseResult {
        let kind = match self.current_token {
            Token::Plus => NodeKind::Plus,
            Token::Minus => NodeKind::Minus,
            Token::Exclamation => NodeKind::Not,
            _ => return self.parse_atom(),
        };
        self.advance()?;
        let operand = self.descend(Self::parse_signed)?;
        Ok(Node::operator(kind, vec![operand]))
    }

    /// Number, function call, identifier or bracketed expression.
    fn parse_atom(&mut self) -> ParseResult {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Number(text) => {
                self.advance()?;
                Ok(Node::leaf(NodeKind::Number, text))
            }
            Token::Identifier(name) => {
                self.advance()?;
                if self.check(&Token::LParen) {
                    self.parse_call(name)
                } else {
                    Ok(Node::leaf(NodeKind::Identifier, name))
                }
            }
            Token::LParen => self.parse_group(Token::RParen),
            Token::LBracket => self.parse_group(Token::RBracket),
            Token::LBrace => self.parse_group(Token::RBrace),
            token => {
                self.current_token = token;
                Err(self.error(format!("unexpected {}", self.describe_current())))
            }
        }
    }

    /// Body of a bracketed expression; the opening bracket is already taken.
    fn parse_group(&mut self, closer: Token) -> ParseResult {
        self.advance()?;
        let inner = self.parse_expression()?;
        self.expect(closer)?;
        Ok(Node::operator(NodeKind::NoOp, vec![inner]))
    }

    /// `name "(" arguments? ")"`, positioned on the opening parenthesis.
    fn parse_call(&mut self, name: String) -> ParseResult {
        self.advance()?;
        if self.check(&Token::RParen) {
            self.advance()?;
            return Ok(Node::leaf(NodeKind::FunctionCall, name));
        }
        let arguments = self.parse_arguments()?;
        self.expect(Token::RParen)?;
        Ok(Node::new(NodeKind::FunctionCall, name, vec![arguments]))
    }

    /// `expression ("," expression)*`, folded to the right once collected.
    fn parse_arguments(&mut self) -> ParseResult {
        let first = self.parse_expression()?;
        let mut rest = Vec::new();
        while self.check(&Token::Comma) {
            self.advance()?;
            rest.push(self.parse_expression()?);
        }

        let pair = |arg: Node, tail: Node| Node::operator(NodeKind::FunctionArgs, vec![arg, tail]);
        Ok(match rest.into_iter().rev().reduce(|tail, arg| pair(arg, tail)) {
            Some(tail) => pair(first, tail),
            None => first,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParseResult {
        Parser::new(Lexer::new(input))?.parse()
    }

    #[test]
    fn test_nesting_limit_rejects_deep_brackets() {
        let input = format!("{}1{}", "(".repeat(300), ")".repeat(300));
        let err = parse(&input).unwrap_err();
        assert!(err.message.contains("nested too deeply"), "{}", err);
        assert_eq!(err.input, input);
    }

    #[test]
    fn test_nesting_limit_accepts_moderate_depth() {
        let input = format!("{}1{}", "[".repeat(100), "]".repeat(100));
        assert!(parse(&input).is_ok());
    }

    #[test]
    fn test_left_chains_are_not_limited() {
        let input = vec!["1"; 1000].join("+");
        let root = parse(&input).unwrap();
        assert_eq!(root.height(), 1000);
    }

    #[test]
    fn test_argument_lists_are_not_limited() {
        let args: Vec<String> = (0..1000).map(|n| n.to_string()).collect();
        let root = parse(&format!("max({})", args.join(","))).unwrap();
        assert_eq!(root.kind(), NodeKind::FunctionCall);
        assert_eq!(root.node_count(), 1 + 999 + 1000);
    }

    #[test]
    fn test_arguments_keep_right_fold_shape() {
        let root = parse("f(a, b, c)").unwrap();
        let args = &root.children()[0];
        assert_eq!(args.children()[0].text(), "a");
        let rest = &args.children()[1];
        assert_eq!(rest.kind(), NodeKind::FunctionArgs);
        assert_eq!(rest.children()[0].text(), "b");
        assert_eq!(rest.children()[1].text(), "c");
    }

    #[test]
    fn test_nesting_limit_counts_prefix_operators() {
        let input = format!("{}1", "-".repeat(300));
        assert!(parse(&input).is_err());
    }

    #[test]
    fn test_custom_limit() {
        let mut parser = Parser::new(Lexer::new("((1))")).unwrap().with_max_depth(2);
        assert!(parser.parse().is_err());

        let mut parser = Parser::new(Lexer::new("((1))")).unwrap().with_max_depth(3);
        assert!(parser.parse().is_ok());
    }
}
