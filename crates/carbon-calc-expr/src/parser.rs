//! Expression parser
//!
//! A recursive descent parser for the arithmetic mini-language with proper
//! operator precedence.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{ExprError, ExprResult};

/// Parse an expression string into an AST
///
/// # Example
/// ```rust
/// use carbon_calc_expr::parse;
///
/// let ast = parse("1 + 2 * 3").unwrap();
/// let ast = parse("capacity * 8760 * capacity_factor").unwrap();
/// let ast = parse("x > 0 ? x : 0").unwrap();
/// ```
pub fn parse(input: &str) -> ExprResult<Expr> {
    let mut parser = ExprParser::new(input);
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    match parser.current_token() {
        Token::Eof => Ok(expr),
        other => Err(ExprError::Parse(format!(
            "Unexpected token {:?} after expression",
            other
        ))),
    }
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    // Literals and identifiers
    Number(f64),
    Ident(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Question,
    Colon,

    // Delimiters
    LeftParen,
    RightParen,

    // Anything the scanner does not recognize
    Unknown(char),

    // End of input
    Eof,
}

/// Expression parser
struct ExprParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Option<Token>,
}

impl<'a> ExprParser<'a> {
    fn new(input: &'a str) -> Self {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: None,
        };
        parser.advance_token();
        parser
    }

    // === Token scanning ===

    fn advance_token(&mut self) {
        self.current_token = Some(self.scan_token());
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();

        if self.is_at_end() {
            return Token::Eof;
        }

        let c = self.peek_char().unwrap();

        // Single-character tokens
        match c {
            '+' => {
                self.advance();
                return Token::Plus;
            }
            '-' => {
                self.advance();
                return Token::Minus;
            }
            '*' => {
                self.advance();
                return Token::Star;
            }
            '/' => {
                self.advance();
                return Token::Slash;
            }
            '^' => {
                self.advance();
                return Token::Caret;
            }
            '?' => {
                self.advance();
                return Token::Question;
            }
            ':' => {
                self.advance();
                return Token::Colon;
            }
            '(' => {
                self.advance();
                return Token::LeftParen;
            }
            ')' => {
                self.advance();
                return Token::RightParen;
            }
            _ => {}
        }

        // Two-character operators
        if c == '<' {
            self.advance();
            if self.peek_char() == Some('=') {
                self.advance();
                return Token::LessEqual;
            }
            return Token::LessThan;
        }

        if c == '>' {
            self.advance();
            if self.peek_char() == Some('=') {
                self.advance();
                return Token::GreaterEqual;
            }
            return Token::GreaterThan;
        }

        if c == '=' {
            self.advance();
            if self.peek_char() == Some('=') {
                self.advance();
                return Token::Equal;
            }
            return Token::Unknown('=');
        }

        if c == '!' {
            self.advance();
            if self.peek_char() == Some('=') {
                self.advance();
                return Token::NotEqual;
            }
            return Token::Unknown('!');
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        // Identifier
        if c.is_ascii_alphabetic() || c == '_' {
            return self.scan_identifier();
        }

        self.advance();
        Token::Unknown(c)
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part; only consumed when digits follow, so "2e" scans as
        // the number 2 and the identifier e
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            let mut lookahead = 1;
            if self
                .peek_char_at(1)
                .map_or(false, |c| c == '+' || c == '-')
            {
                lookahead = 2;
            }
            if self
                .peek_char_at(lookahead)
                .map_or(false, |c| c.is_ascii_digit())
            {
                self.advance(); // e/E
                if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                    self.advance();
                }
                while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let num_str = &self.input[start..self.pos];
        let num: f64 = num_str.parse().unwrap_or(0.0);
        Token::Number(num)
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;

        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        Token::Ident(self.input[start..self.pos].to_string())
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_token(&self) -> &Token {
        self.current_token.as_ref().unwrap_or(&Token::Eof)
    }

    fn consume(&mut self) -> Token {
        let token = self.current_token.take().unwrap_or(Token::Eof);
        self.advance_token();
        token
    }

    fn expect(&mut self, expected: &Token) -> ExprResult<()> {
        if self.current_token() == expected {
            self.consume();
            Ok(())
        } else {
            Err(ExprError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Ternary conditional: ?:
    // 2. Comparison: ==, !=, <, <=, >, >=
    // 3. Addition/Subtraction: +, -
    // 4. Multiplication/Division: *, /
    // 5. Unary: -
    // 6. Exponentiation: ^ (right-associative)
    // 7. Primary: literals, identifiers, parentheses

    fn parse_expression(&mut self) -> ExprResult<Expr> {
        self.parse_ternary()
    }

    fn parse_ternary(&mut self) -> ExprResult<Expr> {
        let cond = self.parse_comparison()?;

        if matches!(self.current_token(), Token::Question) {
            self.consume();
            let then = self.parse_ternary()?;
            self.expect(&Token::Colon)?;
            let otherwise = self.parse_ternary()?;
            return Ok(Expr::Ternary {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            });
        }

        Ok(cond)
    }

    fn parse_comparison(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.current_token() {
                Token::Equal => BinaryOperator::Equal,
                Token::NotEqual => BinaryOperator::NotEqual,
                Token::LessThan => BinaryOperator::LessThan,
                Token::LessEqual => BinaryOperator::LessEqual,
                Token::GreaterThan => BinaryOperator::GreaterThan,
                Token::GreaterEqual => BinaryOperator::GreaterEqual,
                _ => break,
            };

            self.consume();
            let right = self.parse_additive()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume();
            let right = self.parse_multiplicative()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ExprResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume();
            let right = self.parse_unary()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ExprResult<Expr> {
        if matches!(self.current_token(), Token::Minus) {
            self.consume();
            let operand = self.parse_unary()?;
            return Ok(Expr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(operand),
            });
        }

        self.parse_power()
    }

    fn parse_power(&mut self) -> ExprResult<Expr> {
        let base = self.parse_primary()?;

        if matches!(self.current_token(), Token::Caret) {
            self.consume();
            // Right-associative; going through unary also admits `2^-3`
            let exponent = self.parse_unary()?;
            return Ok(Expr::BinaryOp {
                op: BinaryOperator::Power,
                left: Box::new(base),
                right: Box::new(exponent),
            });
        }

        Ok(base)
    }

    fn parse_primary(&mut self) -> ExprResult<Expr> {
        match self.consume() {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Ident(name) => Ok(Expr::Ident(name)),
            Token::LeftParen => {
                let expr = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }
            other => Err(ExprError::Parse(format!(
                "Expected a number, identifier, or '(', got {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn test_parse_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let ast = parse("1 + 2 * 3").unwrap();
        assert_eq!(
            ast,
            Expr::BinaryOp {
                op: BinaryOperator::Add,
                left: num(1.0),
                right: Box::new(Expr::BinaryOp {
                    op: BinaryOperator::Multiply,
                    left: num(2.0),
                    right: num(3.0),
                }),
            }
        );
    }

    #[test]
    fn test_parse_parentheses() {
        let ast = parse("(1 + 2) * 3").unwrap();
        assert_eq!(
            ast,
            Expr::BinaryOp {
                op: BinaryOperator::Multiply,
                left: Box::new(Expr::BinaryOp {
                    op: BinaryOperator::Add,
                    left: num(1.0),
                    right: num(2.0),
                }),
                right: num(3.0),
            }
        );
    }

    #[test]
    fn test_parse_power_right_associative() {
        // 2 ^ 3 ^ 2 parses as 2 ^ (3 ^ 2)
        let ast = parse("2 ^ 3 ^ 2").unwrap();
        assert_eq!(
            ast,
            Expr::BinaryOp {
                op: BinaryOperator::Power,
                left: num(2.0),
                right: Box::new(Expr::BinaryOp {
                    op: BinaryOperator::Power,
                    left: num(3.0),
                    right: num(2.0),
                }),
            }
        );
    }

    #[test]
    fn test_parse_unary_minus_binds_looser_than_power() {
        // -2 ^ 2 parses as -(2 ^ 2)
        let ast = parse("-2 ^ 2").unwrap();
        assert_eq!(
            ast,
            Expr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(Expr::BinaryOp {
                    op: BinaryOperator::Power,
                    left: num(2.0),
                    right: num(2.0),
                }),
            }
        );
    }

    #[test]
    fn test_parse_ternary() {
        let ast = parse("x > 0 ? x : 0").unwrap();
        assert_eq!(
            ast,
            Expr::Ternary {
                cond: Box::new(Expr::BinaryOp {
                    op: BinaryOperator::GreaterThan,
                    left: Box::new(Expr::Ident("x".into())),
                    right: num(0.0),
                }),
                then: Box::new(Expr::Ident("x".into())),
                otherwise: num(0.0),
            }
        );
    }

    #[test]
    fn test_parse_ternary_right_associative() {
        // a ? 1 : b ? 2 : 3 parses as a ? 1 : (b ? 2 : 3)
        let ast = parse("a ? 1 : b ? 2 : 3").unwrap();
        match ast {
            Expr::Ternary { otherwise, .. } => {
                assert!(matches!(*otherwise, Expr::Ternary { .. }));
            }
            other => panic!("Expected ternary, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_scientific_notation() {
        assert_eq!(parse("1.5e3").unwrap(), Expr::Number(1500.0));
        assert_eq!(parse("2E-2").unwrap(), Expr::Number(0.02));
        assert_eq!(parse("3e+1").unwrap(), Expr::Number(30.0));
        assert_eq!(parse(".5").unwrap(), Expr::Number(0.5));
    }

    #[test]
    fn test_parse_identifiers() {
        assert_eq!(
            parse("capacity_factor").unwrap(),
            Expr::Ident("capacity_factor".into())
        );
        assert_eq!(parse("_x1").unwrap(), Expr::Ident("_x1".into()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("1 +").is_err());
        assert!(parse("(1 + 2").is_err());
        assert!(parse("a $ b").is_err());
        assert!(parse("? : 1").is_err());
        assert!(parse("a = b").is_err());
        assert!(parse("").is_err());
    }
}
