//! Recursive-descent parser turning a token stream into an [`Expression`]
//! tree.
//!
//! Precedence, weakest to strongest: `or`, `and`, `not`, primary.
//! Associativity of both binary logicals is left. Parentheses always
//! override precedence via `primary = '(' expr ')'`, so either side of an
//! `and`/`or` may itself be an arbitrarily nested sub-expression.

use crate::ast::{ComparisonOp, Expression, LogicalOp, StringFn};
use crate::error::FilterError;
use crate::token::{Token, TokenKind};
use crate::tokenizer::tokenize;

/// Parses a full filter expression string into an [`Expression`] tree.
pub fn parse(input: &str) -> Result<Expression, FilterError> {
    let tokens = tokenize(input);
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
    };
    let expr = parser.parse_expr()?;
    parser.expect_end()?;
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_end(&self) -> Result<(), FilterError> {
        let tok = self.current();
        if tok.kind == TokenKind::End {
            Ok(())
        } else {
            Err(FilterError::invalid_syntax(tok.lexeme.as_str(), tok.position))
        }
    }

    fn error_here(&self) -> FilterError {
        let tok = self.current();
        FilterError::invalid_syntax(tok.lexeme.as_str(), tok.position)
    }

    /// `expr = orExpr`
    fn parse_expr(&mut self) -> Result<Expression, FilterError> {
        self.parse_or()
    }

    /// `orExpr = andExpr ( 'or' andExpr )*`
    fn parse_or(&mut self) -> Result<Expression, FilterError> {
        let mut left = self.parse_and()?;
        while self.current().kind == TokenKind::Logical
            && self.current().lexeme_lower() == "or"
        {
            self.advance();
            let right = self.parse_and()?;
            left = Expression::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// `andExpr = unary ( 'and' unary )*`
    fn parse_and(&mut self) -> Result<Expression, FilterError> {
        let mut left = self.parse_unary()?;
        while self.current().kind == TokenKind::Logical
            && self.current().lexeme_lower() == "and"
        {
            self.advance();
            let right = self.parse_unary()?;
            left = Expression::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// `unary = 'not' primary | primary`
    fn parse_unary(&mut self) -> Result<Expression, FilterError> {
        if self.current().kind == TokenKind::Logical && self.current().lexeme_lower() == "not" {
            self.advance();
            let inner = self.parse_primary()?;
            return Ok(Expression::Not {
                inner: Box::new(inner),
            });
        }
        self.parse_primary()
    }

    /// `primary = '(' expr ')' | functionCall | comparison`
    fn parse_primary(&mut self) -> Result<Expression, FilterError> {
        if self.current().kind == TokenKind::LParen {
            self.advance();
            let inner = self.parse_expr()?;
            if self.current().kind != TokenKind::RParen {
                return Err(self.error_here());
            }
            self.advance();
            return Ok(inner);
        }

        // Dual infix/prefix recognition: a word token (Operator or Property
        // spelling) followed directly by `(` is a function call regardless
        // of how the tokenizer classified it.
        if matches!(self.current().kind, TokenKind::Operator | TokenKind::Property)
            && self.peek_kind(1) == Some(TokenKind::LParen)
        {
            return self.parse_function_call();
        }

        self.parse_comparison()
    }

    fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    /// `functionCall = fname '(' arg ',' arg ')'`, exactly two arguments:
    /// the property path and the literal.
    fn parse_function_call(&mut self) -> Result<Expression, FilterError> {
        let name_tok = self.advance();
        let func = StringFn::from_lexeme(&name_tok.lexeme_lower())
            .ok_or_else(|| FilterError::invalid_syntax(name_tok.lexeme.as_str(), name_tok.position))?;

        // current is '('
        self.advance();

        let mut args = Vec::new();
        loop {
            let arg_tok = self.current();
            if !matches!(arg_tok.kind, TokenKind::Value | TokenKind::Property) {
                return Err(self.error_here());
            }
            args.push(self.advance().lexeme);

            match self.current().kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RParen => {
                    self.advance();
                    break;
                }
                _ => return Err(self.error_here()),
            }
        }

        if args.len() != 2 {
            return Err(FilterError::invalid_syntax(name_tok.lexeme.as_str(), name_tok.position));
        }

        Ok(Expression::Function {
            func,
            arg_lexemes: args,
        })
    }

    /// `comparison = property op valueOrProperty`
    fn parse_comparison(&mut self) -> Result<Expression, FilterError> {
        let prop_tok = self.current();
        if prop_tok.kind != TokenKind::Property {
            return Err(self.error_here());
        }
        let path = self.advance().lexeme;

        let op_tok = self.current();
        if op_tok.kind != TokenKind::Operator {
            return Err(self.error_here());
        }
        let op_lower = op_tok.lexeme_lower();
        let op = ComparisonOp::from_lexeme(&op_lower)
            .ok_or_else(|| FilterError::invalid_syntax(op_tok.lexeme.as_str(), op_tok.position))?;
        self.advance();

        let value_tok = self.current();
        if !matches!(value_tok.kind, TokenKind::Value | TokenKind::Property) {
            return Err(self.error_here());
        }
        let value_lexeme = self.advance().lexeme;

        Ok(Expression::Comparison {
            path,
            op,
            value_lexeme,
        })
    }
}
