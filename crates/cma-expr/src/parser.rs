// parser.rs — Recursive-descent parser for constraint expressions.
//
// Precedence, loosest to tightest binding:
//
//   implies        (right-associative)
//   or             (left-associative)
//   and            (left-associative)
//   not            (prefix)
//   == != < <= > >= in   (single, non-associative comparison)
//   literals, paths, ( ... )
//
// So `not a == b` parses as `not (a == b)`, and
// `x implies y implies z` as `x implies (y implies z)`.

use crate::ast::{BinaryOp, Expr};
use crate::error::ExprError;
use crate::lexer::{tokenize, Spanned, Token};
use crate::value::Value;

/// Parse a constraint expression into its AST.
pub fn parse(src: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        src_len: src.len(),
    };
    let expr = parser.implication()?;
    if let Some(spanned) = parser.peek() {
        return Err(ExprError::parse(
            spanned.offset,
            format!("unexpected trailing token '{}'", spanned.token),
        ));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    src_len: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Spanned> {
        let spanned = self.tokens.get(self.pos);
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek().map(|s| &s.token) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn offset(&self) -> usize {
        self.peek().map_or(self.src_len, |s| s.offset)
    }

    fn implication(&mut self) -> Result<Expr, ExprError> {
        let lhs = self.disjunction()?;
        if self.eat(&Token::Implies) {
            let rhs = self.implication()?; // right-assoc
            return Ok(Expr::Binary {
                op: BinaryOp::Implies,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }
        Ok(lhs)
    }

    fn disjunction(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.conjunction()?;
        while self.eat(&Token::Or) {
            let rhs = self.conjunction()?;
            lhs = Expr::Binary {
                op: BinaryOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn conjunction(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.negation()?;
        while self.eat(&Token::And) {
            let rhs = self.negation()?;
            lhs = Expr::Binary {
                op: BinaryOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn negation(&mut self) -> Result<Expr, ExprError> {
        if self.eat(&Token::Not) {
            let operand = self.negation()?;
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, ExprError> {
        let lhs = self.primary()?;
        let op = match self.peek().map(|s| &s.token) {
            Some(Token::Eq) => BinaryOp::Eq,
            Some(Token::Ne) => BinaryOp::Ne,
            Some(Token::Lt) => BinaryOp::Lt,
            Some(Token::Le) => BinaryOp::Le,
            Some(Token::Gt) => BinaryOp::Gt,
            Some(Token::Ge) => BinaryOp::Ge,
            Some(Token::In) => BinaryOp::In,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.primary()?;
        Ok(Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        let offset = self.offset();
        let spanned = self
            .advance()
            .ok_or_else(|| ExprError::parse(offset, "unexpected end of expression"))?;
        match &spanned.token {
            Token::True => Ok(Expr::Literal(Value::Bool(true))),
            Token::False => Ok(Expr::Literal(Value::Bool(false))),
            Token::Number(n) => Ok(Expr::Literal(Value::Number(*n))),
            Token::Str(s) => Ok(Expr::Literal(Value::Str(s.clone()))),
            Token::Path(segments) => Ok(Expr::Path(segments.clone())),
            Token::LParen => {
                let inner = self.implication()?;
                if !self.eat(&Token::RParen) {
                    return Err(ExprError::parse(self.offset(), "expected ')'"));
                }
                Ok(inner)
            }
            other => Err(ExprError::parse(
                spanned.offset,
                format!("unexpected token '{}'", other),
            )),
        }
    }
}
