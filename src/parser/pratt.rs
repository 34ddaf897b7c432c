use crate::ast::{Expr, ExprKind};
use crate::error::QuizError;
use crate::parser::tokens::{Operator, Token, TokenKind};

/// Parse tokens into an AST using Pratt parsing algorithm
pub(crate) fn parse_expression(tokens: &[Token]) -> Result<Expr, QuizError> {
    if tokens.is_empty() {
        return Err(QuizError::malformed("expression vide"));
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr(0)?;

    // Trailing garbage such as "x^2 3" (after implicit mul this cannot
    // happen, but ")" leftovers can)
    if let Some(token) = parser.current() {
        return Err(QuizError::malformed_at(
            format!("symbole inattendu '{}'", token.to_user_string()),
            token.span,
        ));
    }

    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// A leading sign is only legal at the very start of the input or
    /// directly after an opening parenthesis. This makes consecutive
    /// operators such as `x^2 + + 3` a hard parse error instead of a
    /// silently-accepted unary plus.
    fn sign_allowed_here(&self) -> bool {
        if self.pos == 0 {
            return true;
        }
        matches!(
            self.tokens.get(self.pos - 1).map(|t| &t.kind),
            Some(TokenKind::LeftParen)
        )
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, QuizError> {
        // Parse left side (prefix)
        let mut left = self.parse_prefix()?;

        // Parse operators and right side (infix)
        while let Some(token) = self.current() {
            let precedence = match &token.kind {
                TokenKind::Operator(op) => op.precedence(),
                _ => break,
            };

            if precedence < min_precedence {
                break;
            }

            left = self.parse_infix(left, precedence)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expr, QuizError> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or_else(|| QuizError::malformed("fin d'expression inattendue"))?;

        match &token.kind {
            TokenKind::Number(n) => {
                let value = *n;
                self.advance();
                Ok(Expr::number(value))
            }

            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(Expr::symbol(name))
            }

            // Unary minus: precedence between Mul (20) and Pow (30)
            // so that -x^2 parses as -(x^2), not (-x)^2
            TokenKind::Operator(Operator::Sub) => {
                if !self.sign_allowed_here() {
                    return Err(QuizError::malformed_at(
                        "opérateurs consécutifs",
                        token.span,
                    ));
                }
                self.advance();
                let expr = self.parse_expr(25)?;
                Ok(Expr::mul_expr(Expr::number(-1.0), expr))
            }

            // Unary plus: same restriction, just returns the expression
            TokenKind::Operator(Operator::Add) => {
                if !self.sign_allowed_here() {
                    return Err(QuizError::malformed_at(
                        "opérateurs consécutifs",
                        token.span,
                    ));
                }
                self.advance();
                self.parse_expr(25)
            }

            TokenKind::LeftParen => {
                self.advance(); // consume (
                let expr = self.parse_expr(0)?;

                match self.current().map(|t| &t.kind) {
                    Some(TokenKind::RightParen) => {
                        self.advance(); // consume )
                        Ok(expr)
                    }
                    _ => Err(QuizError::malformed("parenthèse fermante attendue")),
                }
            }

            _ => Err(QuizError::malformed_at(
                format!("symbole invalide '{}'", token.to_user_string()),
                token.span,
            )),
        }
    }

    fn parse_infix(&mut self, left: Expr, precedence: u8) -> Result<Expr, QuizError> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or_else(|| QuizError::malformed("fin d'expression inattendue"))?;

        match &token.kind {
            TokenKind::Operator(op) => {
                let op = *op;
                self.advance();

                // Right associative for power, left for others
                let next_precedence = if matches!(op, Operator::Pow) {
                    precedence
                } else {
                    precedence + 1
                };

                let right = self.parse_expr(next_precedence)?;

                Ok(match op {
                    Operator::Add => Expr::add_expr(left, right),
                    Operator::Sub => Expr::sub_expr(left, right),
                    Operator::Mul => Expr::mul_expr(left, right),
                    Operator::Div => Expr::div_expr(left, right),
                    Operator::Pow => Expr::pow(left, right),
                })
            }

            _ => Err(QuizError::malformed_at(
                format!("symbole invalide '{}'", token.to_user_string()),
                token.span,
            )),
        }
    }
}
