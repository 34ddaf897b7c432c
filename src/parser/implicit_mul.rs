//! Implicit multiplication insertion for natural notation
//!
//! Inserts `*` operators between tokens where multiplication is implied,
//! e.g. `2x` → `2 * x` or `3(x+1)` → `3 * (x+1)`.

use crate::parser::tokens::{Operator, Token, TokenKind};

/// Check if implicit multiplication should be inserted between two tokens
fn should_insert_mul(current: &Token, next: &Token) -> bool {
    matches!(
        (&current.kind, &next.kind),
        // Number * Identifier: 2x
        // Identifier * Identifier: xy (rejected later as two symbols)
        // ) * Identifier: )x
        (
            TokenKind::Number(_) | TokenKind::Identifier(_) | TokenKind::RightParen,
            TokenKind::Identifier(_)
        )
        // Number * (: 2(x)
        // ) * (: )(
        // Identifier * (: x(y) — there are no function calls in this grammar
        | (
            TokenKind::Number(_) | TokenKind::Identifier(_) | TokenKind::RightParen,
            TokenKind::LeftParen
        )
        // Identifier * Number: x2
        // ) * Number: )2
        | (
            TokenKind::Identifier(_) | TokenKind::RightParen,
            TokenKind::Number(_)
        )
    )
}

/// Insert implicit multiplication operators between appropriate tokens
pub fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    if tokens.is_empty() {
        return tokens;
    }

    // Check if any insertion is needed before allocating a new vector
    let needs_insertion = tokens.windows(2).any(|w| should_insert_mul(&w[0], &w[1]));
    if !needs_insertion {
        return tokens;
    }

    let mut result = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();

    while let Some(current) = it.next() {
        let needs_mul = it
            .peek()
            .is_some_and(|next| should_insert_mul(&current, next));

        result.push(current);
        if needs_mul {
            result.push(Token::synthetic(TokenKind::Operator(Operator::Mul)));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;

    fn tok(kind: TokenKind) -> Token {
        Token::new(kind, Span::default())
    }

    #[test]
    fn test_number_identifier() {
        let tokens = vec![
            tok(TokenKind::Number(2.0)),
            tok(TokenKind::Identifier("x".into())),
        ];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(
            result[1].kind,
            TokenKind::Operator(Operator::Mul)
        ));
    }

    #[test]
    fn test_identifier_number() {
        let tokens = vec![
            tok(TokenKind::Identifier("x".into())),
            tok(TokenKind::Number(3.0)),
        ];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(
            result[1].kind,
            TokenKind::Operator(Operator::Mul)
        ));
    }

    #[test]
    fn test_paren_identifier() {
        let tokens = vec![
            tok(TokenKind::RightParen),
            tok(TokenKind::Identifier("x".into())),
        ];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(
            result[1].kind,
            TokenKind::Operator(Operator::Mul)
        ));
    }

    #[test]
    fn test_number_paren() {
        let tokens = vec![tok(TokenKind::Number(3.0)), tok(TokenKind::LeftParen)];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_explicit_mul_untouched() {
        let tokens = vec![
            tok(TokenKind::Number(2.0)),
            tok(TokenKind::Operator(Operator::Mul)),
            tok(TokenKind::Identifier("x".into())),
        ];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
    }
}
