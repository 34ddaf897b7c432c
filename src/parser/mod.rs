//! Parser module - converts polynomial strings to AST
//!
//! Pipeline: sanitize -> validate -> lex -> implicit_mul -> parse

mod implicit_mul;
mod lexer;
mod pratt;
mod tokens;

use crate::ast::Expr;
use crate::error::QuizError;

/// Normalize raw polynomial text into a form the lexer accepts.
///
/// Strips whitespace and inserts an explicit `*` between an adjacent digit
/// and a following letter, and between a letter and a following digit, so
/// notation like `3x` or `x3` lexes as a product. `^` is already this
/// parser's exponent operator and passes through unchanged.
///
/// Pure and total; the output may still be semantically invalid, which is
/// caught by `parse`. Idempotent: sanitizing sanitized text is a no-op.
pub fn sanitize(text: &str) -> String {
    let stripped: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();

    let mut out = String::with_capacity(stripped.len() + stripped.len() / 2);
    for (i, &c) in stripped.iter().enumerate() {
        out.push(c);
        if let Some(&next) = stripped.get(i + 1) {
            let digit_then_letter = c.is_ascii_digit() && next.is_ascii_alphabetic();
            let letter_then_digit = c.is_ascii_alphabetic() && next.is_ascii_digit();
            if digit_then_letter || letter_then_digit {
                out.push('*');
            }
        }
    }
    out
}

/// Parse sanitized polynomial text into an expression AST.
///
/// # Errors
/// Returns a `MalformedPolynomial` error if:
/// - The input is empty
/// - Parentheses are unbalanced
/// - The input contains invalid tokens or consecutive operators
/// - The expression tree exceeds [`crate::DEFAULT_MAX_NODES`] nodes
pub fn parse(input: &str) -> Result<Expr, QuizError> {
    if input.trim().is_empty() {
        return Err(QuizError::malformed("expression vide"));
    }

    lexer::check_parentheses(input)?;
    let tokens = lexer::lex(input)?;
    let tokens_with_mul = implicit_mul::insert_implicit_multiplication(tokens);
    let expr = pratt::parse_expression(&tokens_with_mul)?;
    if expr.node_count() > crate::DEFAULT_MAX_NODES {
        return Err(QuizError::malformed(
            "l'expression dépasse la taille maximale",
        ));
    }
    Ok(expr)
}

/// Sanitize then parse raw polynomial text
pub fn parse_raw(text: &str) -> Result<Expr, QuizError> {
    parse(&sanitize(text))
}
