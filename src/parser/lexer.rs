//! Lexer for sanitized polynomial text

use crate::error::{QuizError, Span};
use crate::parser::tokens::{Operator, Token, TokenKind};

/// Check that parentheses are balanced and properly nested.
///
/// Unbalanced input is rejected outright rather than auto-repaired, so a
/// typo never silently changes the polynomial being solved.
pub fn check_parentheses(input: &str) -> Result<(), QuizError> {
    let mut depth: i32 = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(QuizError::malformed_at(
                        "parenthèse fermante sans ouvrante",
                        Span::at(i),
                    ));
                }
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(QuizError::malformed(format!(
            "{} parenthèse(s) non fermée(s)",
            depth
        )));
    }
    Ok(())
}

/// Tokenize sanitized input into numbers, identifiers, operators and parens
pub fn lex(input: &str) -> Result<Vec<Token>, QuizError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::with_capacity(input.len() / 2 + 1);
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;

        match c {
            '0'..='9' | '.' => {
                let start = i;
                let mut seen_dot = false;
                while i < bytes.len() {
                    match bytes[i] as char {
                        '0'..='9' => i += 1,
                        '.' => {
                            if seen_dot {
                                return Err(QuizError::malformed_at(
                                    format!("nombre invalide '{}'", &input[start..=i]),
                                    Span::new(start, i + 1),
                                ));
                            }
                            seen_dot = true;
                            i += 1;
                        }
                        _ => break,
                    }
                }
                let text = &input[start..i];
                let value: f64 = text.parse().map_err(|_| {
                    QuizError::malformed_at(
                        format!("nombre invalide '{}'", text),
                        Span::new(start, i),
                    )
                })?;
                tokens.push(Token::new(TokenKind::Number(value), Span::new(start, i)));
            }

            'a'..='z' | 'A'..='Z' => {
                let start = i;
                while i < bytes.len() && (bytes[i] as char).is_ascii_alphabetic() {
                    i += 1;
                }
                tokens.push(Token::new(
                    TokenKind::Identifier(input[start..i].to_string()),
                    Span::new(start, i),
                ));
            }

            '+' => {
                tokens.push(Token::new(TokenKind::Operator(Operator::Add), Span::at(i)));
                i += 1;
            }
            '-' => {
                tokens.push(Token::new(TokenKind::Operator(Operator::Sub), Span::at(i)));
                i += 1;
            }
            '*' => {
                tokens.push(Token::new(TokenKind::Operator(Operator::Mul), Span::at(i)));
                i += 1;
            }
            '/' => {
                tokens.push(Token::new(TokenKind::Operator(Operator::Div), Span::at(i)));
                i += 1;
            }
            '^' => {
                tokens.push(Token::new(TokenKind::Operator(Operator::Pow), Span::at(i)));
                i += 1;
            }
            '(' => {
                tokens.push(Token::new(TokenKind::LeftParen, Span::at(i)));
                i += 1;
            }
            ')' => {
                tokens.push(Token::new(TokenKind::RightParen, Span::at(i)));
                i += 1;
            }

            _ => {
                return Err(QuizError::malformed_at(
                    format!("caractère invalide '{}'", c),
                    Span::at(i),
                ));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_simple_polynomial() {
        let tokens = lex("x^2+3").unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].kind, TokenKind::Identifier("x".to_string()));
        assert_eq!(tokens[1].kind, TokenKind::Operator(Operator::Pow));
        assert_eq!(tokens[2].kind, TokenKind::Number(2.0));
    }

    #[test]
    fn test_lex_decimal() {
        let tokens = lex("2.5*x").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number(2.5));
    }

    #[test]
    fn test_lex_double_dot_rejected() {
        assert!(lex("2..5").is_err());
    }

    #[test]
    fn test_lex_invalid_character() {
        let err = lex("x^2 + 3").unwrap_err();
        // Whitespace is stripped by sanitize; raw spaces are invalid here
        assert_eq!(err.kind(), "MalformedPolynomialError");
    }

    #[test]
    fn test_check_parentheses() {
        assert!(check_parentheses("(x+1)*(x-1)").is_ok());
        assert!(check_parentheses("(x+1").is_err());
        assert!(check_parentheses("x+1)").is_err());
    }
}
