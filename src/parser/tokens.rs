//! Token definitions shared by the lexer and the Pratt parser

use crate::error::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    /// Binding power for Pratt parsing
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 10,
            Operator::Mul | Operator::Div => 20,
            Operator::Pow => 30,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Pow => '^',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Identifier(String),
    Operator(Operator),
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// Token with no usable location (synthesized by implicit multiplication)
    pub fn synthetic(kind: TokenKind) -> Self {
        Token {
            kind,
            span: Span::default(),
        }
    }

    /// Human-readable token description for error messages
    pub fn to_user_string(&self) -> String {
        match &self.kind {
            TokenKind::Number(n) => format!("{}", n),
            TokenKind::Identifier(s) => s.clone(),
            TokenKind::Operator(op) => op.symbol().to_string(),
            TokenKind::LeftParen => "(".to_string(),
            TokenKind::RightParen => ")".to_string(),
        }
    }
}
