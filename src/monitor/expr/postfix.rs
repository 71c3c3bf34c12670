//! Infix to postfix conversion (shunting-yard).
//!
//! Besides precedence, the converter tracks whether the next token has to be
//! an operand. That decides whether `-`/`*` are prefix operators and turns
//! adjacent operands or dangling operators into syntax errors before anything
//! reaches the evaluator.

use std::fmt;

use log::debug;

use super::config::ExprConfig;
use super::error::SyntaxError;
use super::stack::{BoundedStack, StackOverflow};
use super::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
}

impl BinaryOp {
    fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Equal => Some(BinaryOp::Eq),
            TokenKind::NotEqual => Some(BinaryOp::Ne),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Deref,
}

impl UnaryOp {
    fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Star => Some(UnaryOp::Deref),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Deref => "deref",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Binary(BinaryOp),
    Unary(UnaryOp),
}

impl Operator {
    /// Comparison binds loosest, prefix operators tightest.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Binary(BinaryOp::Eq | BinaryOp::Ne) => 0,
            Operator::Binary(BinaryOp::Add | BinaryOp::Sub) => 1,
            Operator::Binary(BinaryOp::Mul | BinaryOp::Div) => 2,
            Operator::Unary(_) => 3,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Binary(op) => f.write_str(op.symbol()),
            Operator::Unary(op) => f.write_str(op.symbol()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostfixItem {
    Operand(Token),
    Operator(Operator),
}

/// Expression in reverse Polish order, ready for the operand-stack machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Postfix {
    items: Vec<PostfixItem>,
}

impl Postfix {
    #[cfg(test)]
    pub(crate) fn from_items(items: Vec<PostfixItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[PostfixItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, item) in self.items.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            match item {
                PostfixItem::Operand(token) => write!(f, "{token}")?,
                PostfixItem::Operator(op) => write!(f, "{op}")?,
            }
        }
        Ok(())
    }
}

enum StackEntry {
    Open { column: usize },
    Op(Operator),
}

pub fn to_postfix(
    tokens: impl IntoIterator<Item = Token>,
    config: &ExprConfig,
) -> Result<Postfix, SyntaxError> {
    let mut output = Vec::new();
    let mut stack = BoundedStack::new(config.max_stack_depth());
    let mut expect_operand = true;
    let mut seen_any = false;

    for token in tokens {
        seen_any = true;
        match token.kind {
            TokenKind::Whitespace => continue,
            kind if kind.is_operand() => {
                if !expect_operand {
                    return Err(unexpected(token));
                }
                output.push(PostfixItem::Operand(token));
                expect_operand = false;
            }
            TokenKind::LParen => {
                if !expect_operand {
                    return Err(unexpected(token));
                }
                stack
                    .push(StackEntry::Open {
                        column: token.column,
                    })
                    .map_err(overflow)?;
            }
            TokenKind::RParen => {
                if expect_operand {
                    return Err(if output.is_empty() {
                        SyntaxError::EmptyExpression
                    } else {
                        unexpected(token)
                    });
                }
                loop {
                    match stack.pop() {
                        Some(StackEntry::Open { .. }) => break,
                        Some(StackEntry::Op(op)) => output.push(PostfixItem::Operator(op)),
                        None => {
                            return Err(SyntaxError::UnmatchedParen {
                                column: token.column,
                            });
                        }
                    }
                }
            }
            kind if expect_operand => match UnaryOp::from_kind(kind) {
                Some(op) => stack
                    .push(StackEntry::Op(Operator::Unary(op)))
                    .map_err(overflow)?,
                None => return Err(unexpected(token)),
            },
            kind => {
                let Some(op) = BinaryOp::from_kind(kind).map(Operator::Binary) else {
                    return Err(unexpected(token));
                };
                while let Some(StackEntry::Op(top)) = stack.peek() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push(PostfixItem::Operator(*top));
                    stack.pop();
                }
                stack.push(StackEntry::Op(op)).map_err(overflow)?;
                expect_operand = true;
            }
        }
    }

    if !seen_any {
        return Err(SyntaxError::EmptyExpression);
    }
    let unclosed = stack.iter().rev().find_map(|entry| match entry {
        StackEntry::Open { column } => Some(*column),
        StackEntry::Op(_) => None,
    });
    if let Some(column) = unclosed {
        return Err(SyntaxError::UnmatchedParen { column });
    }
    if expect_operand {
        return Err(SyntaxError::MissingOperand);
    }
    while let Some(StackEntry::Op(op)) = stack.pop() {
        output.push(PostfixItem::Operator(op));
    }
    if output.is_empty() {
        return Err(SyntaxError::EmptyExpression);
    }

    let postfix = Postfix { items: output };
    debug!("postfix: {postfix}");
    Ok(postfix)
}

fn unexpected(token: Token) -> SyntaxError {
    SyntaxError::UnexpectedToken {
        column: token.column,
        text: token.text,
    }
}

fn overflow(err: StackOverflow) -> SyntaxError {
    SyntaxError::StackOverflow { limit: err.limit }
}
