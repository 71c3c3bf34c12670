use std::{error::Error, fmt};

use crate::soc::system::bus::BusError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnrecognizedInput { position: usize },
    TokenTooLong { position: usize, len: usize, limit: usize },
    TooManyTokens { limit: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnrecognizedInput { position } => {
                write!(f, "no match at position {position}")
            }
            LexError::TokenTooLong {
                position,
                len,
                limit,
            } => write!(
                f,
                "token at position {position} is {len} characters long (limit {limit})"
            ),
            LexError::TooManyTokens { limit } => {
                write!(f, "expression has more than {limit} tokens")
            }
        }
    }
}

impl Error for LexError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    UnmatchedParen { column: usize },
    EmptyExpression,
    StackOverflow { limit: usize },
    UnexpectedToken { column: usize, text: String },
    MissingOperand,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::UnmatchedParen { column } => {
                write!(f, "unmatched parenthesis at position {column}")
            }
            SyntaxError::EmptyExpression => write!(f, "empty expression"),
            SyntaxError::StackOverflow { limit } => {
                write!(f, "operator stack exceeded {limit} entries")
            }
            SyntaxError::UnexpectedToken { column, text } => {
                write!(f, "unexpected '{text}' at position {column}")
            }
            SyntaxError::MissingOperand => {
                write!(f, "expression ends where an operand is expected")
            }
        }
    }
}

impl Error for SyntaxError {}

#[derive(Debug)]
pub enum ResolveError {
    UnknownRegister { name: String },
    InvalidAddress { addr: u64, source: BusError },
    Overflow { literal: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnknownRegister { name } => write!(f, "unknown register '${name}'"),
            ResolveError::InvalidAddress { addr, source } => {
                write!(f, "cannot read memory at 0x{addr:X}: {source}")
            }
            ResolveError::Overflow { literal } => {
                write!(f, "literal '{literal}' does not fit in a 64-bit word")
            }
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResolveError::InvalidAddress { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum EvalError {
    DivisionByZero,
    MalformedExpression,
    StackOverflow { limit: usize },
    Resolve(ResolveError),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::MalformedExpression => {
                write!(f, "malformed postfix sequence (operand stack mismatch)")
            }
            EvalError::StackOverflow { limit } => {
                write!(f, "operand stack exceeded {limit} entries")
            }
            EvalError::Resolve(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EvalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EvalError::Resolve(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResolveError> for EvalError {
    fn from(err: ResolveError) -> Self {
        EvalError::Resolve(err)
    }
}

/// Failure of any pipeline stage.
#[derive(Debug)]
pub enum ExprError {
    Lex(LexError),
    Syntax(SyntaxError),
    Eval(EvalError),
}

impl ExprError {
    /// Column the diagnostic caret should point at, when the failure has one.
    pub fn column(&self) -> Option<usize> {
        match self {
            ExprError::Lex(LexError::UnrecognizedInput { position })
            | ExprError::Lex(LexError::TokenTooLong { position, .. }) => Some(*position),
            ExprError::Syntax(SyntaxError::UnmatchedParen { column })
            | ExprError::Syntax(SyntaxError::UnexpectedToken { column, .. }) => Some(*column),
            _ => None,
        }
    }

    /// One-line diagnostic, followed by the input and a `^` marker line when
    /// the failure points at a column. Tabs before the column are repeated in
    /// the marker line so the caret lines up on a terminal.
    pub fn render(&self, input: &str) -> String {
        let Some(column) = self.column() else {
            return self.to_string();
        };
        let pad: String = match input.get(..column) {
            Some(prefix) => prefix
                .chars()
                .map(|c| if c == '\t' { '\t' } else { ' ' })
                .collect(),
            None => " ".repeat(column),
        };
        format!("{self}\n{input}\n{pad}^")
    }
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::Lex(err) => write!(f, "lexical error: {err}"),
            ExprError::Syntax(err) => write!(f, "syntax error: {err}"),
            ExprError::Eval(err) => write!(f, "evaluation error: {err}"),
        }
    }
}

impl Error for ExprError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExprError::Lex(err) => Some(err),
            ExprError::Syntax(err) => Some(err),
            ExprError::Eval(err) => Some(err),
        }
    }
}

impl From<LexError> for ExprError {
    fn from(err: LexError) -> Self {
        ExprError::Lex(err)
    }
}

impl From<SyntaxError> for ExprError {
    fn from(err: SyntaxError) -> Self {
        ExprError::Syntax(err)
    }
}

impl From<EvalError> for ExprError {
    fn from(err: EvalError) -> Self {
        ExprError::Eval(err)
    }
}
