use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    HexLiteral,
    Register,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Equal,
    NotEqual,
    Whitespace,
}

impl TokenKind {
    /// Kinds that stand for a value rather than an operator or grouping.
    pub fn is_operand(self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::HexLiteral | TokenKind::Register
        )
    }
}

/// Classified slice of an expression. `column` is the 0-based offset of the
/// first character in the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            column,
        }
    }

    /// Register name without the leading `$`.
    pub fn register_name(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Register => self.text.strip_prefix('$'),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
