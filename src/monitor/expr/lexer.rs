//! Table-driven tokenizer for debugger expressions.
//!
//! Rules are tried in table order at every position and the first pattern
//! matching at that exact position wins, so the hex rule must stay ahead of
//! the decimal one (`0x1f` would otherwise lex as `0` followed by garbage).

use std::sync::LazyLock;

use log::trace;
use regex::Regex;

use super::config::ExprConfig;
use super::error::LexError;
use super::token::{Token, TokenKind};

const RULE_SOURCES: [(&str, TokenKind); 12] = [
    (r"0[xX][0-9A-Fa-f]+", TokenKind::HexLiteral),
    (r"\$[0-9A-Za-z_]+", TokenKind::Register),
    (r"[ \t\r\n]+", TokenKind::Whitespace),
    (r"\+", TokenKind::Plus),
    (r"-", TokenKind::Minus),
    (r"\*", TokenKind::Star),
    (r"/", TokenKind::Slash),
    (r"\(", TokenKind::LParen),
    (r"\)", TokenKind::RParen),
    (r"[0-9]+", TokenKind::Number),
    (r"==", TokenKind::Equal),
    (r"!=", TokenKind::NotEqual),
];

struct LexRule {
    pattern: Regex,
    kind: TokenKind,
}

static RULES: LazyLock<Vec<LexRule>> =
    LazyLock::new(|| compile_rules().expect("built-in lexical rules must compile"));

fn compile_rules() -> Result<Vec<LexRule>, regex::Error> {
    RULE_SOURCES
        .iter()
        .map(|(source, kind)| {
            Ok(LexRule {
                pattern: Regex::new(&format!("^(?:{source})"))?,
                kind: *kind,
            })
        })
        .collect()
}

/// Lexes the whole input, dropping whitespace.
pub fn tokenize(input: &str, config: &ExprConfig) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input, config);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        if tokens.len() == config.max_tokens() {
            return Err(LexError::TooManyTokens {
                limit: config.max_tokens(),
            });
        }
        tokens.push(token);
    }
    Ok(tokens)
}

pub struct Lexer<'src> {
    src: &'src str,
    offset: usize,
    max_token_len: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str, config: &ExprConfig) -> Self {
        Self {
            src,
            offset: 0,
            max_token_len: config.max_token_len(),
        }
    }

    /// Produces the next significant token, or `None` at end of input.
    ///
    /// Every rule only accepts ASCII, so the byte offset of a failure is also
    /// its character column.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        while self.offset < self.src.len() {
            let position = self.offset;
            let rest = &self.src[position..];
            let (index, kind, len) = RULES
                .iter()
                .enumerate()
                .find_map(|(index, rule)| {
                    rule.pattern.find(rest).map(|m| (index, rule.kind, m.end()))
                })
                .ok_or(LexError::UnrecognizedInput { position })?;
            let text = &rest[..len];
            trace!(
                "match rules[{index}] = \"{}\" at position {position} with len {len}: {text}",
                RULE_SOURCES[index].0
            );
            self.offset += len;

            if kind == TokenKind::Whitespace {
                continue;
            }
            if len > self.max_token_len {
                return Err(LexError::TokenTooLong {
                    position,
                    len,
                    limit: self.max_token_len,
                });
            }
            return Ok(Some(Token::new(kind, text, position)));
        }
        Ok(None)
    }
}
