//! Limits and access widths applied to a single evaluation.

use std::fmt;

pub const DEFAULT_MAX_TOKEN_LEN: usize = 31;
pub const DEFAULT_MAX_TOKENS: usize = 100;
pub const DEFAULT_MAX_STACK_DEPTH: usize = 100;
/// Dereferences read one 32-bit word unless configured otherwise.
pub const DEFAULT_DEREF_WIDTH: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprConfig {
    max_token_len: usize,
    max_tokens: usize,
    max_stack_depth: usize,
    deref_width: u8,
}

impl Default for ExprConfig {
    fn default() -> Self {
        Self {
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
            deref_width: DEFAULT_DEREF_WIDTH,
        }
    }
}

impl ExprConfig {
    pub fn builder() -> ExprConfigBuilder {
        ExprConfigBuilder::default()
    }

    pub fn max_token_len(&self) -> usize {
        self.max_token_len
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn max_stack_depth(&self) -> usize {
        self.max_stack_depth
    }

    pub fn deref_width(&self) -> u8 {
        self.deref_width
    }
}

#[derive(Debug, Default)]
pub struct ExprConfigBuilder {
    config: ExprConfig,
}

impl ExprConfigBuilder {
    pub fn max_token_len(mut self, len: usize) -> Self {
        self.config.max_token_len = len;
        self
    }

    pub fn max_tokens(mut self, count: usize) -> Self {
        self.config.max_tokens = count;
        self
    }

    pub fn max_stack_depth(mut self, depth: usize) -> Self {
        self.config.max_stack_depth = depth;
        self
    }

    pub fn deref_width(mut self, bytes: u8) -> Self {
        self.config.deref_width = bytes;
        self
    }

    pub fn build(self) -> Result<ExprConfig, ConfigError> {
        let config = self.config;
        if config.max_token_len == 0 {
            return Err(ConfigError::ZeroLimit("max_token_len"));
        }
        if config.max_tokens == 0 {
            return Err(ConfigError::ZeroLimit("max_tokens"));
        }
        if config.max_stack_depth == 0 {
            return Err(ConfigError::ZeroLimit("max_stack_depth"));
        }
        if !matches!(config.deref_width, 1 | 2 | 4 | 8) {
            return Err(ConfigError::DerefWidth(config.deref_width));
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroLimit(&'static str),
    DerefWidth(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroLimit(field) => write!(f, "'{field}' must be greater than zero"),
            ConfigError::DerefWidth(width) => {
                write!(f, "dereference width must be 1, 2, 4 or 8 bytes (got {width})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
