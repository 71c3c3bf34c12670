//! Expression evaluation for the debugger console.
//!
//! An expression goes through three stages, each building fresh per-call
//! state: the [`lexer`] turns text into tokens, [`postfix`] reorders them
//! into reverse Polish notation, and [`eval`] runs the operand-stack machine,
//! resolving registers and memory through a [`Resolver`].
//!
//! ```
//! use nanemu_sdb::monitor::expr::{DetachedResolver, evaluate};
//!
//! assert_eq!(evaluate("(2 + 3) * 4", &DetachedResolver).unwrap(), 20);
//! assert_eq!(evaluate("0x10 + 1", &DetachedResolver).unwrap(), 17);
//! ```

pub mod config;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod postfix;
pub mod resolver;
pub mod stack;
pub mod token;

pub use config::{ConfigError, ExprConfig, ExprConfigBuilder};
pub use error::{EvalError, ExprError, LexError, ResolveError, SyntaxError};
pub use postfix::{BinaryOp, Operator, Postfix, PostfixItem, UnaryOp};
pub use resolver::{DetachedResolver, MachineResolver, Resolver};
pub use token::{Token, TokenKind};

/// Stateless front end over the pipeline. Holds only its limits, so one
/// instance can serve any number of (concurrent) evaluations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    config: ExprConfig,
}

impl Evaluator {
    pub fn new(config: ExprConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExprConfig {
        &self.config
    }

    /// Lexes and converts `expr` without evaluating it.
    pub fn compile(&self, expr: &str) -> Result<Postfix, ExprError> {
        let tokens = lexer::tokenize(expr, &self.config)?;
        Ok(postfix::to_postfix(tokens, &self.config)?)
    }

    pub fn evaluate<R: Resolver + ?Sized>(
        &self,
        expr: &str,
        resolver: &R,
    ) -> Result<i64, ExprError> {
        let compiled = self.compile(expr)?;
        self.evaluate_compiled(&compiled, resolver)
    }

    pub fn evaluate_compiled<R: Resolver + ?Sized>(
        &self,
        compiled: &Postfix,
        resolver: &R,
    ) -> Result<i64, ExprError> {
        Ok(eval::evaluate_postfix(compiled, resolver, &self.config)?)
    }
}

/// Evaluates `expr` with the default limits.
pub fn evaluate<R: Resolver + ?Sized>(expr: &str, resolver: &R) -> Result<i64, ExprError> {
    Evaluator::default().evaluate(expr, resolver)
}
