//! Operand-stack machine over a [`Postfix`] sequence.

use super::config::ExprConfig;
use super::error::EvalError;
use super::postfix::{BinaryOp, Operator, Postfix, PostfixItem, UnaryOp};
use super::resolver::{Resolver, dereference, resolve_operand};
use super::stack::BoundedStack;

/// Evaluates `postfix`, resolving operands lazily as they are reached.
///
/// Arithmetic wraps at 64 bits like the machine word it models. Division
/// truncates toward zero.
pub fn evaluate_postfix<R: Resolver + ?Sized>(
    postfix: &Postfix,
    resolver: &R,
    config: &ExprConfig,
) -> Result<i64, EvalError> {
    let mut operands = BoundedStack::new(config.max_stack_depth());

    for item in postfix.items() {
        let value = match item {
            PostfixItem::Operand(token) if token.kind.is_operand() => {
                resolve_operand(token, resolver)?
            }
            PostfixItem::Operand(_) => return Err(EvalError::MalformedExpression),
            PostfixItem::Operator(Operator::Unary(op)) => {
                let operand = operands.pop().ok_or(EvalError::MalformedExpression)?;
                apply_unary(*op, operand, resolver, config)?
            }
            PostfixItem::Operator(Operator::Binary(op)) => {
                // Right operand sits on top.
                let right = operands.pop().ok_or(EvalError::MalformedExpression)?;
                let left = operands.pop().ok_or(EvalError::MalformedExpression)?;
                apply_binary(*op, left, right)?
            }
        };
        operands
            .push(value)
            .map_err(|err| EvalError::StackOverflow { limit: err.limit })?;
    }

    match (operands.pop(), operands.is_empty()) {
        (Some(value), true) => Ok(value),
        _ => Err(EvalError::MalformedExpression),
    }
}

fn apply_unary<R: Resolver + ?Sized>(
    op: UnaryOp,
    operand: i64,
    resolver: &R,
    config: &ExprConfig,
) -> Result<i64, EvalError> {
    match op {
        UnaryOp::Neg => Ok(operand.wrapping_neg()),
        UnaryOp::Deref => Ok(dereference(operand, config.deref_width(), resolver)?),
    }
}

fn apply_binary(op: BinaryOp, left: i64, right: i64) -> Result<i64, EvalError> {
    let value = match op {
        BinaryOp::Add => left.wrapping_add(right),
        BinaryOp::Sub => left.wrapping_sub(right),
        BinaryOp::Mul => left.wrapping_mul(right),
        BinaryOp::Div => {
            if right == 0 {
                return Err(EvalError::DivisionByZero);
            }
            left.wrapping_div(right)
        }
        BinaryOp::Eq => (left == right) as i64,
        BinaryOp::Ne => (left != right) as i64,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::expr::error::ResolveError;
    use crate::monitor::expr::lexer::tokenize;
    use crate::monitor::expr::postfix::to_postfix;
    use crate::monitor::expr::resolver::DetachedResolver;
    use crate::soc::system::bus::BusError;

    struct FixedRegisters;

    impl Resolver for FixedRegisters {
        fn register(&self, name: &str) -> Option<i64> {
            match name {
                "a0" => Some(7),
                "sp" => Some(0x100),
                _ => None,
            }
        }

        fn read_memory(&self, address: u64, width: u8) -> Result<i64, BusError> {
            match (address, width) {
                (0x100, 4) => Ok(42),
                _ => Err(BusError::NotMapped { address }),
            }
        }
    }

    fn eval_with<R: Resolver>(src: &str, resolver: &R) -> Result<i64, EvalError> {
        let config = ExprConfig::default();
        let postfix = to_postfix(tokenize(src, &config).expect("tokenize"), &config)
            .expect("convert");
        evaluate_postfix(&postfix, resolver, &config)
    }

    fn eval(src: &str) -> i64 {
        eval_with(src, &DetachedResolver).expect("evaluate")
    }

    #[test]
    fn arithmetic_respects_precedence_and_order() {
        assert_eq!(eval("2+3*4"), 14);
        assert_eq!(eval("(2+3)*4"), 20);
        assert_eq!(eval("10-3-2"), 5);
        assert_eq!(eval("100/5/2"), 10);
        assert_eq!(eval("7/2"), 3);
        assert_eq!(eval("-7/2"), -3, "division truncates toward zero");
    }

    #[test]
    fn comparisons_yield_one_or_zero() {
        assert_eq!(eval("1+1==2"), 1);
        assert_eq!(eval("1+1!=2"), 0);
        assert_eq!(eval("3==4"), 0);
    }

    #[test]
    fn words_wrap_instead_of_panicking() {
        assert_eq!(eval("0x7FFFFFFFFFFFFFFF+1"), i64::MIN);
        assert_eq!(eval("0x8000000000000000/-1"), i64::MIN);
        assert_eq!(eval("-0x8000000000000000"), i64::MIN);
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(matches!(
            eval_with("5/0", &DetachedResolver),
            Err(EvalError::DivisionByZero)
        ));
        assert!(matches!(
            eval_with("5/(2-2)", &DetachedResolver),
            Err(EvalError::DivisionByZero)
        ));
    }

    #[test]
    fn registers_and_dereferences_resolve_lazily() {
        assert_eq!(eval_with("$a0*2", &FixedRegisters).expect("a0"), 14);
        assert_eq!(eval_with("*$sp+1", &FixedRegisters).expect("deref"), 43);
        assert_eq!(eval_with("*($sp-0x80+0x80)", &FixedRegisters).expect("deref"), 42);
        assert!(matches!(
            eval_with("$a0 + $zz", &FixedRegisters),
            Err(EvalError::Resolve(ResolveError::UnknownRegister { name })) if name == "zz"
        ));
        assert!(matches!(
            eval_with("*($sp+4)", &FixedRegisters),
            Err(EvalError::Resolve(ResolveError::InvalidAddress { addr: 0x104, .. }))
        ));
    }

    #[test]
    fn unresolved_operand_short_circuits_division_check() {
        assert!(matches!(
            eval_with("$zz/0", &FixedRegisters),
            Err(EvalError::Resolve(ResolveError::UnknownRegister { .. }))
        ));
    }

    #[test]
    fn inconsistent_sequences_are_reported_not_panicked() {
        use crate::monitor::expr::postfix::PostfixItem;
        use crate::monitor::expr::token::{Token, TokenKind};

        let config = ExprConfig::default();
        let one = || PostfixItem::Operand(Token::new(TokenKind::Number, "1", 0));
        let add = PostfixItem::Operator(Operator::Binary(BinaryOp::Add));

        let underflow = Postfix::from_items(vec![one(), add]);
        assert!(matches!(
            evaluate_postfix(&underflow, &DetachedResolver, &config),
            Err(EvalError::MalformedExpression)
        ));
        let leftover = Postfix::from_items(vec![one(), one()]);
        assert!(matches!(
            evaluate_postfix(&leftover, &DetachedResolver, &config),
            Err(EvalError::MalformedExpression)
        ));
        let empty = Postfix::from_items(Vec::new());
        assert!(matches!(
            evaluate_postfix(&empty, &DetachedResolver, &config),
            Err(EvalError::MalformedExpression)
        ));
        let stray = Postfix::from_items(vec![
            PostfixItem::Operand(Token::new(TokenKind::LParen, "(", 0)),
        ]);
        assert!(matches!(
            evaluate_postfix(&stray, &DetachedResolver, &config),
            Err(EvalError::MalformedExpression)
        ));
    }

    #[test]
    fn operand_stack_depth_is_bounded() {
        let config = ExprConfig::builder()
            .max_stack_depth(2)
            .build()
            .expect("config");
        let postfix = to_postfix(
            tokenize("1+(2+3)", &ExprConfig::default()).expect("tokenize"),
            &ExprConfig::default(),
        )
        .expect("convert");
        assert!(matches!(
            evaluate_postfix(&postfix, &DetachedResolver, &config),
            Err(EvalError::StackOverflow { limit: 2 })
        ));
    }
}
