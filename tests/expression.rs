mod common;

use hex_literal::hex;

use nanemu_sdb::monitor::expr::{
    DetachedResolver, EvalError, Evaluator, ExprConfig, ExprError, LexError, ResolveError,
    SyntaxError, evaluate,
};

#[test]
fn precedence_shapes_the_postfix_order() {
    let evaluator = Evaluator::default();
    for (expr, postfix, value) in [
        ("2+3*4", "2 3 4 * +", 14),
        ("(2+3)*4", "2 3 + 4 *", 20),
        ("2*3+4", "2 3 * 4 +", 10),
        ("1 == 1 + 0", "1 1 0 + ==", 1),
    ] {
        let compiled = evaluator.compile(expr).expect("compile");
        assert_eq!(compiled.to_string(), postfix, "{expr}");
        assert_eq!(
            evaluator
                .evaluate_compiled(&compiled, &DetachedResolver)
                .expect("evaluate"),
            value,
            "{expr}"
        );
    }
}

#[test]
fn subtraction_and_division_associate_left() {
    assert_eq!(evaluate("10-3-2", &DetachedResolver).expect("sub"), 5);
    assert_eq!(evaluate("100/5/2", &DetachedResolver).expect("div"), 10);
}

#[test]
fn division_by_zero_never_yields_a_value() {
    assert!(matches!(
        evaluate("5/0", &DetachedResolver),
        Err(ExprError::Eval(EvalError::DivisionByZero))
    ));
    assert!(matches!(
        evaluate("1 + 8 / (2 - 2)", &DetachedResolver),
        Err(ExprError::Eval(EvalError::DivisionByZero))
    ));
}

#[test]
fn unmatched_parentheses_on_either_side() {
    assert!(matches!(
        evaluate("(1+2", &DetachedResolver),
        Err(ExprError::Syntax(SyntaxError::UnmatchedParen { column: 0 }))
    ));
    assert!(matches!(
        evaluate("1+2)", &DetachedResolver),
        Err(ExprError::Syntax(SyntaxError::UnmatchedParen { column: 3 }))
    ));
    for unclosed in ["(", "((", "(1+"] {
        assert!(
            matches!(
                evaluate(unclosed, &DetachedResolver),
                Err(ExprError::Syntax(SyntaxError::UnmatchedParen { .. }))
            ),
            "{unclosed}"
        );
    }
}

#[test]
fn empty_group_is_an_empty_expression() {
    assert!(matches!(
        evaluate("()", &DetachedResolver),
        Err(ExprError::Syntax(SyntaxError::EmptyExpression))
    ));
}

#[test]
fn hex_prefix_wins_over_decimal() {
    assert_eq!(evaluate("0x10+1", &DetachedResolver).expect("hex"), 17);
    assert_eq!(evaluate("10+1", &DetachedResolver).expect("dec"), 11);
    assert_eq!(evaluate("0XfF", &DetachedResolver).expect("upper"), 255);
}

#[test]
fn unknown_register_is_reported_by_name() {
    let mut monitor = common::monitor();
    match monitor.evaluate("$zz") {
        Err(ExprError::Eval(EvalError::Resolve(ResolveError::UnknownRegister { name }))) => {
            assert_eq!(name, "zz")
        }
        other => panic!("expected unknown register, got {other:?}"),
    }
    monitor
        .state_mut()
        .write_register("a0", 3)
        .expect("seed a0");
    assert!(monitor.evaluate("$a0 + $zz").is_err());
    assert_eq!(monitor.evaluate("$x10 + $a0").expect("alias"), 6);
}

#[test]
fn repeated_evaluation_is_stable() {
    let mut monitor = common::monitor();
    monitor
        .state_mut()
        .write_register("sp", 0x8000_0010)
        .expect("seed sp");
    monitor
        .bus()
        .write(0x8000_0010, &hex!("78 56 34 12"))
        .expect("seed memory");

    let expr = "*$sp + ($sp - 0x80000000) * 2";
    let first = monitor.evaluate(expr).expect("first");
    let second = monitor.evaluate(expr).expect("second");
    assert_eq!(first, 0x1234_5678 + 0x20);
    assert_eq!(first, second);
}

#[test]
fn unsupported_operator_points_at_its_column() {
    let err = evaluate("5 & 3", &DetachedResolver).expect_err("& is not an operator");
    assert!(matches!(
        err,
        ExprError::Lex(LexError::UnrecognizedInput { position: 2 })
    ));
    assert_eq!(err.column(), Some(2));
}

#[test]
fn memory_outside_the_ram_window_is_an_invalid_address() {
    let monitor = common::monitor();
    match monitor.evaluate("*0x10") {
        Err(ExprError::Eval(EvalError::Resolve(ResolveError::InvalidAddress { addr, .. }))) => {
            assert_eq!(addr, 0x10)
        }
        other => panic!("expected invalid address, got {other:?}"),
    }
}

#[test]
fn unary_operators_bind_tighter_than_binary_ones() {
    assert_eq!(evaluate("-2*3", &DetachedResolver).expect("neg"), -6);
    assert_eq!(evaluate("--5", &DetachedResolver).expect("double neg"), 5);
    assert_eq!(evaluate("4 - -1", &DetachedResolver).expect("minus neg"), 5);
}

#[test]
fn deeply_nested_input_stops_at_the_configured_bounds() {
    let nested = format!("{}1{}", "(".repeat(60), ")".repeat(60));
    assert!(matches!(
        evaluate(&nested, &DetachedResolver),
        Err(ExprError::Lex(LexError::TooManyTokens { limit: 100 }))
    ));

    let shallow = ExprConfig::builder()
        .max_stack_depth(4)
        .build()
        .expect("config");
    let evaluator = Evaluator::new(shallow);
    assert_eq!(
        evaluator
            .evaluate("((1))", &DetachedResolver)
            .expect("within depth"),
        1
    );
    assert!(matches!(
        evaluator.evaluate("(((((1)))))", &DetachedResolver),
        Err(ExprError::Syntax(SyntaxError::StackOverflow { limit: 4 }))
    ));
}

#[test]
fn literals_wider_than_a_word_overflow() {
    assert!(matches!(
        evaluate("99999999999999999999", &DetachedResolver),
        Err(ExprError::Eval(EvalError::Resolve(ResolveError::Overflow { .. })))
    ));
    assert_eq!(
        evaluate("0xffffffffffffffff", &DetachedResolver).expect("all ones"),
        -1
    );
}
