use proptest::prelude::*;
use sprig_expr::{Builder, Value};

fn eval(input: &str) -> Value {
    Builder::new()
        .eval(input)
        .unwrap_or_else(|e| panic!("{}: {}", input, e))
}

/// `digits[.digits][e[+|-]digits]` or `.digits[...]`
fn numeral() -> impl Strategy<Value = String> {
    let mantissa = prop_oneof![
        ("[0-9]{1,8}", proptest::option::of("[0-9]{1,6}")).prop_map(|(int, frac)| match frac {
            Some(frac) => format!("{}.{}", int, frac),
            None => int,
        }),
        "[0-9]{1,6}".prop_map(|frac| format!(".{}", frac)),
    ];
    let exponent = proptest::option::of(("[eE]", "[+-]?", "[0-9]{1,2}"));
    (mantissa, exponent).prop_map(|(mantissa, exponent)| match exponent {
        Some((e, sign, digits)) => format!("{}{}{}{}", mantissa, e, sign, digits),
        None => mantissa,
    })
}

/// Sum/difference/product chains of small integers.
fn arithmetic() -> impl Strategy<Value = String> {
    (
        -100i32..100,
        prop::collection::vec((prop::sample::select(vec!["+", "-", "*"]), -100i32..100), 0..6),
    )
        .prop_map(|(first, rest)| {
            let mut text = first.to_string();
            for (op, n) in rest {
                text.push_str(&format!(" {} {}", op, n));
            }
            text
        })
}

proptest! {
    #[test]
    fn numerals_round_trip(text in numeral()) {
        let expected: f64 = text.parse().unwrap();
        prop_assert_eq!(eval(&text), Value::Double(expected));
        prop_assert_eq!(eval(&format!("-{}", text)), Value::Double(-expected));
    }
}

proptest! {
    #[test]
    fn bracket_styles_are_equivalent(expr in arithmetic()) {
        let paren = eval(&format!("({})", expr));
        prop_assert_eq!(&paren, &eval(&format!("[{}]", expr)));
        prop_assert_eq!(&paren, &eval(&format!("{{{}}}", expr)));
        prop_assert_eq!(&paren, &eval(&expr));
    }
}

proptest! {
    #[test]
    fn integer_division_truncates(a in -10_000i64..10_000, b in 1i64..100, negate in any::<bool>()) {
        let b = if negate { -b } else { b };
        prop_assert_eq!(eval(&format!("({})\\({})", a, b)), Value::Integer(a / b));
    }
}

proptest! {
    #[test]
    fn function_names_ignore_case(name in "[aA][bB][sS]", n in -1000.0f64..1000.0) {
        prop_assert_eq!(eval(&format!("{}({})", name, n)), Value::Double(n.abs()));
    }
}

proptest! {
    /// Parsing and evaluating arbitrary input returns Ok or Err but never
    /// panics.
    #[test]
    fn arbitrary_input_does_not_panic(s in "\\PC*") {
        let _ = Builder::new().eval(&s);
    }
}
