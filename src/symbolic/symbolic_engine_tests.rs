#[cfg(test)]
mod tests {
    use crate::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_operators_build_tree() {
        let expr = x() * Expr::Const(2.0) + Expr::Const(1.0);
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Mul(Box::new(x()), Box::new(Expr::Const(2.0)))),
                Box::new(Expr::Const(1.0))
            )
        );
        assert_eq!(expr.eval(3.0), Ok(7.0));
    }

    #[test]
    fn test_neg_is_multiplication_by_minus_one() {
        let expr = -x();
        assert_eq!(
            expr,
            Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(x()))
        );
        assert_eq!(expr.eval(2.5), Ok(-2.5));
    }

    #[test]
    fn test_pow_and_div() {
        let expr = x().pow(Expr::Const(2.0)) / (x() - Expr::Const(1.0));
        assert_eq!(expr.eval(3.0), Ok(4.5));
        assert!(expr.eval(1.0).is_err());
    }

    #[test]
    fn test_set_variable() {
        let expr = Expr::parse_expression("sin(x) + x**2").unwrap();
        let substituted = expr.set_variable("x", 0.0);
        assert!(substituted.is_constant());
        assert_eq!(substituted.eval(123.0), Ok(0.0));
        // other variable names are left alone
        let untouched = expr.set_variable("y", 1.0);
        assert_eq!(untouched, expr);
    }

    #[test]
    fn test_contains_variable() {
        assert!(Expr::parse_expression("log(abs(x) + 1)").unwrap().contains_variable("x"));
        assert!(!Expr::parse_expression("sqrt(2) * pi").unwrap().contains_variable("x"));
        assert!(Expr::parse_expression("cosh(2)").unwrap().is_constant());
    }

    #[test]
    fn test_function_argument() {
        let expr = Expr::parse_expression("tan(2*x)").unwrap();
        let arg = expr.function_argument().unwrap();
        assert_eq!(arg.eval(1.0), Ok(2.0));
        assert!(Expr::Const(1.0).function_argument().is_none());
        assert!((x() + x()).function_argument().is_none());
    }

    #[test]
    fn test_display_is_reparsable() {
        let inputs = [
            "sqrt(4 - x**2)",
            "e(x) - 1",
            "asin(x/2) + acos(x/3)",
            "-3*x + 0.5",
            "sinh(x) / cosh(x)",
        ];
        for input in inputs {
            let expr = Expr::parse_expression(input).unwrap();
            let reparsed = Expr::parse_expression(&expr.to_string()).unwrap();
            for x in [-1.5, -0.3, 0.7, 1.9] {
                match (expr.eval(x), reparsed.eval(x)) {
                    (Ok(a), Ok(b)) => assert_relative_eq!(a, b, epsilon = 1e-12),
                    (a, b) => assert_eq!(a, b, "{input} at {x}"),
                }
            }
        }
    }

    #[test]
    fn test_constant_display() {
        assert_eq!(Expr::Const(2.0).to_string(), "2");
        assert_eq!(Expr::Const(-1.5).to_string(), "(-1.5)");
        assert_eq!((x() + Expr::Const(1.0)).to_string(), "(x + 1)");
    }
}
