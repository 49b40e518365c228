//! Catalog of the elementary functions used as exercise building blocks, and structural
//! recognition of an expression as one of them.
use crate::function_analysis::function::{Function, FunctionError};
use crate::symbolic::parse_expr::ExprParseError;
use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::E;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ElementaryFunction {
    Linear,
    Quadratic,
    Cubic,
    SquareRoot,
    Exponential,
    Logarithm,
    Sine,
    Cosine,
    Tangent,
    AbsoluteValue,
    HyperbolicSine,
    HyperbolicCosine,
    Constant,
}

impl ElementaryFunction {
    pub fn canonical_expression(&self) -> &'static str {
        match self {
            ElementaryFunction::Linear => "x",
            ElementaryFunction::Quadratic => "(x)**2",
            ElementaryFunction::Cubic => "(x)**3",
            ElementaryFunction::SquareRoot => "sqrt(x)",
            ElementaryFunction::Exponential => "e(x)",
            ElementaryFunction::Logarithm => "log(x)",
            ElementaryFunction::Sine => "sin(x)",
            ElementaryFunction::Cosine => "cos(x)",
            ElementaryFunction::Tangent => "tan(x)",
            ElementaryFunction::AbsoluteValue => "abs(x)",
            ElementaryFunction::HyperbolicSine => "sinh(x)",
            ElementaryFunction::HyperbolicCosine => "cosh(x)",
            ElementaryFunction::Constant => "1",
        }
    }

    /// Domain the exercises plot the base function on. The tangent is shown on its principal
    /// branch only.
    pub fn canonical_domain(&self) -> &'static str {
        match self {
            ElementaryFunction::SquareRoot => "[0, +inf)",
            ElementaryFunction::Logarithm => "(0, +inf)",
            ElementaryFunction::Tangent => "(-1.57, 1.57)",
            _ => "(-inf, +inf)",
        }
    }

    pub fn function(&self, x_range: (f64, f64), is_main_graphic: bool) -> Result<Function, FunctionError> {
        Function::new(
            self.canonical_expression(),
            self.canonical_domain(),
            x_range,
            is_main_graphic,
        )
    }

    /// recognise the base function of an expression such as `2*sin(3*x - 1) + 4`
    pub fn recognize(expr: &Expr) -> Option<ElementaryFunction> {
        if expr.is_constant() {
            return Some(ElementaryFunction::Constant);
        }
        let core = strip_affine(expr);
        if is_affine(core) {
            return Some(ElementaryFunction::Linear);
        }
        let unary = |arg: &Expr, kind: ElementaryFunction| {
            (is_affine(arg) && !arg.is_constant()).then_some(kind)
        };
        match core {
            Expr::Pow(base, exponent) => match (base.as_ref(), exponent.as_ref()) {
                (Expr::Const(b), arg) if *b == E => unary(arg, ElementaryFunction::Exponential),
                (arg, Expr::Const(n)) if *n == 2.0 => unary(arg, ElementaryFunction::Quadratic),
                (arg, Expr::Const(n)) if *n == 3.0 => unary(arg, ElementaryFunction::Cubic),
                (arg, Expr::Const(n)) if *n == 0.5 => unary(arg, ElementaryFunction::SquareRoot),
                _ => None,
            },
            Expr::sqrt(arg) => unary(arg, ElementaryFunction::SquareRoot),
            Expr::Exp(arg) => unary(arg, ElementaryFunction::Exponential),
            Expr::Ln(arg) => unary(arg, ElementaryFunction::Logarithm),
            Expr::sin(arg) => unary(arg, ElementaryFunction::Sine),
            Expr::cos(arg) => unary(arg, ElementaryFunction::Cosine),
            Expr::tg(arg) => unary(arg, ElementaryFunction::Tangent),
            Expr::abs(arg) => unary(arg, ElementaryFunction::AbsoluteValue),
            Expr::sinh(arg) => unary(arg, ElementaryFunction::HyperbolicSine),
            Expr::cosh(arg) => unary(arg, ElementaryFunction::HyperbolicCosine),
            _ => None,
        }
    }

    pub fn recognize_expression(expression: &str) -> Result<Option<ElementaryFunction>, ExprParseError> {
        Ok(ElementaryFunction::recognize(&Expr::parse_expression(expression)?))
    }

    pub fn catalog() -> Vec<ElementaryFunction> {
        ElementaryFunction::iter().collect()
    }
}

/// peels `a*g + d`, `g/a` and `-g` wrappers off, returning `g`
fn strip_affine(expr: &Expr) -> &Expr {
    let mut current = expr;
    loop {
        current = match current {
            Expr::Add(lhs, rhs) | Expr::Sub(lhs, rhs) | Expr::Mul(lhs, rhs) if lhs.is_constant() => &**rhs,
            Expr::Add(lhs, rhs) | Expr::Sub(lhs, rhs) | Expr::Mul(lhs, rhs) | Expr::Div(lhs, rhs)
                if rhs.is_constant() =>
            {
                &**lhs
            }
            _ => return current,
        };
    }
}

/// linear in x (constants included)
fn is_affine(expr: &Expr) -> bool {
    match expr {
        Expr::Var(_) | Expr::Const(_) => true,
        Expr::Add(lhs, rhs) | Expr::Sub(lhs, rhs) => is_affine(lhs) && is_affine(rhs),
        Expr::Mul(lhs, rhs) => {
            (lhs.is_constant() && is_affine(rhs)) || (rhs.is_constant() && is_affine(lhs))
        }
        Expr::Div(lhs, rhs) => rhs.is_constant() && is_affine(lhs),
        other => other.is_constant(),
    }
}
