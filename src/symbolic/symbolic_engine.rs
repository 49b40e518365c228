//! # Symbolic Engine Module
//!
//! Core symbolic expression type used by the function-analysis engine. Exercise
//! functions arrive as strings (`"(x)**2"`, `"e(x) - 1"`, `"sqrt(4 - x**2)"`), are parsed once
//! into an [`Expr`] tree by [`crate::symbolic::parse_expr`] and then evaluated many times by the
//! sampler through [`Expr::eval`] or a lambdified closure.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - the free variable of the function, always `x` when produced by the parser
//! - **Constants**: `Const(f64)` - numerical constants, including `pi` and `e`
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `arcsin`, `arccos`, `sqrt`, `sinh`, `cosh`, `abs`
//!
//! ### Key Methods
//! - `parse_expression(input)` - parse a string with the exercise grammar
//! - `eval(x)` - checked evaluation, see `symbolic_lambdify.rs`
//! - `set_variable(var, value)` - substitute the variable with a constant
//! - `contains_variable(var)` - check whether the expression depends on a variable
//!
//! Negation has no variant of its own: `-a` is stored as `(-1) * a`, exactly like the
//! `Neg` implementation below builds it.
#![allow(non_camel_case_types)]

use std::f64;
use std::fmt;

/// Core symbolic expression enum representing a single-variable function as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use RustedGraphTutor::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// assert_eq!(expr.eval(1.0).unwrap(), 3.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable (the parser only ever produces `x`)
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ** exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function, written `e(x)` or `exp(x)`
    Exp(Box<Expr>),
    /// Natural logarithm, written `log(x)` or `ln(x)`
    Ln(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// Tangent function - mathematical notation 'tg', parsed from `tan` or `tg`
    tg(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    sqrt(Box<Expr>),
    sinh(Box<Expr>),
    cosh(Box<Expr>),
    abs(Box<Expr>),
}

/// Display writes the expression back in the exercise grammar, so the output can be parsed again.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) if *val < 0.0 => write!(f, "({})", val),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ** {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "log({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tan({})", expr),
            Expr::arcsin(expr) => write!(f, "asin({})", expr),
            Expr::arccos(expr) => write!(f, "acos({})", expr),
            Expr::sqrt(expr) => write!(f, "sqrt({})", expr),
            Expr::sinh(expr) => write!(f, "sinh({})", expr),
            Expr::cosh(expr) => write!(f, "cosh({})", expr),
            Expr::abs(expr) => write!(f, "abs({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates power expression self ** rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Returns the single argument of a named function variant, `None` for operators and leaves.
    pub fn function_argument(&self) -> Option<&Expr> {
        match self {
            Expr::Exp(arg)
            | Expr::Ln(arg)
            | Expr::sin(arg)
            | Expr::cos(arg)
            | Expr::tg(arg)
            | Expr::arcsin(arg)
            | Expr::arccos(arg)
            | Expr::sqrt(arg)
            | Expr::sinh(arg)
            | Expr::cosh(arg)
            | Expr::abs(arg) => Some(arg),
            _ => None,
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        match self {
            Expr::Var(name) if name == var => Expr::Const(value),
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(
                Box::new(lhs.set_variable(var, value)),
                Box::new(rhs.set_variable(var, value)),
            ),
            Expr::Sub(lhs, rhs) => Expr::Sub(
                Box::new(lhs.set_variable(var, value)),
                Box::new(rhs.set_variable(var, value)),
            ),
            Expr::Mul(lhs, rhs) => Expr::Mul(
                Box::new(lhs.set_variable(var, value)),
                Box::new(rhs.set_variable(var, value)),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(lhs.set_variable(var, value)),
                Box::new(rhs.set_variable(var, value)),
            ),
            Expr::Pow(base, exp) => Expr::Pow(
                Box::new(base.set_variable(var, value)),
                Box::new(exp.set_variable(var, value)),
            ),
            Expr::Exp(expr) => Expr::Exp(Box::new(expr.set_variable(var, value))),
            Expr::Ln(expr) => Expr::Ln(Box::new(expr.set_variable(var, value))),
            Expr::sin(expr) => Expr::sin(Box::new(expr.set_variable(var, value))),
            Expr::cos(expr) => Expr::cos(Box::new(expr.set_variable(var, value))),
            Expr::tg(expr) => Expr::tg(Box::new(expr.set_variable(var, value))),
            Expr::arcsin(expr) => Expr::arcsin(Box::new(expr.set_variable(var, value))),
            Expr::arccos(expr) => Expr::arccos(Box::new(expr.set_variable(var, value))),
            Expr::sqrt(expr) => Expr::sqrt(Box::new(expr.set_variable(var, value))),
            Expr::sinh(expr) => Expr::sinh(Box::new(expr.set_variable(var, value))),
            Expr::cosh(expr) => Expr::cosh(Box::new(expr.set_variable(var, value))),
            Expr::abs(expr) => Expr::abs(Box::new(expr.set_variable(var, value))),
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            other => other
                .function_argument()
                .map(|arg| arg.contains_variable(var_name))
                .unwrap_or(false),
        }
    }

    /// true when no variable appears anywhere in the tree
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Var(_) => false,
            Expr::Const(_) => true,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => left.is_constant() && right.is_constant(),
            other => other
                .function_argument()
                .map(|arg| arg.is_constant())
                .unwrap_or(true),
        }
    }
}
