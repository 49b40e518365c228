use crate::symbolic::symbolic_engine::Expr;
use std::fmt;

/// Reasons an expression has no real value at a given x.
///
/// Evaluation never hands back NaN or an infinity: every intermediate value is checked
/// and the first failure is reported instead. The sampler turns any of these into a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationUndefined {
    DivisionByZero,
    LogOfNonPositive,
    SqrtOfNegative,
    /// asin/acos argument outside [-1, 1]
    OutOfTrigDomain,
    ZeroToNegativePower,
    /// negative base raised to a non-integer exponent has no real value
    ComplexPower,
    Overflow,
    NotANumber,
}

impl fmt::Display for EvaluationUndefined {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvaluationUndefined::DivisionByZero => write!(f, "division by zero"),
            EvaluationUndefined::LogOfNonPositive => write!(f, "logarithm of a non-positive number"),
            EvaluationUndefined::SqrtOfNegative => write!(f, "square root of a negative number"),
            EvaluationUndefined::OutOfTrigDomain => {
                write!(f, "inverse trigonometric function outside [-1, 1]")
            }
            EvaluationUndefined::ZeroToNegativePower => write!(f, "zero raised to a negative power"),
            EvaluationUndefined::ComplexPower => {
                write!(f, "negative base raised to a non-integer power")
            }
            EvaluationUndefined::Overflow => write!(f, "numerical overflow"),
            EvaluationUndefined::NotANumber => write!(f, "result is not a number"),
        }
    }
}

impl std::error::Error for EvaluationUndefined {}

pub type EvalResult = Result<f64, EvaluationUndefined>;

#[inline(always)]
fn checked(value: f64) -> EvalResult {
    if value.is_nan() {
        Err(EvaluationUndefined::NotANumber)
    } else if value.is_infinite() {
        Err(EvaluationUndefined::Overflow)
    } else {
        Ok(value)
    }
}

#[inline(always)]
fn checked_div(numerator: f64, denominator: f64) -> EvalResult {
    if denominator == 0.0 {
        return Err(EvaluationUndefined::DivisionByZero);
    }
    checked(numerator / denominator)
}

#[inline(always)]
fn checked_pow(base: f64, exponent: f64) -> EvalResult {
    if base == 0.0 && exponent < 0.0 {
        return Err(EvaluationUndefined::ZeroToNegativePower);
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(EvaluationUndefined::ComplexPower);
    }
    checked(base.powf(exponent))
}

#[inline(always)]
fn checked_ln(value: f64) -> EvalResult {
    if value <= 0.0 {
        return Err(EvaluationUndefined::LogOfNonPositive);
    }
    checked(value.ln())
}

#[inline(always)]
fn checked_sqrt(value: f64) -> EvalResult {
    if value < 0.0 {
        return Err(EvaluationUndefined::SqrtOfNegative);
    }
    checked(value.sqrt())
}

#[inline(always)]
fn checked_inverse_trig(value: f64, f: fn(f64) -> f64) -> EvalResult {
    if !(-1.0..=1.0).contains(&value) {
        return Err(EvaluationUndefined::OutOfTrigDomain);
    }
    checked(f(value))
}

type Lambdified = Box<dyn Fn(f64) -> EvalResult + Send + Sync>;

impl Expr {
    /// Evaluates the expression at `x`, reporting where the function has no real value.
    ///
    /// Every variable is bound to `x`: exercise functions have a single free variable.
    pub fn eval(&self, x: f64) -> EvalResult {
        match self {
            Expr::Var(_) => checked(x),
            Expr::Const(val) => checked(*val),
            Expr::Add(lhs, rhs) => checked(lhs.eval(x)? + rhs.eval(x)?),
            Expr::Sub(lhs, rhs) => checked(lhs.eval(x)? - rhs.eval(x)?),
            Expr::Mul(lhs, rhs) => checked(lhs.eval(x)? * rhs.eval(x)?),
            Expr::Div(lhs, rhs) => checked_div(lhs.eval(x)?, rhs.eval(x)?),
            Expr::Pow(base, exp) => checked_pow(base.eval(x)?, exp.eval(x)?),
            Expr::Exp(e) => checked(e.eval(x)?.exp()),
            Expr::Ln(e) => checked_ln(e.eval(x)?),
            Expr::sin(e) => checked(e.eval(x)?.sin()),
            Expr::cos(e) => checked(e.eval(x)?.cos()),
            Expr::tg(e) => checked(e.eval(x)?.tan()),
            Expr::arcsin(e) => checked_inverse_trig(e.eval(x)?, f64::asin),
            Expr::arccos(e) => checked_inverse_trig(e.eval(x)?, f64::acos),
            Expr::sqrt(e) => checked_sqrt(e.eval(x)?),
            Expr::sinh(e) => checked(e.eval(x)?.sinh()),
            Expr::cosh(e) => checked(e.eval(x)?.cosh()),
            Expr::abs(e) => checked(e.eval(x)?.abs()),
        }
    }

    /// Converts the expression into an executable closure with the same contract as [`Expr::eval`].
    ///
    /// The tree is walked once; the resulting closure can be shared between threads, which is
    /// what the parallel sampler relies on.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("1/x").unwrap().lambdify1D();
    /// assert_eq!(f(2.0), Ok(0.5));
    /// assert!(f(0.0).is_err());
    /// ```
    pub fn lambdify1D(&self) -> Lambdified {
        match self {
            Expr::Var(_) => Box::new(checked),
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| checked(val))
            }
            Expr::Add(lhs, rhs) => {
                let lf = lhs.lambdify1D();
                let rf = rhs.lambdify1D();
                Box::new(move |x| checked(lf(x)? + rf(x)?))
            }
            Expr::Sub(lhs, rhs) => {
                let lf = lhs.lambdify1D();
                let rf = rhs.lambdify1D();
                Box::new(move |x| checked(lf(x)? - rf(x)?))
            }
            Expr::Mul(lhs, rhs) => {
                let lf = lhs.lambdify1D();
                let rf = rhs.lambdify1D();
                Box::new(move |x| checked(lf(x)? * rf(x)?))
            }
            Expr::Div(lhs, rhs) => {
                let lf = lhs.lambdify1D();
                let rf = rhs.lambdify1D();
                Box::new(move |x| checked_div(lf(x)?, rf(x)?))
            }
            Expr::Pow(b, e) => {
                let bf = b.lambdify1D();
                let ef = e.lambdify1D();
                Box::new(move |x| checked_pow(bf(x)?, ef(x)?))
            }
            Expr::Exp(e) => {
                let f = e.lambdify1D();
                Box::new(move |x| checked(f(x)?.exp()))
            }
            Expr::Ln(e) => {
                let f = e.lambdify1D();
                Box::new(move |x| checked_ln(f(x)?))
            }
            Expr::sin(e) => {
                let f = e.lambdify1D();
                Box::new(move |x| checked(f(x)?.sin()))
            }
            Expr::cos(e) => {
                let f = e.lambdify1D();
                Box::new(move |x| checked(f(x)?.cos()))
            }
            Expr::tg(e) => {
                let f = e.lambdify1D();
                Box::new(move |x| checked(f(x)?.tan()))
            }
            Expr::arcsin(e) => {
                let f = e.lambdify1D();
                Box::new(move |x| checked_inverse_trig(f(x)?, f64::asin))
            }
            Expr::arccos(e) => {
                let f = e.lambdify1D();
                Box::new(move |x| checked_inverse_trig(f(x)?, f64::acos))
            }
            Expr::sqrt(e) => {
                let f = e.lambdify1D();
                Box::new(move |x| checked_sqrt(f(x)?))
            }
            Expr::sinh(e) => {
                let f = e.lambdify1D();
                Box::new(move |x| checked(f(x)?.sinh()))
            }
            Expr::cosh(e) => {
                let f = e.lambdify1D();
                Box::new(move |x| checked(f(x)?.cosh()))
            }
            Expr::abs(e) => {
                let f = e.lambdify1D();
                Box::new(move |x| checked(f(x)?.abs()))
            }
        }
    } // end of lambdify1D

    /// evaluate the function over a vector of arguments, undefined points become `None`
    pub fn calc_vector_lambdified1D(&self, x: &[f64]) -> Vec<Option<f64>> {
        let f = self.lambdify1D();
        x.iter().map(|&xi| f(xi).ok()).collect()
    }
}
