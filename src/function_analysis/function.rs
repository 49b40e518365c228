//! Function descriptor: an expression bound to a declared domain and a plotting window.
use crate::intervals::interval::{Interval, IntervalSet};
use crate::intervals::interval_parser::{IntervalParseError, parse_interval_set};
use crate::symbolic::parse_expr::ExprParseError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::EvalResult;
use crate::symbolic::symbolic_traits::RealFunction;
use log::debug;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionError {
    Expression(ExprParseError),
    Domain(IntervalParseError),
    InvalidXRange { lower: f64, upper: f64 },
}

impl fmt::Display for FunctionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FunctionError::Expression(e) => write!(f, "invalid expression: {}", e),
            FunctionError::Domain(e) => write!(f, "invalid domain: {}", e),
            FunctionError::InvalidXRange { lower, upper } => write!(
                f,
                "x range ({}, {}) must be finite with lower < upper",
                lower, upper
            ),
        }
    }
}

impl std::error::Error for FunctionError {}

impl From<ExprParseError> for FunctionError {
    fn from(e: ExprParseError) -> Self {
        FunctionError::Expression(e)
    }
}

impl From<IntervalParseError> for FunctionError {
    fn from(e: IntervalParseError) -> Self {
        FunctionError::Domain(e)
    }
}

/// One graphic of an exercise. Immutable once built; the expression and the domain are parsed
/// a single time here.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub expression: String,
    pub expr: Expr,
    pub domain: IntervalSet,
    /// finite plotting window, sampling never leaves it
    pub x_range: (f64, f64),
    /// the exercise's subject, as opposed to decoy option graphics
    pub is_main_graphic: bool,
}

impl Function {
    pub fn new(
        expression: &str,
        domain: &str,
        x_range: (f64, f64),
        is_main_graphic: bool,
    ) -> Result<Function, FunctionError> {
        let (lower, upper) = x_range;
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(FunctionError::InvalidXRange { lower, upper });
        }
        let expr = Expr::parse_expression(expression)?;
        let domain = parse_interval_set(domain)?;
        debug!("function {} on {} within {:?}", expr, domain, x_range);
        Ok(Function {
            expression: expression.to_string(),
            expr,
            domain,
            x_range,
            is_main_graphic,
        })
    }

    /// the plotting window as a closed interval
    pub fn x_window(&self) -> Interval {
        Interval {
            lower: self.x_range.0,
            lower_inclusive: true,
            upper: self.x_range.1,
            upper_inclusive: true,
        }
    }

    /// Declared domain intervals restricted to the window, one per declaration, in order.
    /// Returns (declared, clipped) pairs; declarations entirely outside the window are skipped.
    pub fn pieces(&self) -> Vec<(Interval, Interval)> {
        let window = self.x_window();
        self.domain
            .iter()
            .filter_map(|declared| declared.intersect(&window).map(|clipped| (*declared, clipped)))
            .collect()
    }
}

impl RealFunction for Function {
    fn evaluate(&self, x: f64) -> EvalResult {
        self.expr.eval(x)
    }
    fn name(&self) -> String {
        self.expression.clone()
    }
}
