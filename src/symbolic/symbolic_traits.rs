// REAL FUNCTION TRAIT //////////////////////////////////////////////////////////////////
// The sampler and the analyzers only need "give me f(x) or tell me it is undefined".
// The trait is implemented for the native engine here; closures and other backends
// go through ClosureFunction.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::{EvalResult, EvaluationUndefined};
use std::fmt;

pub trait RealFunction: Send + Sync {
    fn evaluate(&self, x: f64) -> EvalResult;
    fn name(&self) -> String;
    /// true if the function has a real value at x
    fn is_defined_at(&self, x: f64) -> bool {
        self.evaluate(x).is_ok()
    }
}

///////////////// IMPLEMENTATION OF THE TRAIT FOR THE NATIVE ENGINE /////////////////////////
impl RealFunction for Expr {
    fn evaluate(&self, x: f64) -> EvalResult {
        self.eval(x)
    }
    fn name(&self) -> String {
        self.to_string()
    }
}

/// Wraps any thread-safe closure so it can be analysed like a parsed expression.
pub struct ClosureFunction<F>
where
    F: Fn(f64) -> Result<f64, EvaluationUndefined> + Send + Sync,
{
    pub label: String,
    pub closure: F,
}

impl<F> ClosureFunction<F>
where
    F: Fn(f64) -> Result<f64, EvaluationUndefined> + Send + Sync,
{
    pub fn new(label: &str, closure: F) -> Self {
        ClosureFunction {
            label: label.to_string(),
            closure,
        }
    }
}

impl<F> RealFunction for ClosureFunction<F>
where
    F: Fn(f64) -> Result<f64, EvaluationUndefined> + Send + Sync,
{
    fn evaluate(&self, x: f64) -> EvalResult {
        let value = (self.closure)(x)?;
        if value.is_nan() {
            return Err(EvaluationUndefined::NotANumber);
        }
        if value.is_infinite() {
            return Err(EvaluationUndefined::Overflow);
        }
        Ok(value)
    }
    fn name(&self) -> String {
        self.label.clone()
    }
}

impl<F> fmt::Debug for ClosureFunction<F>
where
    F: Fn(f64) -> Result<f64, EvaluationUndefined> + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ClosureFunction({})", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_as_real_function() {
        let f: Box<dyn RealFunction> = Box::new(Expr::parse_expression("sqrt(x)").unwrap());
        assert_eq!(f.evaluate(4.0), Ok(2.0));
        assert!(!f.is_defined_at(-1.0));
        assert_eq!(f.name(), "sqrt(x)");
    }

    #[test]
    fn test_closure_results_are_checked() {
        let f = ClosureFunction::new("1/x unchecked", |x: f64| Ok(1.0 / x));
        assert_eq!(f.evaluate(2.0), Ok(0.5));
        assert_eq!(f.evaluate(0.0), Err(EvaluationUndefined::Overflow));
        let g = ClosureFunction::new("nan", |_x: f64| Ok(f64::NAN));
        assert_eq!(g.evaluate(1.0), Err(EvaluationUndefined::NotANumber));
    }
}
