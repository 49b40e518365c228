/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedGraphTutor::symbolic::symbolic_engine::Expr;
/// let input = "sqrt(4 - x**2) + e(x)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the expression tree of a single-variable function
/// 2) turns a symbolic expression into a string expression for printing and control results
pub mod symbolic_engine;
mod symbolic_engine_tests;
///____________________________________________________________________________________________________________________________
/// checked evaluation of expressions: every point where the function has no real value is reported
/// as `EvaluationUndefined` instead of NaN or infinity
///# Example
/// ```
/// use RustedGraphTutor::symbolic::symbolic_engine::Expr;
/// use RustedGraphTutor::symbolic::symbolic_lambdify::EvaluationUndefined;
/// let f = Expr::parse_expression("log(x)").unwrap();
/// assert_eq!(f.eval(1.0), Ok(0.0));
/// assert_eq!(f.eval(0.0), Err(EvaluationUndefined::LogOfNonPositive));
/// let compiled = f.lambdify1D();
/// assert_eq!(compiled(1.0), Ok(0.0));
/// ```
pub mod symbolic_lambdify;
/// trait letting the analyzers work with any evaluator backend
pub mod symbolic_traits;
