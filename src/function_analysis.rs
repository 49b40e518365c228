//! Sampling and analysis of exercise functions: domain, range, inverse, boundedness, extrema.
/// numeric settings of the engine and their loader
/// # Example
/// ```
/// use RustedGraphTutor::function_analysis::config::AnalysisConfig;
/// let config = AnalysisConfig::from_document("sampling max_y: 4.5").unwrap();
/// assert_eq!(config.max_y, 4.5);
/// assert_eq!(config.display_step, 0.1);
/// ```
pub mod config;
/// domain and range expressions, asymptotes, inverse and boundedness checks, interval answer diff
/// # Example
/// ```
/// use RustedGraphTutor::function_analysis::config::AnalysisConfig;
/// use RustedGraphTutor::function_analysis::domain_range::{get_domain_expression, get_range_expression};
/// use RustedGraphTutor::function_analysis::function::Function;
/// let config = AnalysisConfig::default();
/// let f = vec![Function::new("sqrt(x)", "(-inf, +inf)", (-5.0, 5.0), true).unwrap()];
/// assert_eq!(get_domain_expression(&f, &config), "[0.0, +inf)");
/// assert_eq!(get_range_expression(&f, &config.range_window(), &config), "[0.0, +inf)");
/// ```
pub mod domain_range;
/// local and absolute maxima and minima of piecewise functions
pub mod extrema;
/// the Function descriptor: expression, declared domain, plotting window
pub mod function;
/// point runs of a function and the memoizing sampler
pub mod sampler;
///____________________________________________________________________________________________________________________________
/// # Analysis session
/// settings plus the sample cache, the entry point the exercise layer talks to
///# Example
/// ```
/// use RustedGraphTutor::function_analysis::function::Function;
/// use RustedGraphTutor::function_analysis::session::AnalysisSession;
/// let mut session = AnalysisSession::default();
/// let f = vec![Function::new("x", "(-1, 1]", (-5.0, 5.0), true).unwrap()];
/// assert_eq!(session.get_domain_expression(&f), "(-1.0, 1.0]");
/// assert!(session.has_inverse(&f));
/// let extrema = session.get_extrema(&f, &[]);
/// assert_eq!(extrema.absolute_max.unwrap()[0].to_string(), "(1.0, 1.0)");
/// ```
pub mod session;
