//! One analysis session: the settings plus the sample cache every query shares.
use crate::exercises::answer_validator::{DerivedTruth, ExerciseKind, UserAnswer, Verdict, validate_with_step};
use crate::exercises::elementary_functions::ElementaryFunction;
use crate::function_analysis::config::AnalysisConfig;
use crate::function_analysis::domain_range::{self, MembershipDiff};
use crate::function_analysis::extrema::{ExtremaResult, get_extrema};
use crate::function_analysis::function::Function;
use crate::function_analysis::sampler::{Point, SampledCurve, Sampler};
use crate::intervals::interval::Interval;
use crate::intervals::interval_parser::IntervalParseError;
use log::info;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct AnalysisSession {
    pub config: AnalysisConfig,
    sampler: Sampler,
}

impl AnalysisSession {
    pub fn new(config: AnalysisConfig) -> AnalysisSession {
        AnalysisSession::with_sampler(config, Sampler::new())
    }

    pub fn with_sampler(config: AnalysisConfig, sampler: Sampler) -> AnalysisSession {
        AnalysisSession { config, sampler }
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn sample(&mut self, function: &Function, step: f64) -> Arc<SampledCurve> {
        self.sampler.sample(function, step, self.config.max_y)
    }

    /// the curve as drawn, at display resolution
    pub fn display_curve(&mut self, function: &Function) -> Arc<SampledCurve> {
        self.sample(function, self.config.display_step)
    }

    pub fn get_domain_expression(&self, functions: &[Function]) -> String {
        domain_range::get_domain_expression(functions, &self.config)
    }

    /// `containing` defaults to the configured y window
    pub fn get_range_expression(&self, functions: &[Function], containing: Option<&Interval>) -> String {
        let window = self.config.range_window();
        domain_range::get_range_expression(functions, containing.unwrap_or(&window), &self.config)
    }

    pub fn has_inverse(&mut self, functions: &[Function]) -> bool {
        domain_range::has_inverse(functions, &mut self.sampler, &self.config)
    }

    pub fn is_bounded(&self, functions: &[Function]) -> bool {
        domain_range::is_bounded(functions, &self.config)
    }

    pub fn get_extrema(&mut self, functions: &[Function], explicit_points: &[Point]) -> ExtremaResult {
        get_extrema(functions, explicit_points, &mut self.sampler, &self.config)
    }

    /// Smallest closed window holding every function's x range. Panics on an empty list.
    pub fn domain_window(functions: &[Function]) -> Interval {
        let Some(window) = functions.iter().map(|f| f.x_window()).reduce(|a, b| a.hull(&b)) else {
            panic!("window requested for an empty function list");
        };
        window
    }

    pub fn validate_domain_expression(
        &self,
        expected: &str,
        user_text: &str,
        window: &Interval,
    ) -> Result<MembershipDiff, IntervalParseError> {
        domain_range::validate_domain_expression(expected, user_text, window, self.config.validation_step)
    }

    pub fn validate_range_expression(
        &self,
        expected: &str,
        user_text: &str,
    ) -> Result<MembershipDiff, IntervalParseError> {
        domain_range::validate_range_expression(
            expected,
            user_text,
            &self.config.range_window(),
            self.config.validation_step,
        )
    }

    /// Computes what a correct answer to `kind` is for these functions.
    pub fn derive_truth(
        &mut self,
        kind: ExerciseKind,
        functions: &[Function],
        explicit_points: &[Point],
    ) -> DerivedTruth {
        let truth = match kind {
            ExerciseKind::Domain => DerivedTruth::Domain {
                expression: self.get_domain_expression(functions),
                window: AnalysisSession::domain_window(functions),
            },
            ExerciseKind::Range => DerivedTruth::Range {
                expression: self.get_range_expression(functions, None),
                window: self.config.range_window(),
            },
            ExerciseKind::HasInverse => DerivedTruth::HasInverse(self.has_inverse(functions)),
            ExerciseKind::IsBounded => DerivedTruth::IsBounded(self.is_bounded(functions)),
            ExerciseKind::Extrema => DerivedTruth::Extrema(self.get_extrema(functions, explicit_points)),
            ExerciseKind::ElementaryFunction => {
                let Some(main) = functions.iter().find(|f| f.is_main_graphic).or(functions.first()) else {
                    panic!("elementary function requested for an empty function list");
                };
                DerivedTruth::ElementaryFunction(ElementaryFunction::recognize(&main.expr))
            }
        };
        info!("{} truth: {:?}", kind, truth);
        truth
    }

    pub fn validate_answer(
        &self,
        kind: ExerciseKind,
        truth: &DerivedTruth,
        answer: &UserAnswer,
    ) -> Result<Verdict, IntervalParseError> {
        validate_with_step(kind, truth, answer, self.config.validation_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(expression: &str, domain: &str) -> Function {
        Function::new(expression, domain, (-5.0, 5.0), true).unwrap()
    }

    #[test]
    fn test_queries_share_the_cache() {
        let mut session = AnalysisSession::default();
        let functions = vec![f("x", "(-1, 1]")];
        assert!(session.has_inverse(&functions));
        let curve = session.display_curve(&functions[0]);
        assert_eq!(curve.point_count(), 20);
        assert_eq!(session.sampler().hits(), 1);
        session.get_extrema(&functions, &[]);
        session.get_extrema(&functions, &[]);
        assert_eq!(session.sampler().misses(), 2);
        assert_eq!(session.sampler().cache_len(), 2);
    }

    #[test]
    fn test_domain_window_is_the_hull() {
        let functions = vec![
            Function::new("x", "[0, 1]", (-2.0, 3.0), true).unwrap(),
            Function::new("x", "[0, 1]", (-5.0, 1.0), false).unwrap(),
        ];
        assert_eq!(AnalysisSession::domain_window(&functions).to_string(), "[-5.0, 3.0]");
    }

    #[test]
    fn test_derive_and_validate() {
        let mut session = AnalysisSession::new(AnalysisConfig::default());
        let functions = vec![f("(x)**2", "(-3,0)"), f("x", "[0,1]")];

        let domain = session.derive_truth(ExerciseKind::Domain, &functions, &[]);
        let verdict = session
            .validate_answer(
                ExerciseKind::Domain,
                &domain,
                &UserAnswer::Interval("(-3, 0) U [0, 1]".to_string()),
            )
            .unwrap();
        assert!(verdict.is_correct);

        let inverse = session.derive_truth(ExerciseKind::HasInverse, &functions, &[]);
        assert_eq!(inverse, DerivedTruth::HasInverse(false));

        let range = session.derive_truth(ExerciseKind::Range, &functions, &[]);
        assert_eq!(
            range,
            DerivedTruth::Range {
                expression: "[0.0, +inf)".to_string(),
                window: Interval::closed(-5.0, 5.0).unwrap()
            }
        );
        let verdict = session
            .validate_answer(ExerciseKind::Range, &range, &UserAnswer::Interval("(0, +inf)".to_string()))
            .unwrap();
        assert_eq!(verdict.missing, vec![crate::exercises::answer_validator::Mark::X(0.0)]);
    }

    #[test]
    fn test_elementary_truth_uses_main_graphic() {
        let mut session = AnalysisSession::default();
        let functions = vec![
            Function::new("cos(x)", "(-inf, +inf)", (-5.0, 5.0), false).unwrap(),
            Function::new("2*sqrt(x - 1)", "[1, +inf)", (-5.0, 5.0), true).unwrap(),
        ];
        assert_eq!(
            session.derive_truth(ExerciseKind::ElementaryFunction, &functions, &[]),
            DerivedTruth::ElementaryFunction(Some(ElementaryFunction::SquareRoot))
        );
    }

    #[test]
    fn test_validate_range_expression_uses_config_window() {
        let session = AnalysisSession::default();
        let (ok, wrong, missing) = session.validate_range_expression("[-1, 1]", "[-1, 1]").unwrap();
        assert!(ok && wrong.is_empty() && missing.is_empty());
        assert!(session.validate_range_expression("[-1, 1]", "[-6, 1]").is_err());
    }
}
