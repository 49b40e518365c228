//! Exercise-side logic: what the user answered versus what the engine derived.
/// ExerciseKind dispatch, verdicts with wrong/missing marks, response normalization
/// # Example
/// ```
/// use RustedGraphTutor::exercises::answer_validator::{validate, DerivedTruth, ExerciseKind, UserAnswer};
/// use RustedGraphTutor::intervals::interval::Interval;
/// let truth = DerivedTruth::Domain {
///     expression: "[2,3) U (4,5]".to_string(),
///     window: Interval::closed(-5.0, 5.0).unwrap(),
/// };
/// let answer = UserAnswer::Interval("(4,5] U [2,3)".to_string());
/// assert!(validate(ExerciseKind::Domain, &truth, &answer).unwrap().is_correct);
/// ```
pub mod answer_validator;
/// catalog of elementary functions and recognition of an expression's base function
pub mod elementary_functions;
