//! Checks a user answer against the derived truth of an exercise.
//!
//! The exercise kind selects the comparison: interval answers go through the membership diff of
//! the domain/range analyzer, point answers are compared per category on truncated coordinates,
//! boolean and choice answers by equality. Nothing here keeps state.
use crate::exercises::elementary_functions::ElementaryFunction;
use crate::function_analysis::domain_range::{validate_domain_expression, validate_range_expression};
use crate::function_analysis::extrema::{ExtremaResult, PointType};
use crate::function_analysis::sampler::Point;
use crate::intervals::interval::Interval;
use crate::intervals::interval_parser::{IntervalParseError, format_interval_set, parse_interval_set};
use itertools::Itertools;
use log::info;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

pub const DEFAULT_VALIDATION_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ExerciseKind {
    Domain,
    Range,
    HasInverse,
    IsBounded,
    Extrema,
    ElementaryFunction,
}

/// What the engine computed for an exercise. Interval truths carry the window the user answer
/// must stay within.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedTruth {
    Domain { expression: String, window: Interval },
    Range { expression: String, window: Interval },
    HasInverse(bool),
    IsBounded(bool),
    Extrema(ExtremaResult),
    /// `None` when the main graphic is not one of the catalog functions
    ElementaryFunction(Option<ElementaryFunction>),
}

impl DerivedTruth {
    pub fn kind(&self) -> ExerciseKind {
        match self {
            DerivedTruth::Domain { .. } => ExerciseKind::Domain,
            DerivedTruth::Range { .. } => ExerciseKind::Range,
            DerivedTruth::HasInverse(_) => ExerciseKind::HasInverse,
            DerivedTruth::IsBounded(_) => ExerciseKind::IsBounded,
            DerivedTruth::Extrema(_) => ExerciseKind::Extrema,
            DerivedTruth::ElementaryFunction(_) => ExerciseKind::ElementaryFunction,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserAnswer {
    /// typed interval notation
    Interval(String),
    Boolean(bool),
    /// points the user clicked, per category
    Points(BTreeMap<PointType, Vec<Point>>),
    /// name of the selected option button
    Choice(String),
}

/// One piece of feedback to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mark {
    X(f64),
    Point(PointType, Point),
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mark::X(x) => write!(f, "x = {}", crate::Utils::rounding::float_repr(*x)),
            Mark::Point(point_type, point) => write!(f, "{} {}", point_type, point),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ResumeState {
    Pending,
    Success,
    Error,
}

/// `wrong`: given by the user but not true; `missing`: true but not given.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub is_correct: bool,
    pub wrong: Vec<Mark>,
    pub missing: Vec<Mark>,
}

impl Verdict {
    fn from_equality(is_correct: bool) -> Verdict {
        Verdict {
            is_correct,
            wrong: Vec::new(),
            missing: Vec::new(),
        }
    }

    fn from_marks(wrong: Vec<Mark>, missing: Vec<Mark>) -> Verdict {
        Verdict {
            is_correct: wrong.is_empty() && missing.is_empty(),
            wrong,
            missing,
        }
    }

    pub fn resume_state(&self) -> ResumeState {
        if self.is_correct {
            ResumeState::Success
        } else {
            ResumeState::Error
        }
    }
}

pub fn validate(
    kind: ExerciseKind,
    truth: &DerivedTruth,
    answer: &UserAnswer,
) -> Result<Verdict, IntervalParseError> {
    validate_with_step(kind, truth, answer, DEFAULT_VALIDATION_STEP)
}

/// Panics when `kind`, `truth` and `answer` do not describe the same kind of exercise.
pub fn validate_with_step(
    kind: ExerciseKind,
    truth: &DerivedTruth,
    answer: &UserAnswer,
    step: f64,
) -> Result<Verdict, IntervalParseError> {
    assert_eq!(
        kind,
        truth.kind(),
        "{} exercise validated against a {} truth",
        kind,
        truth.kind()
    );
    let verdict = match (truth, answer) {
        (DerivedTruth::Domain { expression, window }, UserAnswer::Interval(text)) => {
            let (_, wrong, missing) = validate_domain_expression(expression, text, window, step)?;
            x_marks(wrong, missing)
        }
        (DerivedTruth::Range { expression, window }, UserAnswer::Interval(text)) => {
            let (_, wrong, missing) = validate_range_expression(expression, text, window, step)?;
            x_marks(wrong, missing)
        }
        (DerivedTruth::HasInverse(expected), UserAnswer::Boolean(given))
        | (DerivedTruth::IsBounded(expected), UserAnswer::Boolean(given)) => {
            Verdict::from_equality(expected == given)
        }
        (DerivedTruth::Extrema(expected), UserAnswer::Points(given)) => compare_points(expected, given),
        (DerivedTruth::ElementaryFunction(expected), UserAnswer::Choice(name)) => {
            let given = name.trim().parse::<ElementaryFunction>().ok();
            Verdict::from_equality(expected.is_some() && *expected == given)
        }
        (truth, answer) => panic!("{} exercise cannot check {:?} against {:?}", kind, answer, truth),
    };
    info!(
        "{} answer {}: {} wrong, {} missing",
        kind,
        verdict.resume_state(),
        verdict.wrong.len(),
        verdict.missing.len()
    );
    Ok(verdict)
}

fn x_marks(wrong: Vec<f64>, missing: Vec<f64>) -> Verdict {
    Verdict::from_marks(
        wrong.into_iter().map(Mark::X).collect(),
        missing.into_iter().map(Mark::X).collect(),
    )
}

/// Per category: a submitted point absent from the truth is wrong, a true point the user did
/// not submit is missing. Categories the truth leaves as `None` accept no points.
fn compare_points(expected: &ExtremaResult, given: &BTreeMap<PointType, Vec<Point>>) -> Verdict {
    let mut wrong = Vec::new();
    let mut missing = Vec::new();
    let no_points = Vec::new();
    for (point_type, truth) in expected.iter() {
        let truth: BTreeMap<(i64, i64), Point> = truth
            .unwrap_or(&no_points)
            .iter()
            .map(|p| (p.key(), p.truncated()))
            .collect();
        let submitted: BTreeMap<(i64, i64), Point> = given
            .get(&point_type)
            .unwrap_or(&no_points)
            .iter()
            .map(|p| (p.key(), p.truncated()))
            .collect();
        let truth_keys: BTreeSet<_> = truth.keys().collect();
        let submitted_keys: BTreeSet<_> = submitted.keys().collect();
        wrong.extend(
            submitted_keys
                .difference(&truth_keys)
                .map(|k| Mark::Point(point_type, submitted[*k])),
        );
        missing.extend(
            truth_keys
                .difference(&submitted_keys)
                .map(|k| Mark::Point(point_type, truth[*k])),
        );
    }
    Verdict::from_marks(wrong, missing)
}

/// Canonical text of an answer, the form handed to the progress store.
pub fn normalize_response(answer: &UserAnswer) -> String {
    match answer {
        UserAnswer::Interval(text) => match parse_interval_set(text) {
            Ok(set) => format_interval_set(&set),
            Err(_) => text.trim().to_string(),
        },
        UserAnswer::Boolean(value) => value.to_string(),
        UserAnswer::Points(points) => points
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(point_type, list)| {
                let list = list
                    .iter()
                    .map(|p| p.truncated())
                    .sorted_by(|a, b| a.x.total_cmp(&b.x))
                    .join(", ");
                format!("{}: {}", point_type, list)
            })
            .join("; "),
        UserAnswer::Choice(name) => match name.trim().parse::<ElementaryFunction>() {
            Ok(choice) => choice.to_string(),
            Err(_) => name.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervals::interval_parser::ParseErrorKind;

    fn domain_truth(expression: &str) -> DerivedTruth {
        DerivedTruth::Domain {
            expression: expression.to_string(),
            window: Interval::closed(-5.0, 5.0).unwrap(),
        }
    }

    fn points(entries: &[(PointType, f64, f64)]) -> BTreeMap<PointType, Vec<Point>> {
        let mut map: BTreeMap<PointType, Vec<Point>> = BTreeMap::new();
        for &(t, x, y) in entries {
            map.entry(t).or_default().push(Point::new(x, y));
        }
        map
    }

    fn two_piece_truth() -> ExtremaResult {
        ExtremaResult {
            absolute_min: Some(vec![Point::new(0.0, 0.0)]),
            relative_max: Some(vec![Point::new(1.0, 1.0)]),
            ..Default::default()
        }
    }

    #[test]
    fn test_union_order_does_not_matter() {
        let verdict = validate(
            ExerciseKind::Domain,
            &domain_truth("[2,3) U (4,5]"),
            &UserAnswer::Interval("(4,5] U [2,3)".to_string()),
        )
        .unwrap();
        assert!(verdict.is_correct);
        assert!(verdict.wrong.is_empty() && verdict.missing.is_empty());
        assert_eq!(verdict.resume_state(), ResumeState::Success);
    }

    #[test]
    fn test_interval_marks() {
        let verdict = validate(
            ExerciseKind::Domain,
            &domain_truth("(-1, 1]"),
            &UserAnswer::Interval("[-1, 1)".to_string()),
        )
        .unwrap();
        assert!(!verdict.is_correct);
        assert_eq!(verdict.wrong, vec![Mark::X(-1.0)]);
        assert_eq!(verdict.missing, vec![Mark::X(1.0)]);
        assert_eq!(verdict.resume_state(), ResumeState::Error);
    }

    #[test]
    fn test_range_answer_outside_window_is_an_error() {
        let truth = DerivedTruth::Range {
            expression: "[0.0, +inf)".to_string(),
            window: Interval::closed(-5.0, 5.0).unwrap(),
        };
        let error = validate(ExerciseKind::Range, &truth, &UserAnswer::Interval("[0, 8]".to_string()))
            .unwrap_err();
        assert_eq!(error.kind(), ParseErrorKind::OutOfRange);
        let verdict = validate(ExerciseKind::Range, &truth, &UserAnswer::Interval("[0, +inf)".to_string()))
            .unwrap();
        assert!(verdict.is_correct);
    }

    #[test]
    fn test_boolean_answers() {
        let truth = DerivedTruth::HasInverse(true);
        assert!(validate(ExerciseKind::HasInverse, &truth, &UserAnswer::Boolean(true)).unwrap().is_correct);
        let verdict = validate(ExerciseKind::HasInverse, &truth, &UserAnswer::Boolean(false)).unwrap();
        assert!(!verdict.is_correct);
        assert!(verdict.wrong.is_empty());
        let bounded = DerivedTruth::IsBounded(false);
        assert!(validate(ExerciseKind::IsBounded, &bounded, &UserAnswer::Boolean(false)).unwrap().is_correct);
    }

    #[test]
    fn test_points_exact_answer() {
        let answer = UserAnswer::Points(points(&[
            (PointType::AbsoluteMin, 0.0, 0.0),
            (PointType::RelativeMax, 1.0, 1.0),
        ]));
        let verdict = validate(ExerciseKind::Extrema, &DerivedTruth::Extrema(two_piece_truth()), &answer).unwrap();
        assert!(verdict.is_correct);
    }

    #[test]
    fn test_points_wrong_and_missing() {
        // (1, 1) put in the wrong category, plus a coordinate that only differs after 2 decimals
        let answer = UserAnswer::Points(points(&[
            (PointType::AbsoluteMin, 0.001, 0.004),
            (PointType::AbsoluteMax, 1.0, 1.0),
        ]));
        let verdict = validate(ExerciseKind::Extrema, &DerivedTruth::Extrema(two_piece_truth()), &answer).unwrap();
        assert!(!verdict.is_correct);
        assert_eq!(
            verdict.wrong,
            vec![Mark::Point(PointType::AbsoluteMax, Point::new(1.0, 1.0))]
        );
        assert_eq!(
            verdict.missing,
            vec![Mark::Point(PointType::RelativeMax, Point::new(1.0, 1.0))]
        );
    }

    #[test]
    fn test_points_duplicates_are_ignored() {
        let answer = UserAnswer::Points(points(&[
            (PointType::AbsoluteMin, 0.0, 0.0),
            (PointType::AbsoluteMin, 0.0, 0.0),
            (PointType::RelativeMax, 1.0, 1.0),
        ]));
        let verdict = validate(ExerciseKind::Extrema, &DerivedTruth::Extrema(two_piece_truth()), &answer).unwrap();
        assert!(verdict.is_correct);
    }

    #[test]
    fn test_elementary_choice() {
        let truth = DerivedTruth::ElementaryFunction(Some(ElementaryFunction::Sine));
        let ok = validate(ExerciseKind::ElementaryFunction, &truth, &UserAnswer::Choice(" sine ".to_string()));
        assert!(ok.unwrap().is_correct);
        let wrong = validate(ExerciseKind::ElementaryFunction, &truth, &UserAnswer::Choice("cosine".to_string()));
        assert!(!wrong.unwrap().is_correct);
        let unknown = DerivedTruth::ElementaryFunction(None);
        let verdict = validate(ExerciseKind::ElementaryFunction, &unknown, &UserAnswer::Choice("bogus".to_string()));
        assert!(!verdict.unwrap().is_correct);
    }

    #[test]
    #[should_panic(expected = "validated against")]
    fn test_kind_mismatch_panics() {
        let _ = validate(ExerciseKind::Range, &DerivedTruth::HasInverse(true), &UserAnswer::Boolean(true));
    }

    #[test]
    #[should_panic(expected = "cannot check")]
    fn test_answer_shape_mismatch_panics() {
        let _ = validate(ExerciseKind::HasInverse, &DerivedTruth::HasInverse(true), &UserAnswer::Choice("yes".to_string()));
    }

    #[test]
    fn test_normalize_response() {
        assert_eq!(
            normalize_response(&UserAnswer::Interval("(4,5] u [2 , 3)".to_string())),
            "[2.0, 3.0) U (4.0, 5.0]"
        );
        assert_eq!(normalize_response(&UserAnswer::Interval(" (1, ".to_string())), "(1,");
        assert_eq!(normalize_response(&UserAnswer::Boolean(true)), "true");
        let answer = UserAnswer::Points(points(&[
            (PointType::RelativeMax, 1.0, 1.0),
            (PointType::AbsoluteMin, 0.5, 0.25),
            (PointType::AbsoluteMin, -2.0, 0.25),
        ]));
        assert_eq!(
            normalize_response(&answer),
            "relative_max: (1.0, 1.0); absolute_min: (-2.0, 0.25), (0.5, 0.25)"
        );
        assert_eq!(normalize_response(&UserAnswer::Choice("Sine ".to_string())), "sine");
        assert_eq!(normalize_response(&UserAnswer::Choice("parabola".to_string())), "parabola");
    }
}
