//! Interval algebra and the interval notation mini-language.
/// Interval and IntervalSet: bounds, membership, union, intersection, subset
/// # Example
/// ```
/// use RustedGraphTutor::intervals::interval::{Interval, IntervalSet};
/// let a = IntervalSet::single(Interval::new(0.0, true, 2.0, false).unwrap());
/// let b = IntervalSet::single(Interval::new(1.0, true, 3.0, true).unwrap());
/// assert_eq!(a.union(&b).to_string(), "[0.0, 3.0]");
/// ```
pub mod interval;
/// nom parser of `(-inf, 8] U (10, +inf)` style text, formatter and parse errors
/// # Example
/// ```
/// use RustedGraphTutor::intervals::interval_parser::{parse_interval_set, ParseErrorKind};
/// let set = parse_interval_set("[2,3) U (4,5]").unwrap();
/// assert_eq!(set.to_string(), "[2.0, 3.0) U (4.0, 5.0]");
/// let err = parse_interval_set("[-inf, 3)").unwrap_err();
/// assert_eq!(err.kind(), ParseErrorKind::InclusiveInfinity);
/// ```
pub mod interval_parser;
