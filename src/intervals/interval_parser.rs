//! Parser and formatter of the interval notation used in answers and domain declarations:
//! `(-inf, 8] U (10, +inf)`, `[2, 3) U (4, 5]`, `{}`.
//!
//! The surface grammar is tolerant (`- inf`, `inf`, `+ inf`, `U` or `u`, any whitespace); the
//! formatter always writes the canonical form, so `parse(format(s)) == s`.
use crate::intervals::interval::{Interval, IntervalSet};
use log::debug;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, multispace0},
    combinator::{map_res, opt, value},
    multi::separated_list1,
    number::complete::recognize_float,
    sequence::delimited,
};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// Short reason code of a parse failure, so the caller can pick a correction hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ParseErrorKind {
    Syntax,
    InvertedBounds,
    InclusiveInfinity,
    OutOfRange,
    Overlapping,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntervalParseError {
    /// the text does not follow the grammar; `position` is a byte offset
    Syntax { position: usize, message: String },
    InvertedBounds { lower: f64, upper: f64 },
    InclusiveInfinity { bound: f64 },
    OutOfRange { value: f64, containing: Interval },
    Overlapping { first: Interval, second: Interval },
}

impl IntervalParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            IntervalParseError::Syntax { .. } => ParseErrorKind::Syntax,
            IntervalParseError::InvertedBounds { .. } => ParseErrorKind::InvertedBounds,
            IntervalParseError::InclusiveInfinity { .. } => ParseErrorKind::InclusiveInfinity,
            IntervalParseError::OutOfRange { .. } => ParseErrorKind::OutOfRange,
            IntervalParseError::Overlapping { .. } => ParseErrorKind::Overlapping,
        }
    }
}

impl fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntervalParseError::Syntax { position, message } => {
                write!(f, "syntax error at position {}: {}", position, message)
            }
            IntervalParseError::InvertedBounds { lower, upper } => write!(
                f,
                "lower bound {} must be less than upper bound {}",
                lower, upper
            ),
            IntervalParseError::InclusiveInfinity { bound } => write!(
                f,
                "{} can not be an included bound, use a round bracket",
                bound
            ),
            IntervalParseError::OutOfRange { value, containing } => {
                write!(f, "bound {} lies outside {}", value, containing)
            }
            IntervalParseError::Overlapping { first, second } => {
                write!(f, "intervals {} and {} overlap", first, second)
            }
        }
    }
}

impl std::error::Error for IntervalParseError {}

/// interval as written, before any semantic check
#[derive(Debug, Clone, Copy, PartialEq)]
struct RawInterval {
    lower: f64,
    lower_inclusive: bool,
    upper: f64,
    upper_inclusive: bool,
}

/// `-inf`, `- inf`, `inf`, `+inf`, `+ inf`
fn infinity(input: &str) -> IResult<&str, f64> {
    alt((
        value(
            f64::NEG_INFINITY,
            (char('-'), multispace0, tag_no_case("inf")),
        ),
        value(
            f64::INFINITY,
            (opt((char('+'), multispace0)), tag_no_case("inf")),
        ),
    ))
    .parse(input)
}

/// a signed decimal; `double` is not used because it would also accept `nan` and `infinity`
fn finite(input: &str) -> IResult<&str, f64> {
    map_res(recognize_float, |s: &str| s.parse::<f64>()).parse(input)
}

fn bound(input: &str) -> IResult<&str, f64> {
    delimited(multispace0, alt((infinity, finite)), multispace0).parse(input)
}

fn raw_interval(input: &str) -> IResult<&str, RawInterval> {
    let (input, opening) = alt((char('('), char('['))).parse(input)?;
    let (input, lower) = bound(input)?;
    let (input, _) = char(',').parse(input)?;
    let (input, upper) = bound(input)?;
    let (input, closing) = alt((char(')'), char(']'))).parse(input)?;
    Ok((
        input,
        RawInterval {
            lower,
            lower_inclusive: opening == '[',
            upper,
            upper_inclusive: closing == ']',
        },
    ))
}

fn interval_list(input: &str) -> IResult<&str, Vec<RawInterval>> {
    let union_separator = delimited(
        multispace0,
        alt((char('U'), char('u'), char('∪'))),
        multispace0,
    );
    let empty_set = value(Vec::new(), (char('{'), multispace0, char('}')));
    delimited(
        multispace0,
        alt((empty_set, separated_list1(union_separator, raw_interval))),
        multispace0,
    )
    .parse(input)
}

fn syntax_error(text: &str, remaining: &str, message: &str) -> IntervalParseError {
    IntervalParseError::Syntax {
        position: text.len() - remaining.len(),
        message: message.to_string(),
    }
}

fn parse_raw(text: &str) -> Result<Vec<RawInterval>, IntervalParseError> {
    match interval_list(text) {
        Ok(("", raw)) => Ok(raw),
        Ok((remaining, _)) => Err(syntax_error(text, remaining, "unexpected trailing input")),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(syntax_error(
            text,
            e.input,
            "expected an interval like (a, b], [a, +inf) or {}",
        )),
        Err(nom::Err::Incomplete(_)) => Err(syntax_error(text, "", "unexpected end of input")),
    }
}

fn parse_set(text: &str, allow_points: bool) -> Result<IntervalSet, IntervalParseError> {
    let raw = parse_raw(text)?;
    let intervals = raw
        .into_iter()
        .map(|r| Interval::new(r.lower, r.lower_inclusive, r.upper, r.upper_inclusive))
        .collect::<Result<Vec<Interval>, IntervalParseError>>()?;
    if let Some(point) = intervals.iter().find(|i| i.is_degenerate() && !allow_points) {
        return Err(IntervalParseError::InvertedBounds {
            lower: point.lower,
            upper: point.upper,
        });
    }
    let set = IntervalSet::new(intervals)?;
    debug!("parsed interval set {:?} as {}", text, set);
    Ok(set)
}

/// Parses a union of intervals as a user writes it: every lower bound must lie strictly below
/// its upper bound, so `[2, 2]` is rejected like `(3, 2)`.
///
/// # Examples
/// ```rust, ignore
/// let set = parse_interval_set("(-inf, 8] U (10, +inf)").unwrap();
/// assert!(set.contains(8.0));
/// assert!(!set.contains(9.0));
/// ```
pub fn parse_interval_set(text: &str) -> Result<IntervalSet, IntervalParseError> {
    parse_set(text, false)
}

/// Parses a set the engine wrote itself. Single-point intervals are accepted here: the range of
/// a constant is `[2.0, 2.0]`.
pub fn parse_derived_set(text: &str) -> Result<IntervalSet, IntervalParseError> {
    parse_set(text, true)
}

/// Like [`parse_interval_set`], also rejecting finite bounds outside `containing`
/// (compared as a closed window).
pub fn parse_within(text: &str, containing: &Interval) -> Result<IntervalSet, IntervalParseError> {
    let set = parse_interval_set(text)?;
    if let Some(value) = set
        .finite_bounds()
        .into_iter()
        .find(|&b| b < containing.lower || b > containing.upper)
    {
        return Err(IntervalParseError::OutOfRange {
            value,
            containing: *containing,
        });
    }
    Ok(set)
}

/// Parses exactly one interval.
pub fn parse_interval(text: &str) -> Result<Interval, IntervalParseError> {
    let set = parse_interval_set(text)?;
    match set.intervals() {
        [single] => Ok(*single),
        _ => Err(IntervalParseError::Syntax {
            position: 0,
            message: format!("expected a single interval, found {}", set.len()),
        }),
    }
}

/// canonical text of a set, the inverse of [`parse_interval_set`]
pub fn format_interval_set(set: &IntervalSet) -> String {
    set.to_string()
}

impl FromStr for IntervalSet {
    type Err = IntervalParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_interval_set(s)
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_interval(s)
    }
}
