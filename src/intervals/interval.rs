//! Intervals over the extended reals and unions of them.
//!
//! An [`Interval`] keeps its bounds rounded to hundredths; `-inf`/`+inf` can only be excluded
//! bounds. An [`IntervalSet`] is a sorted union of pairwise disjoint intervals. Members that merely
//! touch (`[0, 1) U [1, 2]`) are kept apart: a piecewise domain shows one piece per declaration.
use crate::Utils::rounding::{float_repr, round2};
use crate::intervals::interval_parser::IntervalParseError;
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub lower_inclusive: bool,
    pub upper: f64,
    pub upper_inclusive: bool,
}

impl Interval {
    /// Builds an interval, rejecting inclusive infinities and inverted or empty bounds.
    /// `[a, a]` is a valid single-point interval, `(a, a)` is not. User text never yields one,
    /// see [`parse_interval_set`](crate::intervals::interval_parser::parse_interval_set).
    pub fn new(
        lower: f64,
        lower_inclusive: bool,
        upper: f64,
        upper_inclusive: bool,
    ) -> Result<Interval, IntervalParseError> {
        if (lower.is_infinite() && lower_inclusive) || (upper.is_infinite() && upper_inclusive) {
            let bound = if lower.is_infinite() && lower_inclusive { lower } else { upper };
            return Err(IntervalParseError::InclusiveInfinity { bound });
        }
        let lower = round2(lower);
        let upper = round2(upper);
        let valid = lower < upper || (lower == upper && lower_inclusive && upper_inclusive);
        if !valid {
            return Err(IntervalParseError::InvertedBounds { lower, upper });
        }
        Ok(Interval {
            lower,
            lower_inclusive,
            upper,
            upper_inclusive,
        })
    }

    pub fn closed(lower: f64, upper: f64) -> Result<Interval, IntervalParseError> {
        Interval::new(lower, true, upper, true)
    }

    pub fn open(lower: f64, upper: f64) -> Result<Interval, IntervalParseError> {
        Interval::new(lower, false, upper, false)
    }

    /// `(-inf, +inf)`
    pub fn real_line() -> Interval {
        Interval {
            lower: f64::NEG_INFINITY,
            lower_inclusive: false,
            upper: f64::INFINITY,
            upper_inclusive: false,
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        let above_lower = x > self.lower || (self.lower_inclusive && x == self.lower);
        let below_upper = x < self.upper || (self.upper_inclusive && x == self.upper);
        above_lower && below_upper
    }

    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper
    }

    pub fn is_bounded(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    pub fn unbounded_below(&self) -> bool {
        self.lower == f64::NEG_INFINITY
    }

    pub fn unbounded_above(&self) -> bool {
        self.upper == f64::INFINITY
    }

    /// the common part of two intervals, `None` when they are disjoint
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let (lower, lower_inclusive) = match self.lower.partial_cmp(&other.lower) {
            Some(Ordering::Greater) => (self.lower, self.lower_inclusive),
            Some(Ordering::Less) => (other.lower, other.lower_inclusive),
            _ => (self.lower, self.lower_inclusive && other.lower_inclusive),
        };
        let (upper, upper_inclusive) = match self.upper.partial_cmp(&other.upper) {
            Some(Ordering::Less) => (self.upper, self.upper_inclusive),
            Some(Ordering::Greater) => (other.upper, other.upper_inclusive),
            _ => (self.upper, self.upper_inclusive && other.upper_inclusive),
        };
        if lower < upper || (lower == upper && lower_inclusive && upper_inclusive) {
            Some(Interval {
                lower,
                lower_inclusive,
                upper,
                upper_inclusive,
            })
        } else {
            None
        }
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.intersect(other).is_some()
    }

    /// true when the intervals share an endpoint that only one of them (or neither) includes
    pub fn touches(&self, other: &Interval) -> bool {
        let meet = |left: &Interval, right: &Interval| {
            left.upper == right.lower && !(left.upper_inclusive && right.lower_inclusive)
        };
        meet(self, other) || meet(other, self)
    }

    /// smallest interval containing both
    pub fn hull(&self, other: &Interval) -> Interval {
        let (lower, lower_inclusive) = match self.lower.partial_cmp(&other.lower) {
            Some(Ordering::Less) => (self.lower, self.lower_inclusive),
            Some(Ordering::Greater) => (other.lower, other.lower_inclusive),
            _ => (self.lower, self.lower_inclusive || other.lower_inclusive),
        };
        let (upper, upper_inclusive) = match self.upper.partial_cmp(&other.upper) {
            Some(Ordering::Greater) => (self.upper, self.upper_inclusive),
            Some(Ordering::Less) => (other.upper, other.upper_inclusive),
            _ => (self.upper, self.upper_inclusive || other.upper_inclusive),
        };
        Interval {
            lower,
            lower_inclusive,
            upper,
            upper_inclusive,
        }
    }

    /// true if every point of `other` lies in `self`
    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.intersect(other).as_ref() == Some(other)
    }

    /// ordering used by sets: lower bound first, an included lower bound before an excluded one
    fn sort_key_cmp(&self, other: &Interval) -> Ordering {
        self.lower
            .partial_cmp(&other.lower)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.lower_inclusive.cmp(&self.lower_inclusive))
            .then_with(|| self.upper.partial_cmp(&other.upper).unwrap_or(Ordering::Equal))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.lower_inclusive { '[' } else { '(' },
            float_repr(self.lower),
            float_repr(self.upper),
            if self.upper_inclusive { ']' } else { ')' }
        )
    }
}

/// Sorted union of disjoint intervals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    /// Sorts the members and rejects any pair sharing a point.
    pub fn new(mut intervals: Vec<Interval>) -> Result<IntervalSet, IntervalParseError> {
        intervals.sort_by(|a, b| a.sort_key_cmp(b));
        if let Some((first, second)) = intervals
            .iter()
            .tuple_combinations()
            .find(|(a, b)| a.overlaps(b))
        {
            return Err(IntervalParseError::Overlapping {
                first: *first,
                second: *second,
            });
        }
        Ok(IntervalSet { intervals })
    }

    pub fn empty() -> IntervalSet {
        IntervalSet::default()
    }

    pub fn single(interval: Interval) -> IntervalSet {
        IntervalSet {
            intervals: vec![interval],
        }
    }

    /// Union of arbitrary intervals: overlapping members are merged, touching ones stay apart.
    pub fn from_union<I: IntoIterator<Item = Interval>>(intervals: I) -> IntervalSet {
        let mut all: Vec<Interval> = intervals.into_iter().collect();
        all.sort_by(|a, b| a.sort_key_cmp(b));
        let mut merged: Vec<Interval> = Vec::with_capacity(all.len());
        for interval in all {
            match merged.last_mut() {
                Some(last) if last.overlaps(&interval) => *last = last.hull(&interval),
                _ => merged.push(interval),
            }
        }
        IntervalSet { intervals: merged }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn contains(&self, x: f64) -> bool {
        self.intervals.iter().any(|i| i.contains(x))
    }

    pub fn union(&self, other: &IntervalSet) -> IntervalSet {
        IntervalSet::from_union(self.iter().chain(other.iter()).copied())
    }

    pub fn intersection(&self, other: &IntervalSet) -> IntervalSet {
        let parts = self
            .iter()
            .cartesian_product(other.iter())
            .filter_map(|(a, b)| a.intersect(b));
        IntervalSet::from_union(parts)
    }

    /// the same point set with touching members joined, used for set comparisons
    pub fn coalesced(&self) -> IntervalSet {
        let mut merged: Vec<Interval> = Vec::with_capacity(self.len());
        for interval in self.iter() {
            match merged.last_mut() {
                Some(last) if last.overlaps(interval) || last.touches(interval) => {
                    *last = last.hull(interval)
                }
                _ => merged.push(*interval),
            }
        }
        IntervalSet { intervals: merged }
    }

    pub fn is_subset_of(&self, other: &IntervalSet) -> bool {
        self.intersection(other).coalesced() == self.coalesced()
    }

    pub fn is_bounded(&self) -> bool {
        self.intervals.iter().all(|i| i.is_bounded())
    }

    /// restricts every member to `window`, dropping members outside of it
    pub fn clip_to(&self, window: &Interval) -> IntervalSet {
        IntervalSet {
            intervals: self.iter().filter_map(|i| i.intersect(window)).collect(),
        }
    }

    /// lowest bound and whether it is included
    pub fn lowest(&self) -> Option<(f64, bool)> {
        self.intervals.first().map(|i| (i.lower, i.lower_inclusive))
    }

    /// highest bound and whether it is included
    pub fn highest(&self) -> Option<(f64, bool)> {
        self.intervals
            .iter()
            .map(|i| (i.upper, i.upper_inclusive))
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
    }

    pub fn unbounded_below(&self) -> bool {
        self.intervals.iter().any(|i| i.unbounded_below())
    }

    pub fn unbounded_above(&self) -> bool {
        self.intervals.iter().any(|i| i.unbounded_above())
    }

    /// every finite bound of every member
    pub fn finite_bounds(&self) -> Vec<f64> {
        self.iter()
            .flat_map(|i| [i.lower, i.upper])
            .filter(|b| b.is_finite())
            .collect()
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.intervals.is_empty() {
            return write!(f, "{{}}");
        }
        write!(f, "{}", self.intervals.iter().join(" U "))
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;
    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
