//! Domain, range, boundedness and inverse existence of exercise functions, plus the
//! membership-diff validation of interval answers.
//!
//! The domain is found by scanning definedness (not the display clamp) on the fine grid and
//! bisecting every place where the function switches between defined and undefined. The range
//! combines attained extremes with the values the function approaches at excluded ends and far
//! away, which is how open bounds and horizontal asymptotes show up.
use crate::Utils::rounding::{grid, round2};
use crate::function_analysis::config::AnalysisConfig;
use crate::function_analysis::function::Function;
use crate::function_analysis::sampler::{Sampler, piece_grid};
use crate::intervals::interval::{Interval, IntervalSet};
use crate::intervals::interval_parser::{IntervalParseError, parse_derived_set, parse_within};
use crate::symbolic::symbolic_traits::RealFunction;
use itertools::Itertools;
use log::{debug, info};
use std::collections::BTreeSet;

const BISECTION_ITERATIONS: usize = 60;
/// distances from an excluded bound at which an undefined end is probed
const INNER_PROBES: [f64; 2] = [1e-6, 1e-9];
/// |x| at which unbounded ends are probed
const FAR_FIELD_PROBES: [f64; 8] = [1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8];
const TIE_EPSILON: f64 = 1e-9;
/// |f| at a sign flip above which the flip is a pole rather than a zero crossing
const POLE_MAGNITUDE: f64 = 1e6;

/// `(is_correct, wrong, missing)`: wrong are probe values the user included although they are
/// not in the expected set, missing are expected values the user left out. ±inf stand for the
/// unbounded sides.
pub type MembershipDiff = (bool, Vec<f64>, Vec<f64>);

/// Last x reached from `defined` towards `undefined`, rounded to hundredths.
fn switch_point(function: &dyn RealFunction, defined: f64, undefined: f64) -> f64 {
    let (mut good, mut bad) = (defined, undefined);
    for _ in 0..BISECTION_ITERATIONS {
        let mid = 0.5 * (good + bad);
        if function.is_defined_at(mid) {
            good = mid;
        } else {
            bad = mid;
        }
    }
    round2(0.5 * (good + bad))
}

/// A pole between two defined samples of opposite sign: the flip is located by bisection and
/// kept when |f| blows up there. At a zero crossing |f| shrinks instead.
fn pole_between(function: &dyn RealFunction, a: f64, b: f64) -> Option<f64> {
    let (Ok(ya), Ok(yb)) = (function.evaluate(a), function.evaluate(b)) else {
        return None;
    };
    if ya == 0.0 || yb == 0.0 || ya.signum() == yb.signum() {
        return None;
    }
    let (mut left, mut right) = (a, b);
    for _ in 0..BISECTION_ITERATIONS {
        let mid = 0.5 * (left + right);
        match function.evaluate(mid) {
            Ok(y) if y.signum() == ya.signum() => left = mid,
            Ok(_) => right = mid,
            // a hole the grid stepped over
            Err(_) => return Some(round2(mid)),
        }
    }
    let near = [left, right]
        .into_iter()
        .filter_map(|x| function.evaluate(x).ok())
        .map(f64::abs)
        .fold(0.0, f64::max);
    (near > POLE_MAGNITUDE).then(|| round2(0.5 * (left + right)))
}

/// Intervals where one function is defined, inside its declared domain and plotting window.
pub fn function_domain(function: &Function, config: &AnalysisConfig) -> Vec<Interval> {
    let window = function.x_window();
    let mut intervals = Vec::new();
    for (declared, piece) in function.pieces() {
        let xs = piece_grid(&piece, config.extrema_step);
        let defined: Vec<bool> = xs.iter().map(|&x| function.is_defined_at(x)).collect();
        let mut index = 0;
        while index < xs.len() {
            if !defined[index] {
                index += 1;
                continue;
            }
            let start = index;
            while index + 1 < xs.len() && defined[index + 1] {
                index += 1;
            }
            let end = index;
            index += 1;

            let (lower, lower_inclusive) = if start == 0 {
                if declared.lower < window.lower {
                    (f64::NEG_INFINITY, false)
                } else {
                    (piece.lower, piece.lower_inclusive)
                }
            } else {
                let b = switch_point(function, xs[start], xs[start - 1]);
                (b, function.is_defined_at(b))
            };
            let (upper, upper_inclusive) = if end == xs.len() - 1 {
                if declared.upper > window.upper {
                    (f64::INFINITY, false)
                } else {
                    (piece.upper, piece.upper_inclusive)
                }
            } else {
                let b = switch_point(function, xs[end], xs[end + 1]);
                (b, function.is_defined_at(b))
            };
            let cuts: Vec<(f64, bool)> = (start..end)
                .filter_map(|i| pole_between(function, xs[i], xs[i + 1]))
                .map(|pole| (pole, false))
                .collect();
            if !cuts.is_empty() {
                debug!("{}: poles at {:?}", function.expression, cuts);
            }
            let lowers = std::iter::once((lower, lower_inclusive)).chain(cuts.iter().copied());
            let uppers = cuts.iter().copied().chain(std::iter::once((upper, upper_inclusive)));
            for ((lower, lower_inclusive), (upper, upper_inclusive)) in lowers.zip(uppers) {
                match Interval::new(lower, lower_inclusive, upper, upper_inclusive) {
                    Ok(interval) => intervals.push(interval),
                    Err(e) => debug!("{}: dropping defined run near x = {}: {}", function.expression, lower, e),
                }
            }
        }
    }
    intervals
}

/// Union of the domains of all functions of an exercise.
pub fn get_domain(functions: &[Function], config: &AnalysisConfig) -> IntervalSet {
    assert!(!functions.is_empty(), "domain requested for an empty function list");
    let domain = IntervalSet::from_union(functions.iter().flat_map(|f| function_domain(f, config)));
    info!("domain of {} function(s): {}", functions.len(), domain);
    domain
}

pub fn get_domain_expression(functions: &[Function], config: &AnalysisConfig) -> String {
    get_domain(functions, config).to_string()
}

/// What the function does towards an excluded or unbounded end.
#[derive(Debug, Clone, Copy, PartialEq)]
enum EndBehaviour {
    /// tends to a finite value that is not attained at the end itself
    Approaches(f64),
    /// leaves the y window upwards and/or downwards
    Escapes { above: bool, below: bool },
    Unknown,
}

fn escapes(values: &[f64], window: &Interval) -> EndBehaviour {
    let above = values.iter().any(|&v| v > window.upper);
    let below = values.iter().any(|&v| v < window.lower);
    if above || below {
        EndBehaviour::Escapes { above, below }
    } else {
        EndBehaviour::Unknown
    }
}

/// behaviour at an excluded finite bound, `inward` is +1 at a lower bound and -1 at an upper one
fn approach_excluded_bound(
    function: &dyn RealFunction,
    bound: f64,
    inward: f64,
    window: &Interval,
    epsilon: f64,
) -> EndBehaviour {
    if let Ok(value) = function.evaluate(bound) {
        return EndBehaviour::Approaches(value);
    }
    let values: Vec<f64> = INNER_PROBES
        .iter()
        .filter_map(|d| function.evaluate(bound + inward * d).ok())
        .collect();
    match escapes(&values, window) {
        EndBehaviour::Unknown => match values.as_slice() {
            [v1, v2] if (v1 - v2).abs() < epsilon => EndBehaviour::Approaches(*v2),
            _ => EndBehaviour::Unknown,
        },
        escaping => escaping,
    }
}

/// behaviour towards -inf (`direction` = -1) or +inf (`direction` = 1)
fn far_field(
    function: &dyn RealFunction,
    direction: f64,
    window: &Interval,
    epsilon: f64,
) -> EndBehaviour {
    let values: Vec<Option<f64>> = FAR_FIELD_PROBES
        .iter()
        .map(|x| function.evaluate(direction * x).ok())
        .collect();
    if let [.., Some(previous), Some(last)] = values.as_slice() {
        if (last - previous).abs() < epsilon {
            return EndBehaviour::Approaches(*last);
        }
    }
    let defined: Vec<f64> = values.into_iter().flatten().collect();
    escapes(&defined, window)
}

/// a range bound candidate: value and whether it is attained
type Candidate = (f64, bool);

fn pick_lowest(candidates: &[Candidate]) -> Option<Candidate> {
    candidates.iter().copied().reduce(|best, c| {
        if c.0 < best.0 - TIE_EPSILON {
            c
        } else if (c.0 - best.0).abs() <= TIE_EPSILON {
            (best.0.min(c.0), best.1 || c.1)
        } else {
            best
        }
    })
}

fn pick_highest(candidates: &[Candidate]) -> Option<Candidate> {
    candidates.iter().copied().reduce(|best, c| {
        if c.0 > best.0 + TIE_EPSILON {
            c
        } else if (c.0 - best.0).abs() <= TIE_EPSILON {
            (best.0.max(c.0), best.1 || c.1)
        } else {
            best
        }
    })
}

/// Range of one function over one defined interval.
fn piece_range(
    function: &Function,
    defined: &Interval,
    window: &Interval,
    config: &AnalysisConfig,
) -> Option<Interval> {
    let scan = defined.intersect(&function.x_window())?;
    let attained: Vec<f64> = piece_grid(&scan, config.extrema_step)
        .into_iter()
        .filter_map(|x| function.evaluate(x).ok())
        .collect();
    let mut candidates: Vec<Candidate> = Vec::new();
    if let Some(min) = attained.iter().copied().reduce(f64::min) {
        candidates.push((min, true));
    }
    if let Some(max) = attained.iter().copied().reduce(f64::max) {
        candidates.push((max, true));
    }

    let mut ends = Vec::with_capacity(2);
    if defined.unbounded_below() {
        ends.push(far_field(function, -1.0, window, config.asymptote_epsilon));
    } else if !defined.lower_inclusive {
        ends.push(approach_excluded_bound(
            function,
            defined.lower,
            1.0,
            window,
            config.asymptote_epsilon,
        ));
    }
    if defined.unbounded_above() {
        ends.push(far_field(function, 1.0, window, config.asymptote_epsilon));
    } else if !defined.upper_inclusive {
        ends.push(approach_excluded_bound(
            function,
            defined.upper,
            -1.0,
            window,
            config.asymptote_epsilon,
        ));
    }

    let (mut unbounded_above, mut unbounded_below) = (false, false);
    for end in ends {
        match end {
            EndBehaviour::Approaches(value) => candidates.push((value, false)),
            EndBehaviour::Escapes { above, below } => {
                unbounded_above |= above;
                unbounded_below |= below;
            }
            EndBehaviour::Unknown => {}
        }
    }

    let (mut lower, mut lower_inclusive) = pick_lowest(&candidates)?;
    let (mut upper, mut upper_inclusive) = pick_highest(&candidates)?;
    if unbounded_below || lower < window.lower {
        (lower, lower_inclusive) = (f64::NEG_INFINITY, false);
    }
    if unbounded_above || upper > window.upper {
        (upper, upper_inclusive) = (f64::INFINITY, false);
    }
    match Interval::new(lower, lower_inclusive, upper, upper_inclusive) {
        Ok(interval) => Some(interval),
        Err(e) => {
            debug!("{}: no range on {}: {}", function.expression, defined, e);
            None
        }
    }
}

/// Union of the ranges of all functions; bounds beyond `containing` become infinite.
pub fn get_range(functions: &[Function], containing: &Interval, config: &AnalysisConfig) -> IntervalSet {
    assert!(!functions.is_empty(), "range requested for an empty function list");
    let pieces = functions.iter().flat_map(|function| {
        function_domain(function, config)
            .into_iter()
            .filter_map(move |defined| piece_range(function, &defined, containing, config))
    });
    let range = IntervalSet::from_union(pieces);
    info!("range of {} function(s): {}", functions.len(), range);
    range
}

pub fn get_range_expression(
    functions: &[Function],
    containing: &Interval,
    config: &AnalysisConfig,
) -> String {
    get_range(functions, containing, config).to_string()
}

pub fn is_bounded(functions: &[Function], config: &AnalysisConfig) -> bool {
    get_range(functions, &config.range_window(), config).is_bounded()
}

/// Horizontal-line test on the displayed curve: every run strictly monotone and no two runs
/// sharing a y value.
pub fn has_inverse(functions: &[Function], sampler: &mut Sampler, config: &AnalysisConfig) -> bool {
    assert!(!functions.is_empty(), "inverse requested for an empty function list");
    let curves = sampler.sample_all(functions, config.display_step, config.max_y);
    let runs: Vec<&Vec<_>> = curves.iter().flat_map(|c| c.runs.iter()).collect();
    let monotone = runs.iter().all(|run| {
        run.iter().tuple_windows().all(|(a, b)| b.y > a.y)
            || run.iter().tuple_windows().all(|(a, b)| b.y < a.y)
    });
    if !monotone {
        debug!("has_inverse: a run is not strictly monotone");
        return false;
    }
    let spans: Vec<(f64, f64)> = runs
        .iter()
        .filter_map(|run| {
            let ys = run.iter().map(|p| p.y);
            let min = ys.clone().reduce(f64::min)?;
            let max = ys.reduce(f64::max)?;
            Some((min, max))
        })
        .collect();
    spans
        .iter()
        .tuple_combinations()
        .all(|(a, b)| a.1 < b.0 || b.1 < a.0)
}

/// A membership probe in hundredths. The unbounded sides have their own variants, so a huge
/// finite bound is never taken for infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Probe {
    BelowAll,
    At(i128),
    AboveAll,
}

impl Probe {
    fn key(x: f64) -> i128 {
        (x * 100.0).round() as i128
    }

    fn value(self) -> f64 {
        match self {
            Probe::BelowAll => f64::NEG_INFINITY,
            Probe::At(key) => round2(key as f64 / 100.0),
            Probe::AboveAll => f64::INFINITY,
        }
    }

    fn is_member(self, set: &IntervalSet) -> bool {
        match self {
            Probe::BelowAll => set.unbounded_below(),
            Probe::At(_) => set.contains(self.value()),
            Probe::AboveAll => set.unbounded_above(),
        }
    }
}

/// Compares two sets on a grid over `window`, on every finite bound of both sets, on the midpoints
/// between consecutive bounds and at ±inf.
pub fn membership_diff(
    expected: &IntervalSet,
    user: &IntervalSet,
    window: &Interval,
    step: f64,
) -> MembershipDiff {
    let mut probes: BTreeSet<Probe> = BTreeSet::new();
    if window.is_bounded() {
        probes.extend(
            grid(window.lower, window.upper, step)
                .into_iter()
                .map(|x| Probe::At(Probe::key(x))),
        );
    }
    let bounds: BTreeSet<i128> = expected
        .finite_bounds()
        .into_iter()
        .chain(user.finite_bounds())
        .map(Probe::key)
        .collect();
    for (a, b) in bounds.iter().tuple_windows() {
        match b.checked_sub(*a) {
            Some(gap) if gap >= 2 => {
                probes.insert(Probe::At(a + gap / 2));
            }
            _ => {}
        }
    }
    probes.extend(bounds.into_iter().map(Probe::At));
    probes.insert(Probe::BelowAll);
    probes.insert(Probe::AboveAll);

    let mut wrong = Vec::new();
    let mut missing = Vec::new();
    for probe in probes {
        match (probe.is_member(expected), probe.is_member(user)) {
            (false, true) => wrong.push(probe.value()),
            (true, false) => missing.push(probe.value()),
            _ => {}
        }
    }
    (wrong.is_empty() && missing.is_empty(), wrong, missing)
}

/// Parses both texts and diffs them. The expected text comes from the engine and may hold single
/// points; the answer is user text and must stay inside `window`.
fn validate_interval_expression(
    expected: &str,
    user_text: &str,
    window: &Interval,
    step: f64,
) -> Result<MembershipDiff, IntervalParseError> {
    let expected = parse_derived_set(expected)?;
    let user = parse_within(user_text, window)?;
    let diff = membership_diff(&expected, &user, window, step);
    debug!(
        "expected {} answered {}: correct = {}, wrong = {:?}, missing = {:?}",
        expected, user, diff.0, diff.1, diff.2
    );
    Ok(diff)
}

pub fn validate_domain_expression(
    expected: &str,
    user_text: &str,
    window: &Interval,
    step: f64,
) -> Result<MembershipDiff, IntervalParseError> {
    validate_interval_expression(expected, user_text, window, step)
}

pub fn validate_range_expression(
    expected: &str,
    user_text: &str,
    window: &Interval,
    step: f64,
) -> Result<MembershipDiff, IntervalParseError> {
    validate_interval_expression(expected, user_text, window, step)
}
