//! Discretisation of functions into plottable point runs, memoized per session.
//!
//! Each declared domain interval (clipped to the plotting window) is walked on the grid
//! `round(start + i*step, 2)`. A run ends where the function is undefined, where |y| exceeds
//! `max_y`, and at the end of every domain interval, so touching pieces never share a run.
use crate::Utils::rounding::{float_repr, grid, hundredths, trunc2};
use crate::function_analysis::function::Function;
use crate::intervals::interval::Interval;
use crate::symbolic::symbolic_traits::RealFunction;
use log::{debug, info};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A graph point; `is_included` tells a closed circle from an open one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub is_included: bool,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point {
            x,
            y,
            is_included: true,
        }
    }

    pub fn excluded(x: f64, y: f64) -> Point {
        Point {
            x,
            y,
            is_included: false,
        }
    }

    /// both coordinates truncated to 2 decimals
    pub fn truncated(&self) -> Point {
        Point {
            x: trunc2(self.x),
            y: trunc2(self.y),
            is_included: self.is_included,
        }
    }

    /// coordinates in hundredths, after truncation; the identity used when comparing answers
    pub fn key(&self) -> (i64, i64) {
        let p = self.truncated();
        (hundredths(p.x), hundredths(p.y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", float_repr(self.x), float_repr(self.y))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampledCurve {
    /// contiguous runs, x strictly increasing within a run
    pub runs: Vec<Vec<Point>>,
    /// values at excluded finite domain bounds, drawn as open circles
    pub open_endpoints: Vec<Point>,
}

impl SampledCurve {
    pub fn point_count(&self) -> usize {
        self.runs.iter().map(|r| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.runs.iter().flatten()
    }
}

/// Grid points of one clipped domain interval: excluded bounds are skipped, an included upper
/// bound that falls off the grid is appended.
pub fn piece_grid(piece: &Interval, step: f64) -> Vec<f64> {
    let mut xs: Vec<f64> = grid(piece.lower, piece.upper, step)
        .into_iter()
        .filter(|&x| piece.contains(x))
        .collect();
    if piece.upper_inclusive && xs.last().is_none_or(|&last| last < piece.upper) {
        xs.push(piece.upper);
    }
    xs
}

/// Samples any [`RealFunction`] over finite `pieces`.
pub fn sample_function(
    function: &dyn RealFunction,
    pieces: &[Interval],
    step: f64,
    max_y: f64,
) -> SampledCurve {
    let mut curve = SampledCurve::default();
    for piece in pieces {
        let mut run: Vec<Point> = Vec::new();
        for x in piece_grid(piece, step) {
            match function.evaluate(x) {
                Ok(y) if y.abs() <= max_y => run.push(Point::new(x, y)),
                _ => {
                    if !run.is_empty() {
                        curve.runs.push(std::mem::take(&mut run));
                    }
                }
            }
        }
        if !run.is_empty() {
            curve.runs.push(run);
        }
        let excluded_bounds = [
            (piece.lower, !piece.lower_inclusive),
            (piece.upper, !piece.upper_inclusive),
        ];
        for (bound, excluded) in excluded_bounds {
            if !excluded {
                continue;
            }
            if let Ok(y) = function.evaluate(bound) {
                if y.abs() <= max_y {
                    curve.open_endpoints.push(Point::excluded(bound, y));
                }
            }
        }
    }
    debug!(
        "sampled {} with step {}: {} runs, {} points",
        function.name(),
        step,
        curve.runs.len(),
        curve.point_count()
    );
    curve
}

fn clipped_pieces(function: &Function) -> Vec<Interval> {
    function.pieces().into_iter().map(|(_, clipped)| clipped).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SampleKey {
    expression: String,
    domain: String,
    x_range: (u64, u64),
    step: u64,
    max_y: u64,
}

impl SampleKey {
    fn new(function: &Function, step: f64, max_y: f64) -> SampleKey {
        SampleKey {
            expression: function.expr.to_string(),
            domain: function.domain.to_string(),
            x_range: (function.x_range.0.to_bits(), function.x_range.1.to_bits()),
            step: step.to_bits(),
            max_y: max_y.to_bits(),
        }
    }
}

/// Memo of sampled curves. Owned by a session and handed around explicitly; identical requests
/// return the very same `Arc`.
#[derive(Debug, Default)]
pub struct Sampler {
    cache: HashMap<SampleKey, Arc<SampledCurve>>,
    hits: usize,
    misses: usize,
}

impl Sampler {
    pub fn new() -> Sampler {
        Sampler::default()
    }

    pub fn sample(&mut self, function: &Function, step: f64, max_y: f64) -> Arc<SampledCurve> {
        let key = SampleKey::new(function, step, max_y);
        if let Some(curve) = self.cache.get(&key) {
            self.hits += 1;
            return Arc::clone(curve);
        }
        self.misses += 1;
        let curve = Arc::new(sample_function(function, &clipped_pieces(function), step, max_y));
        self.cache.insert(key, Arc::clone(&curve));
        curve
    }

    /// Samples several functions, computing the ones not cached yet in parallel.
    pub fn sample_all(
        &mut self,
        functions: &[Function],
        step: f64,
        max_y: f64,
    ) -> Vec<Arc<SampledCurve>> {
        let keys: Vec<SampleKey> = functions
            .iter()
            .map(|f| SampleKey::new(f, step, max_y))
            .collect();
        let mut pending: Vec<(&SampleKey, &Function)> = Vec::new();
        for (key, function) in keys.iter().zip(functions) {
            if self.cache.contains_key(key) || pending.iter().any(|(k, _)| *k == key) {
                self.hits += 1;
            } else {
                pending.push((key, function));
            }
        }
        let computed: Vec<(SampleKey, SampledCurve)> = pending
            .par_iter()
            .map(|(key, function)| {
                let curve = sample_function(*function, &clipped_pieces(function), step, max_y);
                ((*key).clone(), curve)
            })
            .collect();
        if !computed.is_empty() {
            info!("sampled {} new curves with step {}", computed.len(), step);
        }
        self.misses += computed.len();
        for (key, curve) in computed {
            self.cache.insert(key, Arc::new(curve));
        }
        keys.iter().map(|k| Arc::clone(&self.cache[k])).collect()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
