//! Local and absolute extrema of a (possibly piecewise) function from its fine samples.
//!
//! All pieces are merged into one sequence ordered by x, together with the open circles at
//! excluded bounds and any explicit points supplied by the exercise. At a jump the open circle
//! stays on the side of its own piece, so `[0, 1)` ends on its open value and `[1, 2]` starts on
//! its closed one. A chain is a stretch of the sequence without gaps; inside a chain a plateau
//! (run of equal y) is one candidate. A plateau edge without a neighbour only counts when it sits
//! on a closed end of the computed domain, so the edges of the plotting window never produce
//! extrema. Open circles take part in comparisons but are never reported.
use crate::Utils::rounding::{hundredths, round2};
use crate::function_analysis::config::AnalysisConfig;
use crate::function_analysis::domain_range::function_domain;
use crate::function_analysis::function::Function;
use crate::function_analysis::sampler::{Point, Sampler};
use log::{debug, info};
use std::collections::{BTreeMap, HashSet};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

const PLATEAU_EPSILON: f64 = 1e-9;
/// consecutive samples further apart than this many steps belong to different chains
const CHAIN_GAP: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PointType {
    AbsoluteMax,
    RelativeMax,
    AbsoluteMin,
    RelativeMin,
}

/// `None` in a category means it does not apply to the exercise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtremaResult {
    pub absolute_max: Option<Vec<Point>>,
    pub relative_max: Option<Vec<Point>>,
    pub absolute_min: Option<Vec<Point>>,
    pub relative_min: Option<Vec<Point>>,
}

impl ExtremaResult {
    pub fn get(&self, point_type: PointType) -> Option<&Vec<Point>> {
        match point_type {
            PointType::AbsoluteMax => self.absolute_max.as_ref(),
            PointType::RelativeMax => self.relative_max.as_ref(),
            PointType::AbsoluteMin => self.absolute_min.as_ref(),
            PointType::RelativeMin => self.relative_min.as_ref(),
        }
    }

    fn slot(&mut self, point_type: PointType) -> &mut Option<Vec<Point>> {
        match point_type {
            PointType::AbsoluteMax => &mut self.absolute_max,
            PointType::RelativeMax => &mut self.relative_max,
            PointType::AbsoluteMin => &mut self.absolute_min,
            PointType::RelativeMin => &mut self.relative_min,
        }
    }

    pub fn push(&mut self, point_type: PointType, point: Point) {
        self.slot(point_type).get_or_insert_with(Vec::new).push(point);
    }

    /// every category with its points, in `PointType` order
    pub fn iter(&self) -> impl Iterator<Item = (PointType, Option<&Vec<Point>>)> + '_ {
        PointType::iter().map(move |t| (t, self.get(t)))
    }

    pub fn is_empty(&self) -> bool {
        PointType::iter().all(|t| self.get(t).is_none())
    }
}

/// Where a node sits relative to its x: the open end of a piece approached from the left comes
/// before the points at x, the open start of a piece continuing to the right after them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Side {
    Before,
    At,
    After,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    x: f64,
    y: f64,
    included: bool,
    /// a domain boundary: closed domain end, open endpoint or explicit point
    boundary: bool,
}

type NodeKey = (i64, Side);

fn insert_node(nodes: &mut BTreeMap<NodeKey, Node>, side: Side, node: Node) {
    nodes
        .entry((hundredths(node.x), side))
        .and_modify(|existing| {
            let boundary = existing.boundary || node.boundary;
            if node.included && !existing.included {
                *existing = node;
            }
            existing.boundary = boundary;
        })
        .or_insert(node);
}

/// x keys where the computed domain of `function` starts or ends with a closed circle
fn closed_domain_ends(function: &Function, config: &AnalysisConfig) -> HashSet<i64> {
    function_domain(function, config)
        .iter()
        .flat_map(|i| [(i.lower, i.lower_inclusive), (i.upper, i.upper_inclusive)])
        .filter(|&(bound, included)| included && bound.is_finite())
        .map(|(bound, _)| hundredths(bound))
        .collect()
}

/// split the ordered nodes wherever the x gap is larger than the sampling allows
fn chains(nodes: &BTreeMap<NodeKey, Node>, step: f64) -> Vec<Vec<Node>> {
    let mut chains: Vec<Vec<Node>> = Vec::new();
    for node in nodes.values() {
        let previous = chains.last_mut().filter(|chain| {
            chain
                .last()
                .is_some_and(|last| node.x - last.x <= CHAIN_GAP * step)
        });
        match previous {
            Some(chain) => chain.push(*node),
            None => chains.push(vec![*node]),
        }
    }
    chains
}

/// Classifies the plateaus of every chain. Returns (is_max, is_min, y, included members).
fn candidates(chain: &[Node]) -> Vec<(bool, bool, f64, Vec<Node>)> {
    let mut found = Vec::new();
    let mut start = 0;
    while start < chain.len() {
        let y = chain[start].y;
        let mut end = start;
        while end + 1 < chain.len() && (chain[end + 1].y - y).abs() <= PLATEAU_EPSILON {
            end += 1;
        }
        let members: Vec<Node> = chain[start..=end].iter().copied().filter(|n| n.included).collect();
        if !members.is_empty() {
            let (left_max, left_min) = match start.checked_sub(1).map(|i| chain[i].y) {
                Some(neighbour) => (neighbour < y, neighbour > y),
                None => (chain[start].boundary, chain[start].boundary),
            };
            let (right_max, right_min) = match chain.get(end + 1).map(|n| n.y) {
                Some(neighbour) => (neighbour < y, neighbour > y),
                None => (chain[end].boundary, chain[end].boundary),
            };
            let is_max = left_max && right_max;
            let is_min = left_min && right_min;
            if is_max || is_min {
                found.push((is_max, is_min, y, members));
            }
        }
        start = end + 1;
    }
    found
}

/// Extrema of the functions of one exercise.
///
/// `explicit_points` are points the sampler cannot produce, typically a closed circle at a jump.
/// Panics on an empty function list.
pub fn get_extrema(
    functions: &[Function],
    explicit_points: &[Point],
    sampler: &mut Sampler,
    config: &AnalysisConfig,
) -> ExtremaResult {
    assert!(!functions.is_empty(), "extrema requested for an empty function list");
    let step = config.extrema_step;
    let curves = sampler.sample_all(functions, step, config.max_y);

    let mut nodes: BTreeMap<NodeKey, Node> = BTreeMap::new();
    for (function, curve) in functions.iter().zip(&curves) {
        let closed = closed_domain_ends(function, config);
        for point in curve.points() {
            insert_node(
                &mut nodes,
                Side::At,
                Node {
                    x: point.x,
                    y: point.y,
                    included: true,
                    boundary: closed.contains(&hundredths(point.x)),
                },
            );
        }
        for (_, piece) in function.pieces() {
            let excluded_ends = [
                (piece.lower, !piece.lower_inclusive, Side::After),
                (piece.upper, !piece.upper_inclusive, Side::Before),
            ];
            for (bound, excluded, side) in excluded_ends {
                if !excluded {
                    continue;
                }
                // absent when the value at the bound is undefined or off the display
                let Some(open) = curve
                    .open_endpoints
                    .iter()
                    .find(|p| hundredths(p.x) == hundredths(bound))
                else {
                    continue;
                };
                insert_node(
                    &mut nodes,
                    side,
                    Node {
                        x: open.x,
                        y: open.y,
                        included: false,
                        boundary: true,
                    },
                );
            }
        }
    }
    for point in explicit_points {
        insert_node(
            &mut nodes,
            Side::At,
            Node {
                x: point.x,
                y: point.y,
                included: point.is_included,
                boundary: true,
            },
        );
    }

    let included_ys = nodes.values().filter(|n| n.included).map(|n| n.y);
    let highest = included_ys.clone().reduce(f64::max);
    let lowest = included_ys.reduce(f64::min);
    let (Some(highest), Some(lowest)) = (highest, lowest) else {
        info!("no attained points, no extrema");
        return ExtremaResult::default();
    };

    let mut result = ExtremaResult::default();
    for chain in chains(&nodes, step) {
        for (is_max, is_min, y, members) in candidates(&chain) {
            let mut report = |point_type: PointType| {
                for node in &members {
                    result.push(point_type, Point::new(node.x, node.y).truncated());
                }
            };
            if is_max {
                report(if round2(y) == round2(highest) {
                    PointType::AbsoluteMax
                } else {
                    PointType::RelativeMax
                });
            }
            if is_min {
                report(if round2(y) == round2(lowest) {
                    PointType::AbsoluteMin
                } else {
                    PointType::RelativeMin
                });
            }
        }
    }
    for (point_type, points) in result.iter() {
        debug!("{}: {:?}", point_type, points.map(|p| p.len()));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(expression: &str, domain: &str) -> Function {
        Function::new(expression, domain, (-5.0, 5.0), true).unwrap()
    }

    fn extrema(functions: &[Function], explicit: &[Point]) -> ExtremaResult {
        get_extrema(functions, explicit, &mut Sampler::new(), &AnalysisConfig::default())
    }

    #[test]
    fn test_point_type_names() {
        let names: Vec<String> = PointType::iter().map(|t| t.to_string()).collect();
        assert_eq!(names, vec!["absolute_max", "relative_max", "absolute_min", "relative_min"]);
        assert_eq!("relative_min".parse::<PointType>().unwrap(), PointType::RelativeMin);
    }

    #[test]
    fn test_monotone_piece_has_only_closed_end() {
        let result = extrema(&[f("x", "(-1, 1]")], &[]);
        assert_eq!(result.absolute_max, Some(vec![Point::new(1.0, 1.0)]));
        assert_eq!(result.relative_max, None);
        assert_eq!(result.absolute_min, None);
        assert_eq!(result.relative_min, None);
    }

    #[test]
    fn test_shared_boundary_point() {
        let result = extrema(&[f("(x)**2", "(-3,0)"), f("x", "[0,1]")], &[]);
        assert_eq!(result.absolute_min, Some(vec![Point::new(0.0, 0.0)]));
        assert_eq!(result.relative_max, Some(vec![Point::new(1.0, 1.0)]));
        assert_eq!(result.absolute_max, None);
        assert_eq!(result.relative_min, None);
    }

    #[test]
    fn test_constant_is_both_absolute_max_and_min() {
        let result = extrema(&[f("2", "(-1, 0]")], &[]);
        let max = result.absolute_max.as_ref().unwrap();
        let min = result.absolute_min.as_ref().unwrap();
        assert_eq!(max.len(), 100);
        assert_eq!(max, min);
        assert_eq!(max[0], Point::new(-0.99, 2.0));
        assert_eq!(*max.last().unwrap(), Point::new(0.0, 2.0));
        assert_eq!(result.relative_max, None);
        assert_eq!(result.relative_min, None);
    }

    #[test]
    fn test_interior_extrema_of_cubic() {
        // x**3 - 3x has a local max at (-1, 2) and a local min at (1, -2)
        let result = extrema(&[f("x**3 - 3*x", "[-2, 2.5]")], &[]);
        assert_eq!(result.relative_max, Some(vec![Point::new(-1.0, 2.0)]));
        // (-2, -2) ties with the interior minimum
        assert_eq!(
            result.absolute_min,
            Some(vec![Point::new(-2.0, -2.0), Point::new(1.0, -2.0)])
        );
        // f(2.5) = 8.125 is clamped away, so the right end does not count
        assert_eq!(result.absolute_max, None);
    }

    #[test]
    fn test_single_peak_between_closed_ends() {
        let result = extrema(&[f("sin(x)", "[-4, 4]")], &[]);
        // one peak at pi/2 inside [-4, 4]; the closed end at -4 is only a relative max
        assert_eq!(result.absolute_max, Some(vec![Point::new(1.57, 0.99)]));
        let min = result.absolute_min.unwrap();
        assert!(min.iter().any(|p| p.x == -1.57 && p.y == -0.99));
        assert_eq!(result.relative_max, Some(vec![Point::new(-4.0, 0.75)]));
        assert_eq!(result.relative_min, Some(vec![Point::new(4.0, -0.75)]));
    }

    #[test]
    fn test_repeated_peaks_are_all_absolute() {
        // sin peaks at -3pi/2 and pi/2 inside [-5, 5], both at the global maximum
        let result = extrema(&[f("sin(x)", "[-5, 5]")], &[]);
        assert_eq!(
            result.absolute_max,
            Some(vec![Point::new(-4.71, 0.99), Point::new(1.57, 0.99)])
        );
        assert_eq!(
            result.absolute_min,
            Some(vec![Point::new(-1.57, -0.99), Point::new(4.71, -0.99)])
        );
        assert_eq!(result.relative_max, Some(vec![Point::new(5.0, -0.95)]));
        assert_eq!(result.relative_min, Some(vec![Point::new(-5.0, 0.95)]));
    }

    #[test]
    fn test_equal_peaks_on_separate_pieces() {
        let result = extrema(&[f("1 - (x + 2)**2", "[-3, -1]"), f("1 - (x - 2)**2", "[1, 3]")], &[]);
        assert_eq!(
            result.absolute_max,
            Some(vec![Point::new(-2.0, 1.0), Point::new(2.0, 1.0)])
        );
        assert_eq!(
            result.absolute_min,
            Some(vec![
                Point::new(-3.0, 0.0),
                Point::new(-1.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(3.0, 0.0)
            ])
        );
        assert_eq!(result.relative_max, None);
        assert_eq!(result.relative_min, None);
    }

    #[test]
    fn test_open_end_of_a_jump_is_not_attained() {
        // x + 2 on [0, 1) climbs towards 3 without reaching it, x on [1, 2] restarts at 1
        let result = extrema(&[f("x + 2", "[0, 1)"), f("x", "[1, 2]")], &[]);
        assert_eq!(result.absolute_max, None);
        assert_eq!(result.relative_max, Some(vec![Point::new(2.0, 2.0)]));
        assert_eq!(result.absolute_min, Some(vec![Point::new(1.0, 1.0)]));
        assert_eq!(result.relative_min, Some(vec![Point::new(0.0, 2.0)]));
    }

    #[test]
    fn test_computed_domain_ends_are_boundaries() {
        // the declared domain is the whole line, the closed ends -2 and 2 come from the analyzer
        let result = extrema(&[f("sqrt(4 - x**2)", "(-inf, +inf)")], &[]);
        assert_eq!(
            result.absolute_min,
            Some(vec![Point::new(-2.0, 0.0), Point::new(2.0, 0.0)])
        );
        assert_eq!(result.absolute_max, Some(vec![Point::new(0.0, 2.0)]));
        assert_eq!(result.relative_max, None);
        assert_eq!(result.relative_min, None);
    }

    #[test]
    fn test_window_edges_are_not_extrema() {
        let result = extrema(&[f("x", "(-inf, +inf)")], &[]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_explicit_point_at_jump() {
        // y = x on [0, 1), the explicit closed circle (1, 3) sits above the open end (1, 1)
        let result = extrema(&[f("x", "[0, 1)")], &[Point::new(1.0, 3.0)]);
        assert_eq!(result.absolute_max, Some(vec![Point::new(1.0, 3.0)]));
        assert_eq!(result.absolute_min, Some(vec![Point::new(0.0, 0.0)]));
    }

    #[test]
    #[should_panic(expected = "empty function list")]
    fn test_empty_function_list_panics() {
        extrema(&[], &[]);
    }
}
