// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::Utils::report::{extrema_table, log_table, properties_table, verdict_table};
use crate::exercises::answer_validator::{ExerciseKind, UserAnswer, normalize_response};
use crate::exercises::elementary_functions::ElementaryFunction;
use crate::function_analysis::config::AnalysisConfig;
use crate::function_analysis::extrema::PointType;
use crate::function_analysis::function::{Function, FunctionError};
use crate::function_analysis::sampler::Point;
use crate::function_analysis::session::AnalysisSession;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

const X_RANGE: (f64, f64) = (-5.0, 5.0);

fn exercise(pieces: &[(&str, &str)]) -> Result<Vec<Function>, FunctionError> {
    pieces
        .iter()
        .enumerate()
        .map(|(i, (expression, domain))| Function::new(expression, domain, X_RANGE, i == 0))
        .collect()
}

fn describe(session: &mut AnalysisSession, functions: &[Function]) {
    let properties = [
        ("domain", session.get_domain_expression(functions)),
        ("range", session.get_range_expression(functions, None)),
        ("has inverse", session.has_inverse(functions).to_string()),
        ("bounded", session.is_bounded(functions).to_string()),
    ];
    println!("{}", properties_table(&properties));
}

pub fn analysis_examples(example: usize, config: AnalysisConfig) {
    let mut session = AnalysisSession::new(config);
    match example {
        0 => {
            // DERIVED PROPERTIES of single and piecewise functions
            let exercises: [&[(&str, &str)]; 4] = [
                &[("x", "(-1, 1]")],
                &[("(x)**2", "(-3,0)"), ("x", "[0,1]")],
                &[("e(-x)+1", "[0, +inf)")],
                &[("1/x", "(-inf, +inf)")],
            ];
            for pieces in exercises {
                match exercise(pieces) {
                    Ok(functions) => {
                        println!("{:?}", pieces);
                        describe(&mut session, &functions);
                    }
                    Err(e) => println!("bad exercise {:?}: {}", pieces, e),
                }
            }
        }
        1 => {
            // EXTREMA, including a plateau and a jump closed by an explicit point
            let exercises: [(&[(&str, &str)], Vec<Point>); 3] = [
                (&[("(x)**2", "(-3,0)"), ("x", "[0,1]")], vec![]),
                (&[("2", "(-1, 0]")], vec![]),
                (&[("x", "[0, 1)")], vec![Point::new(1.0, 3.0)]),
            ];
            for (pieces, explicit) in exercises {
                let Ok(functions) = exercise(pieces) else {
                    continue;
                };
                let extrema = session.get_extrema(&functions, &explicit);
                log_table(&format!("EXTREMA OF {:?}", pieces), &extrema_table(&extrema));
                println!("{}", extrema_table(&extrema));
            }
        }
        2 => {
            // VALIDATION of typed interval answers, with the hints a user would see
            let Ok(functions) = exercise(&[("sqrt(x)", "(-inf, +inf)")]) else {
                return;
            };
            let truth = session.derive_truth(ExerciseKind::Range, &functions, &[]);
            for typed in ["[0, +inf)", "(0, +inf)", "[0, 5]", "[0, 8]", "[+inf, 0)", "(0, 1"] {
                let answer = UserAnswer::Interval(typed.to_string());
                match session.validate_answer(ExerciseKind::Range, &truth, &answer) {
                    Ok(verdict) => {
                        println!("{} -> {}", normalize_response(&answer), verdict.resume_state());
                        println!("{}", verdict_table(&verdict));
                    }
                    Err(e) => println!("{} rejected ({}): {}", typed, e.kind(), e),
                }
            }
        }
        3 => {
            // EXTREMA ANSWER clicked by the user
            let Ok(functions) = exercise(&[("x**3 - 3*x", "[-2, 2]")]) else {
                return;
            };
            let truth = session.derive_truth(ExerciseKind::Extrema, &functions, &[]);
            let mut clicked: BTreeMap<PointType, Vec<Point>> = BTreeMap::new();
            clicked.insert(PointType::AbsoluteMax, vec![Point::new(-1.0, 2.0)]);
            clicked.insert(PointType::AbsoluteMin, vec![Point::new(1.0, -2.0)]);
            let answer = UserAnswer::Points(clicked);
            if let Ok(verdict) = session.validate_answer(ExerciseKind::Extrema, &truth, &answer) {
                println!("{}", normalize_response(&answer));
                println!("{}", verdict_table(&verdict));
            }
        }
        4 => {
            // ELEMENTARY FUNCTION catalog and recognition
            for kind in ElementaryFunction::iter() {
                let recognized = ElementaryFunction::recognize_expression(kind.canonical_expression());
                println!("{:<18} {:<10} {:?}", kind, kind.canonical_expression(), recognized);
            }
            for expression in ["2*sin(3*x - 1) + 4", "1 - e(-x)", "sqrt(4 - x**2)"] {
                match ElementaryFunction::recognize_expression(expression) {
                    Ok(Some(kind)) => println!("{} is a {}", expression, kind),
                    Ok(None) => println!("{} is not elementary", expression),
                    Err(e) => println!("{}: {}", expression, e),
                }
            }
        }
        5 => {
            // SAMPLED CURVE as handed to the plotting layer
            let Ok(functions) = exercise(&[("log(x)", "(0, +inf)"), ("1/(x+2)", "(-inf, 0]")]) else {
                return;
            };
            for function in &functions {
                let curve = session.display_curve(function);
                println!(
                    "{}: {} runs, {} points, open circles {:?}",
                    function.expression,
                    curve.runs.len(),
                    curve.point_count(),
                    curve.open_endpoints
                );
            }
            session.get_extrema(&functions, &[]);
            println!(
                "cache: {} curves, {} hits, {} misses",
                session.sampler().cache_len(),
                session.sampler().hits(),
                session.sampler().misses()
            );
        }
        _ => println!("no example with number {}", example),
    }
}
