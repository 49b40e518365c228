//! Pretty tables of analysis results for logs and the demo binary.
use crate::exercises::answer_validator::Verdict;
use crate::function_analysis::extrema::ExtremaResult;
use itertools::Itertools;
use log::info;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub struct ExtremaRow {
    category: String,
    points: String,
}

pub fn extrema_rows(result: &ExtremaResult) -> Vec<ExtremaRow> {
    result
        .iter()
        .map(|(point_type, points)| ExtremaRow {
            category: point_type.to_string(),
            points: match points {
                Some(points) if points.len() > 6 => format!(
                    "{} ... {} ({} points)",
                    points[0],
                    points[points.len() - 1],
                    points.len()
                ),
                Some(points) => points.iter().join(", "),
                None => "None".to_string(),
            },
        })
        .collect()
}

pub fn extrema_table(result: &ExtremaResult) -> String {
    let mut table = Table::new(extrema_rows(result));
    table.with(Style::modern_rounded());
    table.to_string()
}

/// key/value table, e.g. the derived properties of an exercise
pub fn properties_table(properties: &[(&str, String)]) -> String {
    let mut builder = Builder::default();
    for (key, value) in properties {
        builder.push_record([key.to_string(), value.clone()]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

pub fn verdict_table(verdict: &Verdict) -> String {
    let mut builder = Builder::default();
    builder.push_record(["state".to_string(), verdict.resume_state().to_string()]);
    builder.push_record(["wrong".to_string(), verdict.wrong.iter().join("; ")]);
    builder.push_record(["missing".to_string(), verdict.missing.iter().join("; ")]);
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

pub fn log_table(title: &str, table: &str) {
    info!("\n \n {} \n \n {}", title, table);
}
