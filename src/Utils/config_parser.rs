/// Reads settings documents shaped like
/// ```text
/// sampling
///   max_y: 5.5
///   display_step: 0.1
/// logging
///   loglevel: info
/// ```
/// i.e. section titles followed by `key: value, value` pairs. Lines starting with `//`, `#`, `%` or `;`
/// are comments. Every section becomes a map key -> list of values; keys listed in a template but
/// missing from the document are present with `None`.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt;

pub type SectionMap = HashMap<String, Option<Vec<Value>>>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// a single setting value, typed by the first parse that succeeds: integer, float, bool, text
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// integers are accepted where floats are expected (`max_y: 5`)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

#[derive(Debug)]
pub enum DocumentError {
    /// nom could not read the document; carries the unread text
    Malformed(String),
    /// the document parsed, but some text after the last section was not understood
    TrailingInput(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DocumentError::Malformed(near) => write!(f, "malformed settings document near '{}'", near),
            DocumentError::TrailingInput(rest) => {
                write!(f, "failed to parse entire document, remaining: '{}'", rest)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

/// identifier: a letter or underscore followed by letters, digits, underscores
fn identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, title) = identifier(input)?;
    Ok((input.trim_start(), title))
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    let raw = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';'));
    map(raw, |s: &str| {
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::String(s.to_string())
        }
    })
    .parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let comma = delimited(space0, tag(","), space0);
    separated_list0(comma, parse_value).parse(input)
}

/// `key: value, value`
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon = delimited(space0, tag(":"), space0);
    let (input, pair) = separated_pair(identifier, colon, parse_value_list).parse(input)?;
    Ok((input.trim_start(), pair))
}

fn parse_section(input: &str) -> IResult<&str, (String, HashMap<String, Vec<Value>>)> {
    let (input, _) = multispace0(input)?;
    let (input, title) = parse_title(input)?;
    let (input, pairs) = many1(terminated(parse_key_value_pair, space0)).parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

fn strip_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !(trimmed.is_empty()
                || trimmed.starts_with("//")
                || trimmed.starts_with('#')
                || trimmed.starts_with('%')
                || trimmed.starts_with(';'))
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

fn parse_sections(input: &str) -> IResult<&str, DocumentMap> {
    let (input, sections) = many1(delimited(space0, parse_section, multispace0)).parse(input)?;
    let document = sections
        .into_iter()
        .map(|(title, section)| {
            let section = section
                .into_iter()
                .map(|(key, values)| (key, Some(values)))
                .collect::<SectionMap>();
            (title, section)
        })
        .collect();
    Ok((input, document))
}

/// Parses a whole document. An empty document (or one with comments only) is an empty map.
pub fn parse_document(input: &str) -> Result<DocumentMap, DocumentError> {
    let cleaned = strip_comments(input);
    if cleaned.trim().is_empty() {
        return Ok(DocumentMap::new());
    }
    match parse_sections(&cleaned) {
        Ok((remaining, document)) => {
            if !remaining.trim().is_empty() {
                return Err(DocumentError::TrailingInput(remaining.trim().to_string()));
            }
            Ok(document)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(DocumentError::Malformed(e.input.chars().take(40).collect()))
        }
        Err(nom::Err::Incomplete(_)) => Err(DocumentError::Malformed(String::new())),
    }
}

/// Parses a document and makes sure every section/key of `template` exists in the result.
pub fn parse_document_with_template(
    input: &str,
    template: &HashMap<String, Vec<String>>,
) -> Result<DocumentMap, DocumentError> {
    let mut parsed = parse_document(input)?;
    for (title, keys) in template {
        let section = parsed.entry(title.clone()).or_default();
        for key in keys {
            section.entry(key.clone()).or_insert(None);
        }
    }
    Ok(parsed)
}
