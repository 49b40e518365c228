//! different utility modules used throughout the project
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into HashMap
pub mod config_parser;
/// terminal and file logging setup
pub mod logger;
/// tables of extrema, verdicts and derived properties
pub mod report;
/// two-decimal rounding, truncation and grids shared by all analyzers
pub mod rounding;
