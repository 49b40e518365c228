//! examples of usage of RustedGraphTutor
/// function analysis and answer validation examples
pub mod analysis_examples;
