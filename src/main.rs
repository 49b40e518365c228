#![allow(non_snake_case)]
use RustedGraphTutor::Examples::analysis_examples::analysis_examples;
use RustedGraphTutor::Utils::logger::init_logger;
use RustedGraphTutor::function_analysis::config::AnalysisConfig;
use log::warn;

fn main() {
    // settings document given as the first argument, defaults otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => match AnalysisConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {}, using defaults", path, e);
                AnalysisConfig::default()
            }
        },
        None => AnalysisConfig::default(),
    };
    if !init_logger(config.loglevel.as_deref(), false) {
        eprintln!("logging is off");
    }
    let example = 0;
    match example {
        0 => {
            for example in 0..=5 {
                analysis_examples(example, config.clone());
            }
        }
        1 => analysis_examples(2, config),
        _ => warn!("nothing to run"),
    }
}
