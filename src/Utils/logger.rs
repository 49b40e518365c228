//! simplelog set-up for the library and the demo binary.
use chrono::Local;
use log::{LevelFilter, warn};
use simplelog::*;
use std::fs::File;

/// Maps the loglevel names used in settings documents onto a filter.
/// `None` means "info"; unknown names are rejected.
pub fn level_from_str(loglevel: Option<&str>) -> Result<LevelFilter, String> {
    match loglevel.map(|s| s.trim().to_lowercase()) {
        None => Ok(LevelFilter::Info),
        Some(level) => match level.as_str() {
            "off" | "none" => Ok(LevelFilter::Off),
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            other => Err(format!(
                "loglevel must be off, none, debug, info, warn or error, got '{}'",
                other
            )),
        },
    }
}

/// Installs a terminal logger and, if `log_to_file`, a file logger writing to
/// `log_<date>_<time>.txt` in the working directory.
/// Returns false when a logger was already installed (e.g. by another test).
pub fn init_logger(loglevel: Option<&str>, log_to_file: bool) -> bool {
    let level = match level_from_str(loglevel) {
        Ok(level) => level,
        Err(message) => {
            eprintln!("{}, falling back to info", message);
            LevelFilter::Info
        }
    };
    if level == LevelFilter::Off {
        return false;
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    let mut file_failure = None;
    if log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        match File::create(&name) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(e) => file_failure = Some(format!("could not create log file {}: {}", name, e)),
        }
    }
    let installed = CombinedLogger::init(loggers).is_ok();
    if let Some(message) = file_failure {
        warn!("{}", message);
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(level_from_str(None), Ok(LevelFilter::Info));
        assert_eq!(level_from_str(Some("debug")), Ok(LevelFilter::Debug));
        assert_eq!(level_from_str(Some(" WARN ")), Ok(LevelFilter::Warn));
        assert_eq!(level_from_str(Some("none")), Ok(LevelFilter::Off));
        assert_eq!(level_from_str(Some("off")), Ok(LevelFilter::Off));
        assert!(level_from_str(Some("verbose")).is_err());
    }

    #[test]
    fn test_off_installs_nothing() {
        assert!(!init_logger(Some("off"), false));
    }
}
