use log::{info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use thiserror::Error;

const LOG_PATTERN: &str = "{d(%H:%M:%S)(utc)} {l} - {m}\n";

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Could not open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid logger configuration: {0}")]
    Config(String),

    #[error("Logger already set: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

/// Logs to `{log_dir}/{today}.log` and to stdout.
pub fn init_file_logger(log_dir: &str) -> Result<(), LoggerError> {
    let current_date = chrono::offset::Utc::now().date_naive().to_string();
    let path = format!("{}/{}.log", log_dir, current_date);

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(&path)?;
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(
            Root::builder()
                .appender("logfile")
                .appender("stdout")
                .build(LevelFilter::Info),
        )
        .map_err(|errors| LoggerError::Config(errors.to_string()))?;

    log4rs::init_config(config)?;
    info!("File logger initialized at {}", path);

    Ok(())
}
