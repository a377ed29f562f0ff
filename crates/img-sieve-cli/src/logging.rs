use std::env;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Pipeline crates log at `info`; dependencies (zip, image decoders) only surface warnings.
const DEFAULT_FILTER: &str = "warn,img_sieve=info,img_sieve_core=info";
const DEFAULT_LOG_FILE: &str = "./logs/img-sieve.log";

fn filter_directives() -> String {
    env::var("TRACING_LEVEL").unwrap_or_else(|_| DEFAULT_FILTER.to_string())
}

pub fn init_logger() -> impl Drop {
    let filter_layer = EnvFilter::try_new(filter_directives()).unwrap_or_else(|err| {
        eprintln!("Invalid TRACING_LEVEL ({}), using '{}'", err, DEFAULT_FILTER);
        EnvFilter::new(DEFAULT_FILTER)
    });

    let log_file_path = env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

    let file_appender = tracing_appender::rolling::never("./", log_file_path);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .with_target(false)
                .without_time()
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    debug!("Logging to stdout and {}", DEFAULT_LOG_FILE);

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
        assert!(DEFAULT_FILTER.contains("img_sieve_core=info"));
    }
}
