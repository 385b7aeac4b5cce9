//! Logging setup.

use std::env;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, prelude::*};

use crate::config::Config;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence when set: a bare level selects overall
/// verbosity, anything else is used as a literal filter. Otherwise the
/// configured logging level applies.
pub fn init_tracing(config: &Config) {
    let (level, env_filter) = parse_rust_log(config.logging.level);
    let format = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(format.with_filter(level))
        .with(env_filter)
        .init();
}

fn parse_rust_log(configured: LevelFilter) -> (LevelFilter, EnvFilter) {
    // Try to parse RUST_LOG as a simple level filter and apply default
    // directives internally. Otherwise, use it literally if the user knows
    // which overrides they want to run.
    let level = match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) => match value.parse::<Level>() {
            Ok(level) => LevelFilter::from(level),
            Err(_) => return (LevelFilter::TRACE, EnvFilter::new(value)),
        },
        Err(_) => configured,
    };

    // This is the maximum verbosity that will be logged, filtered down to
    // `level` by the format layer.
    let env_filter = EnvFilter::new(
        "INFO,\
        sqlx=WARN,\
        dbpunch_cli=TRACE,\
        dbpunch_db=TRACE,\
        dbpunch_runner=TRACE,\
        ",
    );

    (level, env_filter)
}
