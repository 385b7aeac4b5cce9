//! Command-line arguments and bootstrap.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use argh::FromArgs;
use dbpunch_db::{ConnectOptions, Database};

use crate::config::Config;
use crate::workload::RecordWriter;
use crate::{observability, report};

/// Punch a MySQL server with a pile of records.
#[derive(Debug, FromArgs)]
pub struct Args {
    /// path to the YAML configuration file
    #[argh(option, short = 'c')]
    pub config: Option<PathBuf>,

    /// number of records to send, overriding the configuration
    #[argh(option)]
    pub records: Option<u64>,

    /// maximum number of records in flight at once, overriding the
    /// configuration
    #[argh(option)]
    pub max_concurrent: Option<NonZeroUsize>,

    /// delete all punch records and reset the id counter before the run
    #[argh(switch)]
    pub reset: bool,

    /// create the database on the server if it does not exist
    #[argh(switch)]
    pub create_database: bool,
}

/// Bootstrap the runtime and run the punch.
pub fn execute() -> Result<()> {
    let args: Args = argh::from_env();

    let mut config = Config::load(args.config.as_deref())?;
    config.apply_overrides(&args);

    observability::init_tracing(&config);
    tracing::debug!(?config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("punch-rt")
        .enable_all()
        .build()?;

    runtime.block_on(punch(config))
}

async fn punch(config: Config) -> Result<()> {
    let options = ConnectOptions {
        host: config.mysql.host.clone(),
        port: config.mysql.port,
        database: config.mysql.database.clone(),
        user: config.mysql.user.clone(),
        password: config.mysql.password.as_str().to_owned(),
        create_database: config.mysql.create_database,
        pool_size: config.run.max_concurrent,
    };

    let db = Database::connect(&options)
        .await
        .context("failed initializing the database connection")?;

    if config.run.reset {
        db.reset_records()
            .await
            .context("failed resetting punch records")?;
        tracing::info!("reset all records");
    }

    let writer = Arc::new(RecordWriter::new(db));
    let report = dbpunch_runner::run(writer, config.run.records, config.run.max_concurrent).await;

    tracing::info!("complete");
    print!("{}", report::render(&report, config.run.max_concurrent));

    Ok(())
}
