//! The record-insert workload driven against the database.

use async_trait::async_trait;
use chrono::Utc;
use dbpunch_db::{Database, NewRecord};
use dbpunch_runner::Writer;
use rand::distr::{Alphanumeric, SampleString};

/// Length of the random payload text in every record.
const RECORD_TEXT_LEN: usize = 512;

/// Inserts one randomly generated record per write.
#[derive(Clone, Debug)]
pub struct RecordWriter {
    db: Database,
}

impl RecordWriter {
    /// Creates a writer inserting into the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Writer for RecordWriter {
    async fn write(&self, _index: u64) -> anyhow::Result<()> {
        let record = NewRecord {
            text: random_text(RECORD_TEXT_LEN),
            added: Utc::now(),
        };
        self.db.insert_record(record).await?;
        Ok(())
    }
}

/// Generates a random alphanumeric string of the given length.
fn random_text(len: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), len)
}
