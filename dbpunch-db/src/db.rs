//! Connection handling and the punch-table operations.

use std::fmt;
use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use crate::error::{DbError, Result};

/// Connection parameters for the MySQL server.
#[derive(Clone)]
pub struct ConnectOptions {
    /// Hostname of the MySQL server.
    pub host: String,
    /// Port of the MySQL server.
    pub port: u16,
    /// Database to punch records into.
    pub database: String,
    /// Username to authenticate as.
    pub user: String,
    /// Password for `user`.
    pub password: String,
    /// Create the database on the server first if it does not exist.
    pub create_database: bool,
    /// Connection pool size. Must cover the concurrency budget of the run,
    /// otherwise the pool throttles writes below the admission limiter.
    pub pool_size: NonZeroUsize,
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .field("create_database", &self.create_database)
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

/// One record to insert into the punch table.
#[derive(Clone, Debug)]
pub struct NewRecord {
    /// Payload text, at most 512 characters.
    pub text: String,
    /// Timestamp stored alongside the payload.
    pub added: DateTime<Utc>,
}

/// Client for the punch table.
#[derive(Clone, Debug)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    /// Connects to the server and ensures the schema exists.
    ///
    /// When [`ConnectOptions::create_database`] is set, the database itself
    /// is created first over a short-lived connection without a default
    /// database. The punch table is always created if it is missing.
    pub async fn connect(options: &ConnectOptions) -> Result<Self> {
        let connect = MySqlConnectOptions::new()
            .host(&options.host)
            .port(options.port)
            .username(&options.user)
            .password(&options.password);

        if options.create_database {
            let pool = MySqlPoolOptions::new()
                .max_connections(1)
                .connect_with(connect.clone())
                .await
                .map_err(DbError::Connect)?;

            let statement = format!("CREATE DATABASE IF NOT EXISTS `{}`", options.database);
            sqlx::query(&statement)
                .execute(&pool)
                .await
                .map_err(DbError::CreateDatabase)?;
            pool.close().await;
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(options.pool_size.get() as u32)
            .connect_with(connect.database(&options.database))
            .await
            .map_err(DbError::Connect)?;

        tracing::debug!("creating the punch table if it does not exist");
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS dbpunch ( \
                id INT PRIMARY KEY AUTO_INCREMENT, \
                text VARCHAR(512) NOT NULL, \
                added_time DATETIME NOT NULL \
            )",
        )
        .execute(&pool)
        .await
        .map_err(DbError::CreateTable)?;

        tracing::info!("database connection initialized");

        Ok(Self { pool })
    }

    /// Inserts one record into the punch table.
    pub async fn insert_record(&self, record: NewRecord) -> Result<()> {
        sqlx::query("INSERT INTO dbpunch (text, added_time) VALUES (?, ?)")
            .bind(&record.text)
            .bind(record.added)
            .execute(&self.pool)
            .await
            .map_err(DbError::Insert)?;

        Ok(())
    }

    /// Deletes all punch records and restores the id counter to 1.
    pub async fn reset_records(&self) -> Result<()> {
        sqlx::query("DELETE FROM dbpunch")
            .execute(&self.pool)
            .await
            .map_err(DbError::Reset)?;

        sqlx::query("ALTER TABLE dbpunch AUTO_INCREMENT = 1")
            .execute(&self.pool)
            .await
            .map_err(DbError::Reset)?;

        Ok(())
    }
}
