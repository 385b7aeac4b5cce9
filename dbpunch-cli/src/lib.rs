//! The `dbpunch` command-line tool.
//!
//! Punches a MySQL server with a configurable number of records, bounding
//! how many inserts are in flight at once, and reports latency statistics
//! and failure counts at the end. The concurrent dispatch itself lives in
//! [`dbpunch_runner`]; this crate wires the database layer into it and owns
//! flags, configuration, logging, and report rendering.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cli;
pub mod config;
pub mod observability;
pub mod report;
pub mod workload;
