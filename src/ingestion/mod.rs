//! Offline ingestion: corpus files in, indexed vector records out.
//!
//! * [`corpus`]: recursive corpus walk with an extension allow-list and
//!   best-effort decoding.
//! * [`pipeline`]: chunk, embed, and upsert in bounded batches, with a
//!   summary of what was written.
//!
//! Ingestion is re-runnable with no preconditions (no lock file, no
//! "already ingested" marker). Record ids are fresh UUIDs on every run, so
//! re-ingesting an unchanged corpus duplicates its content alongside the old
//! records unless the external index is cleared first; operators should
//! clear the index before a full re-ingest.

pub mod corpus;
pub mod pipeline;

pub use corpus::{Document, read_corpus};
pub use pipeline::{IngestionSummary, Ingestor};
