// @file: ingestion_engine/src/storage/mod.rs
// @description: On-disk output for fetched records.
// @author: LAS.

pub mod record_writer;

pub use record_writer::RecordWriter;
