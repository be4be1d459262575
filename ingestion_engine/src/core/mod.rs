// @file: ingestion_engine/src/core/mod.rs
// @description: Exports domain types, the ingestion cycle and its scheduler.
// @author: LAS.

pub mod checkpoint;
pub mod errors;
pub mod ingestor;
pub mod interfaces;
pub mod models;
pub mod scheduler;
