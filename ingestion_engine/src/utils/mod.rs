// @file: ingestion_engine/src/utils/mod.rs
// @description: Process plumbing: configuration and logging.
// @author: LAS.

pub mod config;
pub mod logger;
