// @file: ingestion_engine/src/tests/mod.rs
// @description: Scenario tests driving the ingestion core end to end.
// @author: LAS.

#[cfg(test)]
pub mod support;
