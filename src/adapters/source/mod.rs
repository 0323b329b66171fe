//! Inbound event adapters. Implement EventSource.

pub mod jsonl_source;
pub mod mapper;

pub use jsonl_source::JsonLinesSource;
pub use mapper::{EntityNames, RawEvent};
