//! Event recording
//!
//! Battles and the final outcome, written out as JSONL.

pub mod logger;

pub use logger::EventLogger;
