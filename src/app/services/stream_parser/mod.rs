//! Streaming line-by-line parser for CONSAR interchange files
//!
//! Drives the record decoder over a byte stream: single pass, O(1) memory
//! beyond the current line and the accumulated record list. Lines are
//! decoded from the regulator's single-byte Latin-1-family encoding, routed
//! into header/footer/detail buckets and decode failures are captured per
//! line with the raw input preserved.
//!
//! Cancellation is cooperative: the token is checked once per line and takes
//! effect at the next line boundary.

pub mod parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use parser::{ParseProgress, ProgressSink, StreamParser};
pub use stats::ParseSummary;
