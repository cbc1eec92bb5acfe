//! Channel layer for pattern matching.
//!
//! This module handles accumulation of interactive session output,
//! including ANSI stripping and tail-anchored prompt detection.

mod buffer;

pub use buffer::PatternBuffer;
