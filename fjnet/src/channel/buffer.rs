//! Pattern buffer with tail-search prompt detection.
//!
//! Only the last `search_depth` bytes are searched for prompt patterns,
//! which keeps prompt detection cheap on long `show running-config` output.
//! Incoming bytes are fed through a `vte` parser so that ANSI escape
//! sequences never reach the buffer.

use regex::bytes::Regex;
use vte::{Parser, Perform};

/// Buffer for accumulating output and searching for prompt patterns.
pub struct PatternBuffer {
    /// Escape-free output accumulated so far.
    buffer: Vec<u8>,

    /// How many bytes from the end to search for patterns.
    search_depth: usize,

    /// Escape sequence parser, kept across chunks so that sequences
    /// and multi-byte characters split between reads survive.
    parser: Parser,

    /// Set when the parser met bytes that were not valid UTF-8.
    lossy: bool,
}

/// Collects printable text and line control bytes, dropping escapes.
struct Printable<'a> {
    out: &'a mut Vec<u8>,
    lossy: &'a mut bool,
}

impl Perform for Printable<'_> {
    fn print(&mut self, c: char) {
        if c == char::REPLACEMENT_CHARACTER {
            *self.lossy = true;
        }
        let mut utf8 = [0u8; 4];
        self.out
            .extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.out.push(byte);
        }
    }
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            search_depth,
            parser: Parser::new(),
            lossy: false,
        }
    }

    /// Extend the buffer with new data, stripping ANSI escape codes.
    pub fn extend(&mut self, data: &[u8]) {
        let mut performer = Printable {
            out: &mut self.buffer,
            lossy: &mut self.lossy,
        };
        self.parser.advance(&mut performer, data);
    }

    /// Search only the tail of the buffer for the pattern.
    pub fn search_tail(&self, pattern: &Regex) -> Option<regex::bytes::Match<'_>> {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        pattern.find(&self.buffer[start..])
    }

    /// Index of the first pattern matching the tail, in slice order.
    pub fn first_match(&self, patterns: &[&Regex]) -> Option<usize> {
        patterns
            .iter()
            .position(|pattern| self.search_tail(pattern).is_some())
    }

    /// Take the buffer contents and reset, including the lossy flag.
    pub fn take(&mut self) -> (Vec<u8>, bool) {
        let lossy = std::mem::replace(&mut self.lossy, false);
        (std::mem::take(&mut self.buffer), lossy)
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether invalid UTF-8 was seen since the last `take`.
    pub fn is_lossy(&self) -> bool {
        self.lossy
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extend() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"Si-R220C# ");
        assert_eq!(buffer.as_slice(), b"Si-R220C# ");
    }

    #[test]
    fn test_ansi_stripping() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"\x1b[32mlan0\x1b[0m\r\n");
        assert_eq!(buffer.as_slice(), b"lan0\r\n");
    }

    #[test]
    fn test_escape_split_across_chunks() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"up\x1b[");
        buffer.extend(b"0mdown");
        assert_eq!(buffer.as_slice(), b"updown");
    }

    #[test]
    fn test_tail_search_not_in_tail() {
        let mut buffer = PatternBuffer::new(10);
        buffer.extend(b"ipcom#");
        buffer.extend(&[b'x'; 100]);

        let pattern = Regex::new(r"ipcom#").unwrap();
        assert!(buffer.search_tail(&pattern).is_none());
    }

    #[test]
    fn test_first_match_order() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"save configuration? (y|[n]):");

        let prompt = Regex::new(r"[>#] ?$").unwrap();
        let confirm = Regex::new(r"\(y\|\[n\]\):$").unwrap();
        assert_eq!(buffer.first_match(&[&prompt, &confirm]), Some(1));
    }

    #[test]
    fn test_invalid_utf8_marks_lossy() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"abc\xffdef");
        assert!(buffer.is_lossy());

        let (_, lossy) = buffer.take();
        assert!(lossy);
        assert!(!buffer.is_lossy());
        assert!(buffer.is_empty());
    }
}
