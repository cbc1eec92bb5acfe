//! Transport layer.
//!
//! A [`Transport`] moves lines of input to the device and reads its
//! output until a prompt pattern shows up at the tail. [`SshTransport`]
//! is the russh-backed implementation; [`ScriptedTransport`] replays a
//! fixed device conversation without a network.

pub mod config;
mod scripted;
mod ssh;

use std::future::Future;
use std::time::Duration;

use regex::bytes::Regex;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use scripted::{Exchange, ScriptedTransport};
pub use ssh::SshTransport;

use crate::error::Result;

/// Output collected by [`Transport::read_until`].
#[derive(Debug, Clone)]
pub struct ReadResult {
    /// Escape-free bytes read, ending with the matched pattern.
    pub data: Vec<u8>,

    /// Index of the pattern that matched.
    pub matched: usize,

    /// Whether the bytes contained invalid UTF-8.
    pub lossy: bool,
}

/// Line-oriented interactive session with a device.
pub trait Transport: Send {
    /// Send one line of input. A newline is appended.
    fn send(&mut self, input: &str) -> impl Future<Output = Result<()>> + Send;

    /// Read until one of `patterns` matches the tail of the output.
    ///
    /// Patterns are tried in order; the first match wins.
    fn read_until(
        &mut self,
        patterns: &[&Regex],
        timeout: Duration,
    ) -> impl Future<Output = Result<ReadResult>> + Send;

    /// Close the session.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}
