//! Replay transport for exercising drivers without a device.
//!
//! A [`ScriptedTransport`] holds the banner a device prints on login and
//! an ordered list of exchanges. Each `send` must match the next expected
//! input; the device echo and the scripted output are then appended to
//! the read buffer. Reads never wait: if no pattern matches the buffered
//! output, the read fails as a timeout would on a real session.

use std::collections::VecDeque;
use std::time::Duration;

use log::trace;
use regex::bytes::Regex;

use super::{ReadResult, Transport};
use crate::channel::PatternBuffer;
use crate::error::{ChannelError, Result};

/// One expected input and the device's reply to it.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Input the driver is expected to send (without newline).
    pub input: String,

    /// Bytes the device prints after echoing the input.
    pub output: Vec<u8>,

    /// Whether the device echoes the input (false for passwords).
    pub echo: bool,
}

/// Scripted device conversation.
pub struct ScriptedTransport {
    exchanges: VecDeque<Exchange>,
    buffer: PatternBuffer,
    sent: Vec<String>,
    closed: bool,
}

impl ScriptedTransport {
    /// Create a transport whose first read returns `banner`.
    pub fn new(banner: impl AsRef<[u8]>) -> Self {
        let mut buffer = PatternBuffer::default();
        buffer.extend(banner.as_ref());
        Self {
            exchanges: VecDeque::new(),
            buffer,
            sent: Vec::new(),
            closed: false,
        }
    }

    /// Expect `input` next and reply with `output`.
    pub fn expect(mut self, input: impl Into<String>, output: impl AsRef<[u8]>) -> Self {
        self.exchanges.push_back(Exchange {
            input: input.into(),
            output: output.as_ref().to_vec(),
            echo: true,
        });
        self
    }

    /// Expect `input` next without echoing it back (passwords).
    pub fn expect_hidden(mut self, input: impl Into<String>, output: impl AsRef<[u8]>) -> Self {
        self.exchanges.push_back(Exchange {
            input: input.into(),
            output: output.as_ref().to_vec(),
            echo: false,
        });
        self
    }

    /// Every input sent so far, in order.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    /// Number of scripted exchanges not yet consumed.
    pub fn remaining(&self) -> usize {
        self.exchanges.len()
    }

    /// Whether `close` was called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Transport for ScriptedTransport {
    async fn send(&mut self, input: &str) -> Result<()> {
        self.sent.push(input.to_string());

        let exchange = self
            .exchanges
            .pop_front()
            .ok_or_else(|| ChannelError::ReplayMismatch {
                expected: "<end of script>".to_string(),
                actual: input.to_string(),
            })?;

        if exchange.input != input {
            return Err(ChannelError::ReplayMismatch {
                expected: exchange.input,
                actual: input.to_string(),
            }
            .into());
        }

        trace!("replaying reply to {:?}", input);
        if exchange.echo {
            self.buffer.extend(format!("{input}\r\n").as_bytes());
        }
        self.buffer.extend(&exchange.output);
        Ok(())
    }

    async fn read_until(&mut self, patterns: &[&Regex], timeout: Duration) -> Result<ReadResult> {
        match self.buffer.first_match(patterns) {
            Some(matched) => {
                let (data, lossy) = self.buffer.take();
                Ok(ReadResult {
                    data,
                    matched,
                    lossy,
                })
            }
            None => Err(ChannelError::PatternTimeout(timeout).into()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
