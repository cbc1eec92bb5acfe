//! Command requests with an optional interactive prompt.
//!
//! Some device commands stop to ask something before returning to the
//! command prompt:
//! - `admin` asks for the administrator password
//! - `end` with uncommitted changes asks `(y|[n]):`
//! - `save` may ask whether to overwrite
//!
//! A [`CommandRequest`] carries the command, the prompt to expect and
//! the answer to send when that prompt shows up.

use std::fmt;

use regex::bytes::Regex;
use serde::{Deserialize, Deserializer};

use crate::error::{ChannelError, Result};

/// A command plus an optional prompt/answer pair.
///
/// # Example
///
/// ```rust
/// use fjnet::driver::CommandRequest;
///
/// let request = CommandRequest::new("save")
///     .with_prompt(r"overwrite\? \(y\|\[n\]\):$")
///     .unwrap()
///     .with_answer("y");
/// assert_eq!(request.command, "save");
/// ```
#[derive(Clone)]
pub struct CommandRequest {
    /// The command to send.
    pub command: String,

    /// Prompt the device may print instead of returning to the command prompt.
    pub prompt: Option<Regex>,

    /// Line sent when `prompt` matches.
    pub answer: Option<String>,

    /// Whether the answer is kept out of logs (passwords).
    pub hidden: bool,
}

impl CommandRequest {
    /// Create a plain command request.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            prompt: None,
            answer: None,
            hidden: false,
        }
    }

    /// Expect an interactive prompt matching `pattern`.
    pub fn with_prompt(mut self, pattern: &str) -> Result<Self> {
        self.prompt = Some(Regex::new(pattern).map_err(ChannelError::InvalidPattern)?);
        Ok(self)
    }

    /// Expect an already compiled interactive prompt.
    pub fn with_prompt_regex(mut self, pattern: Regex) -> Self {
        self.prompt = Some(pattern);
        self
    }

    /// Answer to send when the prompt matches.
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    /// Keep the answer out of logs.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Whether this is a `show` command.
    pub fn is_show(&self) -> bool {
        self.command.trim_start().starts_with("show")
    }
}

impl fmt::Debug for CommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let answer = match (&self.answer, self.hidden) {
            (Some(_), true) => Some("********"),
            (Some(answer), false) => Some(answer.as_str()),
            (None, _) => None,
        };
        f.debug_struct("CommandRequest")
            .field("command", &self.command)
            .field("prompt", &self.prompt.as_ref().map(Regex::as_str))
            .field("answer", &answer)
            .finish()
    }
}

impl From<&str> for CommandRequest {
    fn from(command: &str) -> Self {
        CommandRequest::new(command)
    }
}

impl From<String> for CommandRequest {
    fn from(command: String) -> Self {
        CommandRequest::new(command)
    }
}

/// Accepts either a bare command string or
/// `{"command": ..., "prompt": ..., "answer": ...}`.
impl<'de> Deserialize<'de> for CommandRequest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Spec {
            Bare(String),
            Full {
                command: String,
                #[serde(default)]
                prompt: Option<String>,
                #[serde(default)]
                answer: Option<String>,
            },
        }

        match Spec::deserialize(deserializer)? {
            Spec::Bare(command) => Ok(CommandRequest::new(command)),
            Spec::Full {
                command,
                prompt,
                answer,
            } => {
                let mut request = CommandRequest::new(command);
                if let Some(prompt) = prompt {
                    request.prompt =
                        Some(Regex::new(&prompt).map_err(serde::de::Error::custom)?);
                }
                request.answer = answer;
                Ok(request)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_answer_not_in_debug() {
        let request = CommandRequest::new("admin")
            .with_prompt("Password: $")
            .unwrap()
            .with_answer("s3cret")
            .hidden();
        let debug = format!("{request:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("admin"));
    }

    #[test]
    fn test_invalid_prompt() {
        assert!(CommandRequest::new("x").with_prompt("(").is_err());
    }

    #[test]
    fn test_deserialize_bare_and_full() {
        let requests: Vec<CommandRequest> = serde_json::from_str(
            r#"["show clock", {"command": "save", "prompt": "\\(y\\|\\[n\\]\\):$", "answer": "y"}]"#,
        )
        .unwrap();
        assert_eq!(requests[0].command, "show clock");
        assert!(requests[0].is_show());
        assert_eq!(requests[1].answer.as_deref(), Some("y"));
        assert!(requests[1].prompt.as_ref().unwrap().is_match(b"overwrite? (y|[n]):"));
        assert!(!requests[1].is_show());
    }
}
