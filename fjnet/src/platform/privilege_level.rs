//! Privilege level definition.

use std::fmt;

use regex::bytes::Regex;

/// Session mode a prompt puts the CLI in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionMode {
    /// User mode, `>` prompt.
    Unprivileged,
    /// Administrator mode, `#` prompt.
    Privileged,
    /// Configuration mode, `(config)#` or `(edit)#` prompt.
    Configuration,
}

impl SessionMode {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Unprivileged => "unprivileged",
            SessionMode::Privileged => "privileged",
            SessionMode::Configuration => "configuration",
        }
    }

    /// Whether commands that need administrator rights may run.
    pub fn is_privileged(&self) -> bool {
        matches!(self, SessionMode::Privileged | SessionMode::Configuration)
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A privilege level definition for a device family.
///
/// Levels form a chain: each level except the root names its parent
/// and the commands that move between the two.
#[derive(Debug, Clone)]
pub struct PrivilegeLevel {
    /// Session mode this level represents.
    pub mode: SessionMode,

    /// Regex pattern to match the prompt for this privilege level.
    pub pattern: Regex,

    /// Mode of the parent level (None for the root level).
    pub previous_priv: Option<SessionMode>,

    /// Command to escalate TO this level from the parent.
    pub escalate_command: Option<String>,

    /// Command to de-escalate FROM this level to the parent.
    pub deescalate_command: Option<String>,

    /// Pattern to match the authentication prompt, if escalation asks for one.
    pub escalate_prompt: Option<Regex>,

    /// Strings that must NOT be in the prompt for this level to match.
    /// `#` ends both privileged and configuration prompts.
    pub not_contains: Vec<String>,
}

impl PrivilegeLevel {
    /// Create a new privilege level with minimal required fields.
    pub fn new(mode: SessionMode, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            mode,
            pattern: Regex::new(pattern)?,
            previous_priv: None,
            escalate_command: None,
            deescalate_command: None,
            escalate_prompt: None,
            not_contains: vec![],
        })
    }

    /// Set the parent privilege level.
    pub fn with_parent(mut self, parent: SessionMode) -> Self {
        self.previous_priv = Some(parent);
        self
    }

    /// Set the escalation command.
    pub fn with_escalate(mut self, command: impl Into<String>) -> Self {
        self.escalate_command = Some(command.into());
        self
    }

    /// Set the de-escalation command.
    pub fn with_deescalate(mut self, command: impl Into<String>) -> Self {
        self.deescalate_command = Some(command.into());
        self
    }

    /// Set the prompt that asks for a password during escalation.
    pub fn with_auth(mut self, prompt_pattern: &str) -> Result<Self, regex::Error> {
        self.escalate_prompt = Some(Regex::new(prompt_pattern)?);
        Ok(self)
    }

    /// Add a not_contains pattern.
    pub fn with_not_contains(mut self, pattern: impl Into<String>) -> Self {
        self.not_contains.push(pattern.into());
        self
    }

    /// Check if this privilege level matches a prompt.
    pub fn matches(&self, prompt: &str) -> bool {
        if self.not_contains.iter().any(|nc| prompt.contains(nc.as_str())) {
            return false;
        }
        self.pattern.is_match(prompt.as_bytes())
    }
}
