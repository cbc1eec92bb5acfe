//! Error types for fjnet.

use std::io;
use thiserror::Error;

/// Main error type for fjnet operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Terminal driver errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform/dialect errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Invalid arguments to a configuration verb
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Module-level failures
    #[error("{0}")]
    Module(#[from] ModuleError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key differs from the one in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host is not present in known_hosts (strict checking)
    #[error("Host key for {host}:{port} is unknown")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (pattern matching, replay).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(std::time::Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Scripted transport received input it did not expect
    #[error("Replay mismatch: expected '{expected}', got '{actual}'")]
    ReplayMismatch { expected: String, actual: String },
}

/// Terminal driver errors (command execution, privilege escalation).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call open() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// The device reported an error for a command
    #[error("{command}: {message}")]
    CommandFailed { command: String, message: String },

    /// Initial terminal setup (pager disable) failed
    #[error("{message}")]
    TerminalSetup { message: String },

    /// Privilege escalation did not reach the privileged prompt
    #[error("unable to elevate privilege to enable mode, at prompt [{prompt}] with error: {message}")]
    PrivilegeEscalation { prompt: String, message: String },

    /// Output could not be decoded as text
    #[error("Failed to decode output from {command}")]
    DecodeFailed { command: String },

    /// Unknown privilege level detected
    #[error("Unknown privilege level from prompt: '{prompt}'")]
    UnknownPrivilege { prompt: String },

    /// Invalid configuration in the session builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Platform/dialect definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Platform name not recognized
    #[error("Unknown platform '{name}'")]
    UnknownPlatform { name: String },
}

/// Invalid arguments to the configuration verbs.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration source other than running/startup
    #[error("fetching configuration from {name} is not supported")]
    UnsupportedSource { name: String },

    /// Empty candidate configuration
    #[error("must provide a candidate config to load")]
    EmptyCandidate,

    /// Dry-run requested on a device family without one
    #[error("check mode is not supported")]
    CheckModeUnsupported,

    /// Operation requires privileged mode
    #[error("operation requires privilege escalation")]
    PrivilegeRequired,
}

/// Module-level failures reported through the failure document.
#[derive(Error, Debug)]
pub enum ModuleError {
    /// Wait-for conditionals still unmet after all retries
    #[error("One or more conditional statements have not been satisfied")]
    ConditionsUnmet { failed_conditions: Vec<String> },

    /// A wait-for conditional could not be parsed
    #[error("Invalid conditional '{raw}': {message}")]
    InvalidConditional { raw: String, message: String },

    /// Unknown gather_subset entry
    #[error("Bad subset '{subset}'")]
    BadSubset { subset: String },

    /// Capabilities reported a non-cliconf transport
    #[error("Invalid connection type {network_api}")]
    InvalidConnectionType { network_api: String },

    /// A JSON document could not be built or parsed
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModuleError {
    /// Unmet conditionals carried by this error, if any.
    pub fn failed_conditions(&self) -> Option<&[String]> {
        match self {
            ModuleError::ConditionsUnmet { failed_conditions } => Some(failed_conditions),
            _ => None,
        }
    }
}

/// Result type alias using fjnet's Error.
pub type Result<T> = std::result::Result<T, Error>;
