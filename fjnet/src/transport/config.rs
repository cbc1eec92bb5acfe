//! SSH connection configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys.
    Strict,

    /// Accept and learn unknown keys, but reject changed keys.
    #[default]
    AcceptNew,

    /// Accept all keys without checking. For lab use only.
    Disabled,
}

impl HostKeyVerification {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostKeyVerification::Strict => "strict",
            HostKeyVerification::AcceptNew => "accept-new",
            HostKeyVerification::Disabled => "disabled",
        }
    }
}

impl fmt::Display for HostKeyVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostKeyVerification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" | "yes" => Ok(HostKeyVerification::Strict),
            "accept-new" => Ok(HostKeyVerification::AcceptNew),
            "disabled" | "no" | "off" => Ok(HostKeyVerification::Disabled),
            other => Err(format!(
                "unknown host key checking mode '{other}' (expected strict, accept-new or disabled)"
            )),
        }
    }
}

/// SSH connection configuration.
#[derive(Debug)]
pub struct SshConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port (default: 22).
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Authentication method.
    pub auth: AuthMethod,

    /// Connection and per-command read timeout.
    pub timeout: Duration,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// Path to known_hosts file.
    pub known_hosts_path: Option<PathBuf>,
}

impl SshConfig {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Authentication method for SSH connections.
#[derive(Debug)]
pub enum AuthMethod {
    /// No authentication.
    None,

    /// Password authentication.
    Password(SecretString),

    /// Private key authentication.
    PrivateKey {
        /// Path to the private key file.
        path: PathBuf,
        /// Optional passphrase for encrypted keys.
        passphrase: Option<SecretString>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_key_verification_parse() {
        assert_eq!(
            "accept-new".parse::<HostKeyVerification>().unwrap(),
            HostKeyVerification::AcceptNew
        );
        assert_eq!(
            "no".parse::<HostKeyVerification>().unwrap(),
            HostKeyVerification::Disabled
        );
        assert!("maybe".parse::<HostKeyVerification>().is_err());
        assert_eq!(HostKeyVerification::Strict.to_string(), "strict");
    }
}
