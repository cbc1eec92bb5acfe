//! Builder for opening device sessions over SSH.

use std::path::PathBuf;
use std::time::Duration;

use log::debug;
use secrecy::SecretString;

use super::terminal::TerminalDriver;
use crate::cliconf::Cliconf;
use crate::error::{DriverError, Result};
use crate::platform::Platform;
use crate::transport::{AuthMethod, HostKeyVerification, SshConfig, SshTransport};

/// Builder for connected [`Cliconf`] sessions.
///
/// # Example
///
/// ```rust,no_run
/// use fjnet::driver::SessionBuilder;
/// use fjnet::platform::Platform;
///
/// # async fn example() -> Result<(), fjnet::Error> {
/// let mut session = SessionBuilder::new("192.168.1.1")
///     .username("admin")
///     .password("secret")
///     .platform(Platform::FujitsuSir)
///     .authorize(true)
///     .connect()
///     .await?;
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: AuthMethod,
    platform: Option<Platform>,
    timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    authorize: bool,
    auth_pass: Option<SecretString>,
}

impl SessionBuilder {
    /// Create a new builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            auth: AuthMethod::None,
            platform: None,
            timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            authorize: false,
            auth_pass: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Set the device family.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set the connection and per-command read timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a specific known_hosts file.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Enter privileged mode right after opening the shell.
    pub fn authorize(mut self, authorize: bool) -> Self {
        self.authorize = authorize;
        self
    }

    /// Password answered to the `admin` prompt.
    pub fn auth_pass(mut self, password: impl Into<String>) -> Self {
        self.auth_pass = Some(SecretString::from(password.into()));
        self
    }

    /// Connect, open the shell, and escalate if `authorize` is set.
    pub async fn connect(self) -> Result<Cliconf<SshTransport>> {
        let username = self.username.ok_or_else(|| DriverError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;
        let platform = self.platform.ok_or_else(|| DriverError::InvalidConfig {
            message: "Platform must be specified".to_string(),
        })?;
        let definition = platform.definition();

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            auth: self.auth,
            timeout: self.timeout,
            terminal_width: definition.terminal_width,
            terminal_height: definition.terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        let transport = SshTransport::connect(&ssh_config).await?;
        let mut driver = TerminalDriver::new(definition, transport);
        driver.set_timeout(self.timeout);

        let mut cliconf = Cliconf::new(driver);
        cliconf.open().await?;
        if self.authorize {
            debug!("escalating on {}", ssh_config.socket_addr());
            cliconf.escalate(self.auth_pass.as_ref()).await?;
        }
        Ok(cliconf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_username_required() {
        let err = SessionBuilder::new("192.0.2.1")
            .platform(Platform::FujitsuIpcom)
            .connect()
            .await
            .err()
            .unwrap();
        assert!(matches!(
            err,
            crate::Error::Driver(DriverError::InvalidConfig { .. })
        ));
    }

    #[tokio::test]
    async fn test_platform_required() {
        let err = SessionBuilder::new("192.0.2.1")
            .username("admin")
            .connect()
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("Platform must be specified"));
    }
}
