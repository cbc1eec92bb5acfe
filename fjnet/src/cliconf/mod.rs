//! Configuration verbs over a terminal session.
//!
//! [`Connection`] is the contract the modules are written against.
//! [`Cliconf`] implements it on top of a [`TerminalDriver`], turning
//! `get_config` / `edit_config` / `get_capabilities` / `get` into the
//! device's command sequences.
//!
//! # Example
//!
//! ```rust
//! use fjnet::cliconf::{Cliconf, Connection, EditOptions};
//! use fjnet::driver::TerminalDriver;
//! use fjnet::platform::Platform;
//! use fjnet::transport::ScriptedTransport;
//!
//! # async fn example() -> Result<(), fjnet::Error> {
//! let transport = ScriptedTransport::new("Si-R220C# ")
//!     .expect("terminal pager disable", "Si-R220C# ")
//!     .expect("configure", "Si-R220C(config)# ")
//!     .expect("lan 0 ip address 192.168.0.1/24 3", "Si-R220C(config)# ")
//!     .expect("commit", "Si-R220C(config)# ")
//!     .expect("save", "Si-R220C(config)# ")
//!     .expect("end", "Si-R220C# ");
//!
//! let driver = TerminalDriver::new(Platform::FujitsuSir.definition(), transport);
//! let mut cliconf = Cliconf::new(driver);
//! cliconf.open().await?;
//!
//! let result = cliconf
//!     .edit_config(&["lan 0 ip address 192.168.0.1/24 3".into()], &EditOptions::default())
//!     .await?;
//! assert_eq!(result.request, ["lan 0 ip address 192.168.0.1/24 3"]);
//! # Ok(())
//! # }
//! ```

mod cache;
mod capabilities;

use std::future::Future;

use log::{debug, warn};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub use cache::ConfigCache;
pub use capabilities::{
    CapabilityDocument, DeviceInfo, DeviceOperations, RPC, hostname_from_prompt,
};

use crate::driver::{CommandRequest, TerminalDriver};
use crate::error::{ChannelError, ConfigError, DriverError, Error, ModuleError, Result};
use crate::platform::{PlatformDefinition, SessionMode};
use crate::transport::Transport;

/// Options of `edit_config`.
///
/// `replace`, `diff` and `comment` are accepted for interface
/// compatibility; none of the families supports them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditOptions {
    /// Must be true; there is no dry-run path.
    pub commit: bool,
    pub replace: Option<String>,
    pub diff: bool,
    pub comment: Option<String>,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            commit: true,
            replace: None,
            diff: false,
            comment: None,
        }
    }
}

/// What `edit_config` sent and received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditResult {
    /// Candidate lines actually sent, in order.
    pub request: Vec<String>,
    /// Output of each sent line.
    pub response: Vec<String>,
    /// Non-empty output of `commit`, `save` and `end`.
    pub commit_response: Vec<String>,
}

/// The connection contract used by the modules.
pub trait Connection: Send {
    /// Dialect of the connected device.
    fn platform(&self) -> &PlatformDefinition;

    /// Run one command, answering its prompt if the request has one.
    fn get(&mut self, request: &CommandRequest) -> impl Future<Output = Result<String>> + Send;

    /// Capability document as JSON text.
    fn get_capabilities(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Fetch `running` or `startup` configuration text.
    fn get_config(
        &mut self,
        source: &str,
        flags: &[String],
    ) -> impl Future<Output = Result<String>> + Send;

    /// Load candidate lines, then commit and save.
    fn edit_config(
        &mut self,
        candidate: &[String],
        options: &EditOptions,
    ) -> impl Future<Output = Result<EditResult>> + Send;
}

/// Cliconf driver for the Fujitsu families.
pub struct Cliconf<T: Transport> {
    driver: TerminalDriver<T>,
    device_info: Option<DeviceInfo>,
}

impl<T: Transport> Cliconf<T> {
    pub fn new(driver: TerminalDriver<T>) -> Self {
        Self {
            driver,
            device_info: None,
        }
    }

    /// The terminal driver.
    pub fn driver(&self) -> &TerminalDriver<T> {
        &self.driver
    }

    /// Mutable access to the terminal driver.
    pub fn driver_mut(&mut self) -> &mut TerminalDriver<T> {
        &mut self.driver
    }

    /// Open the terminal session.
    pub async fn open(&mut self) -> Result<()> {
        self.driver.open().await
    }

    /// Enter privileged mode.
    pub async fn escalate(&mut self, password: Option<&SecretString>) -> Result<()> {
        self.driver.escalate(password).await
    }

    /// Leave configuration and privileged mode, then close the session.
    pub async fn close(&mut self) -> Result<()> {
        self.driver.close().await
    }

    /// Device info from the system-info command and the prompt.
    ///
    /// Fields whose regex does not match are absent. The result is
    /// cached for the session.
    pub async fn get_device_info(&mut self) -> Result<DeviceInfo> {
        if let Some(info) = &self.device_info {
            return Ok(info.clone());
        }

        let platform = self.driver.platform();
        let command = platform.commands.system_info.clone();
        let mut info = DeviceInfo {
            network_os: platform.name.clone(),
            ..Default::default()
        };

        let output = match self.driver.send_command(&command).await {
            Ok(response) => response.result,
            Err(Error::Driver(DriverError::CommandFailed { message, .. })) => {
                warn!("'{}' failed: {}", command, message);
                String::new()
            }
            Err(e) => return Err(e),
        };

        let patterns = &self.driver.platform().device_info;
        info.network_os_version = patterns
            .version
            .captures(&output)
            .and_then(|c| c.get(1))
            .map(|m| {
                let version = m.as_str().trim();
                if patterns.strip_version_commas {
                    version.trim_matches(',').trim().to_string()
                } else {
                    version.to_string()
                }
            })
            .filter(|version| !version.is_empty());
        info.network_os_model = patterns
            .model
            .captures(&output)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string());
        info.network_os_hostname = self.driver.prompt().and_then(hostname_from_prompt);

        debug!("device info: {:?}", info);
        self.device_info = Some(info.clone());
        Ok(info)
    }

    /// Static operation flags.
    pub fn get_device_operations(&self) -> DeviceOperations {
        DeviceOperations::default()
    }

    /// Typed capability document.
    pub async fn capabilities(&mut self) -> Result<CapabilityDocument> {
        Ok(CapabilityDocument::new(self.get_device_info().await?))
    }

    /// Diff generation is not available on these families.
    pub fn get_diff(&self) -> String {
        "{}".to_string()
    }

    fn require_privileged(&self) -> Result<()> {
        if self.driver.mode().is_privileged() {
            Ok(())
        } else {
            Err(ConfigError::PrivilegeRequired.into())
        }
    }

    /// `end`, confirming a discard if the device asks.
    fn end_request(&self) -> Result<CommandRequest> {
        let platform = self.driver.platform();
        let command = platform
            .deescalate_command(SessionMode::Configuration)
            .unwrap_or("end");
        let confirm = platform
            .confirmation_pattern()
            .map_err(ChannelError::InvalidPattern)?;
        Ok(CommandRequest::new(command)
            .with_prompt_regex(confirm)
            .with_answer(platform.commands.confirm.clone()))
    }
}

/// Whether a candidate line is sent to the device.
///
/// Blank lines, `#` comments and the session-ending commands are
/// dropped; the driver issues `commit` and `end` itself.
pub fn is_candidate_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#') && !matches!(line, "end" | "commit" | "discard")
}

impl<T: Transport> Connection for Cliconf<T> {
    fn platform(&self) -> &PlatformDefinition {
        self.driver.platform()
    }

    async fn get(&mut self, request: &CommandRequest) -> Result<String> {
        Ok(self.driver.send_request(request).await?.result)
    }

    async fn get_capabilities(&mut self) -> Result<String> {
        let document = self.capabilities().await?;
        Ok(serde_json::to_string(&document).map_err(ModuleError::Json)?)
    }

    async fn get_config(&mut self, source: &str, flags: &[String]) -> Result<String> {
        self.require_privileged()?;

        let commands = &self.driver.platform().commands;
        let base = match source {
            "running" => commands.show_running.clone(),
            "startup" => commands.show_startup.clone(),
            other => {
                return Err(ConfigError::UnsupportedSource {
                    name: other.to_string(),
                }
                .into());
            }
        };

        let command = std::iter::once(base.as_str())
            .chain(flags.iter().map(|flag| flag.trim()).filter(|flag| !flag.is_empty()))
            .collect::<Vec<_>>()
            .join(" ");

        let response = self.driver.send_command(&command).await?;
        Ok(response.result.trim().to_string())
    }

    async fn edit_config(&mut self, candidate: &[String], options: &EditOptions) -> Result<EditResult> {
        self.require_privileged()?;

        if candidate.iter().all(|line| line.trim().is_empty()) {
            return Err(ConfigError::EmptyCandidate.into());
        }
        if !options.commit {
            return Err(ConfigError::CheckModeUnsupported.into());
        }
        if options.replace.is_some() || options.diff || options.comment.is_some() {
            debug!("edit_config ignores replace, diff and comment");
        }

        let platform = self.driver.platform();
        let configure = platform
            .escalate_command(SessionMode::Configuration)
            .unwrap_or("configure")
            .to_string();
        let commit = platform.commands.commit.clone();
        let save = platform.commands.save.clone();
        let end = self.end_request()?;

        self.driver.send_command(&configure).await?;

        let mut result = EditResult::default();
        for line in candidate.iter().filter(|line| is_candidate_line(line)) {
            let line = line.trim();
            match self.driver.send_command(line).await {
                Ok(response) => {
                    result.request.push(line.to_string());
                    result.response.push(response.result);
                }
                Err(e) => {
                    if let Err(exit) = self.driver.send_request(&end).await {
                        debug!("leaving configuration mode failed: {}", exit);
                    }
                    return Err(e);
                }
            }
        }

        for request in [
            CommandRequest::new(commit),
            CommandRequest::new(save),
            end,
        ] {
            let response = self.driver.send_request(&request).await?;
            if !response.result.trim().is_empty() {
                result.commit_response.push(response.result);
            }
        }

        Ok(result)
    }
}
