//! Terminal driver: prompt tracking, privilege changes and error detection
//! on top of any [`Transport`].

use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use regex::bytes::Regex;
use secrecy::{ExposeSecret, SecretString};

use super::privilege::PrivilegeManager;
use super::request::CommandRequest;
use super::response::{Response, normalize_output};
use crate::error::{ChannelError, DriverError, Result};
use crate::platform::{PlatformDefinition, SessionMode};
use crate::transport::Transport;

/// Default read timeout for one command exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Drives one interactive CLI session for a device family.
///
/// The driver keeps the last prompt it saw and the session mode that
/// prompt implies. Every command's output is checked against the
/// family's error patterns; a match is returned as
/// [`DriverError::CommandFailed`].
pub struct TerminalDriver<T: Transport> {
    /// Platform definition.
    platform: PlatformDefinition,

    /// Underlying session.
    transport: T,

    /// Session mode tracking.
    privilege_manager: PrivilegeManager,

    /// Read timeout per exchange.
    timeout: Duration,

    /// Last prompt read, trimmed.
    prompt: Option<String>,

    /// Whether `open()` completed.
    opened: bool,
}

impl<T: Transport> TerminalDriver<T> {
    /// Create a driver over an already connected transport.
    pub fn new(platform: PlatformDefinition, transport: T) -> Self {
        let privilege_manager = PrivilegeManager::new(platform.privilege_levels.clone());
        Self {
            platform,
            transport,
            privilege_manager,
            timeout: DEFAULT_TIMEOUT,
            prompt: None,
            opened: false,
        }
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    /// Get the privilege manager.
    pub fn privilege_manager(&self) -> &PrivilegeManager {
        &self.privilege_manager
    }

    /// Current session mode.
    pub fn mode(&self) -> SessionMode {
        self.privilege_manager.current()
    }

    /// Last prompt seen, if any.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether the shell has been opened.
    pub fn is_open(&self) -> bool {
        self.opened
    }

    /// Set the read timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Read the login prompt and prepare the terminal.
    ///
    /// Failing to disable the pager is fatal: paged output would stall
    /// every later read.
    pub async fn open(&mut self) -> Result<()> {
        if self.opened {
            return Err(DriverError::AlreadyConnected.into());
        }

        let (data, _, _) = self.read_response(None).await?;
        let text = String::from_utf8_lossy(&data);
        let (_, prompt) = split_prompt(&text);
        self.update_prompt(prompt);
        self.opened = true;
        debug!(
            "opened {} session at prompt '{}' ({})",
            self.platform.name,
            prompt,
            self.mode()
        );

        self.on_open_shell().await
    }

    async fn on_open_shell(&mut self) -> Result<()> {
        for command in self.platform.on_open_commands.clone() {
            if let Err(e) = self.send_command(&command).await {
                warn!("terminal setup command '{}' failed: {}", command, e);
                return Err(DriverError::TerminalSetup {
                    message: "unable to set terminal parameters".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Send a command and wait for the prompt.
    pub async fn send_command(&mut self, command: &str) -> Result<Response> {
        self.send_request(&CommandRequest::new(command)).await
    }

    /// Send multiple commands sequentially.
    pub async fn send_commands(&mut self, commands: &[&str]) -> Result<Vec<Response>> {
        let mut responses = Vec::with_capacity(commands.len());
        for command in commands {
            responses.push(self.send_command(command).await?);
        }
        Ok(responses)
    }

    /// Send a request, answering its interactive prompt if it shows up.
    pub async fn send_request(&mut self, request: &CommandRequest) -> Result<Response> {
        if !self.opened {
            return Err(DriverError::NotConnected.into());
        }

        let start = Instant::now();
        debug!("sending command: {:?}", request.command);
        self.transport.send(&request.command).await?;

        let (mut data, mut lossy, answered) = self.read_response(request.prompt.as_ref()).await?;
        if answered {
            let answer = request.answer.as_deref().unwrap_or("");
            if request.hidden {
                debug!("answering prompt of {:?} with hidden input", request.command);
            } else {
                debug!("answering prompt of {:?} with {:?}", request.command, answer);
            }
            self.transport.send(answer).await?;

            let (more, more_lossy, _) = self.read_response(None).await?;
            data.extend_from_slice(&more);
            lossy |= more_lossy;
        }

        let raw = match String::from_utf8(data) {
            Ok(raw) if !lossy => raw,
            _ => {
                return Err(DriverError::DecodeFailed {
                    command: request.command.clone(),
                }
                .into());
            }
        };

        let (body, prompt) = split_prompt(&raw);
        self.update_prompt(prompt);

        let result = normalize_output(body, &request.command);
        trace!("output of {:?}: {:?}", request.command, result);

        if let Some(message) = self.platform.detect_failure(&result) {
            return Err(DriverError::CommandFailed {
                command: request.command.trim().to_string(),
                message,
            }
            .into());
        }

        Ok(Response::new(
            request.command.as_str(),
            result,
            raw.as_str(),
            prompt,
            start.elapsed(),
        ))
    }

    /// Enter privileged mode with `admin`, answering the password prompt
    /// when a password is given.
    ///
    /// No-op when the prompt already ends in `#`.
    pub async fn escalate(&mut self, password: Option<&SecretString>) -> Result<()> {
        if self.prompt_is_privileged() {
            return Ok(());
        }

        let level = self
            .platform
            .get_privilege(SessionMode::Privileged)
            .ok_or_else(|| DriverError::InvalidConfig {
                message: format!("{} has no privileged level", self.platform.name),
            })?;
        let command = level
            .escalate_command
            .clone()
            .ok_or_else(|| DriverError::InvalidConfig {
                message: format!("{} has no escalation command", self.platform.name),
            })?;

        let mut request = CommandRequest::new(command);
        if let (Some(password), Some(prompt)) = (password, level.escalate_prompt.clone()) {
            request = request
                .with_prompt_regex(prompt)
                .with_answer(password.expose_secret())
                .hidden();
        }

        let outcome = self.send_request(&request).await;
        let prompt = self.prompt.clone().unwrap_or_default();
        match outcome {
            Ok(_) if self.prompt_is_privileged() => {
                debug!("privilege escalated at prompt '{}'", prompt);
                Ok(())
            }
            Ok(_) => Err(DriverError::PrivilegeEscalation {
                prompt,
                message: "failed to elevate privilege".to_string(),
            }
            .into()),
            Err(e) => Err(DriverError::PrivilegeEscalation {
                prompt,
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Leave configuration mode (confirming if asked), then leave
    /// privileged mode.
    ///
    /// Does nothing when no prompt has been seen.
    pub async fn deescalate(&mut self) -> Result<()> {
        let Some(prompt) = self.prompt.clone() else {
            return Ok(());
        };

        if self.platform.is_config_prompt(&prompt) {
            let command = self
                .platform
                .deescalate_command(SessionMode::Configuration)
                .unwrap_or("end")
                .to_string();
            let confirm = self
                .platform
                .confirmation_pattern()
                .map_err(ChannelError::InvalidPattern)?;
            let request = CommandRequest::new(command)
                .with_prompt_regex(confirm)
                .with_answer(self.platform.commands.confirm.clone());
            self.send_request(&request).await?;
        }

        if self.prompt_is_privileged() {
            let command = self
                .platform
                .deescalate_command(SessionMode::Privileged)
                .unwrap_or("exit")
                .to_string();
            self.send_command(&command).await?;
        }

        Ok(())
    }

    /// Best-effort de-escalation, then close the transport.
    pub async fn close(&mut self) -> Result<()> {
        if self.opened {
            if let Err(e) = self.deescalate().await {
                debug!("de-escalation on close failed: {}", e);
            }
            self.opened = false;
        }
        self.transport.close().await
    }

    fn prompt_is_privileged(&self) -> bool {
        self.prompt
            .as_deref()
            .is_some_and(|prompt| prompt.ends_with('#'))
    }

    /// Read until a stdout pattern, or `request_prompt` (tried first).
    ///
    /// Returns the bytes, whether they were lossy, and whether
    /// `request_prompt` is what matched.
    async fn read_response(&mut self, request_prompt: Option<&Regex>) -> Result<(Vec<u8>, bool, bool)> {
        let mut patterns: Vec<&Regex> = Vec::with_capacity(self.platform.stdout_patterns.len() + 1);
        patterns.extend(request_prompt);
        patterns.extend(self.platform.stdout_patterns.iter());

        let read = self.transport.read_until(&patterns, self.timeout).await?;
        let answered = request_prompt.is_some() && read.matched == 0;
        Ok((read.data, read.lossy, answered))
    }

    /// Record the prompt and the mode it shows.
    ///
    /// Confirmation prompts keep the current mode.
    fn update_prompt(&mut self, prompt: &str) {
        self.prompt = Some(prompt.to_string());
        if self.platform.is_confirmation_prompt(prompt) {
            return;
        }
        match self.privilege_manager.determine_from_prompt(prompt) {
            Ok(mode) => {
                if mode != self.privilege_manager.current() {
                    debug!("session mode {} -> {}", self.privilege_manager.current(), mode);
                }
                let _ = self.privilege_manager.set_current(mode);
            }
            Err(e) => warn!("{}", e),
        }
    }
}

/// Split output into the body and the trailing prompt line (trimmed).
pub(crate) fn split_prompt(raw: &str) -> (&str, &str) {
    match raw.rfind('\n') {
        Some(index) => (&raw[..index], raw[index + 1..].trim()),
        None => ("", raw.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_prompt() {
        assert_eq!(
            split_prompt("show clock\r\n12:00\r\nSi-R220C# "),
            ("show clock\r\n12:00\r", "Si-R220C#")
        );
        assert_eq!(split_prompt("ipcom> "), ("", "ipcom>"));
    }
}
