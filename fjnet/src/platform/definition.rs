//! Platform definition: the device dialect of one Fujitsu family.

use indexmap::IndexMap;
use regex::Regex as TextRegex;
use regex::bytes::Regex;

use super::privilege_level::{PrivilegeLevel, SessionMode};
use crate::facts::FactDialect;

/// Fixed command strings a family understands.
#[derive(Debug, Clone)]
pub struct CommandSet {
    /// Prints firmware, model and serial information.
    pub system_info: String,
    /// `show running-config`, flags appended.
    pub show_running: String,
    /// `show startup-config`, flags appended.
    pub show_startup: String,
    /// Applies the candidate configuration.
    pub commit: String,
    /// Writes the running configuration to flash.
    pub save: String,
    /// Copies running to startup; used by the config module.
    pub save_startup: String,
    /// Answer to a `(y|[n])` confirmation.
    pub confirm: String,
}

/// Regexes applied to the system-info output for capability negotiation.
#[derive(Debug, Clone)]
pub struct DeviceInfoPatterns {
    /// First capture group is `network_os_version`.
    pub version: TextRegex,
    /// First capture group is `network_os_model`.
    pub model: TextRegex,
    /// Trim trailing commas off the version string.
    pub strip_version_commas: bool,
}

/// Platform definition containing all family-specific data.
///
/// Prompt and error patterns work on raw bytes from the channel;
/// fact and device-info patterns work on decoded text.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform name, also reported as `network_os`.
    pub name: String,

    /// Privilege levels, in prompt classification order.
    pub privilege_levels: IndexMap<SessionMode, PrivilegeLevel>,

    /// Patterns that end a read: the command prompt first, then
    /// confirmation prompts.
    pub stdout_patterns: Vec<Regex>,

    /// Patterns that mark command output as a device error.
    pub stderr_patterns: Vec<Regex>,

    /// Prompt substrings that identify configuration mode.
    pub config_markers: Vec<String>,

    /// Commands to run when the shell opens.
    pub on_open_commands: Vec<String>,

    /// Fixed command strings.
    pub commands: CommandSet,

    /// Device info regexes.
    pub device_info: DeviceInfoPatterns,

    /// Fact collection tables.
    pub facts: FactDialect,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,
}

impl PlatformDefinition {
    /// Create a platform with no prompts, levels or error patterns.
    pub fn new(
        name: impl Into<String>,
        commands: CommandSet,
        device_info: DeviceInfoPatterns,
        facts: FactDialect,
    ) -> Self {
        Self {
            name: name.into(),
            privilege_levels: IndexMap::new(),
            stdout_patterns: vec![],
            stderr_patterns: vec![],
            config_markers: vec![],
            on_open_commands: vec![],
            commands,
            device_info,
            facts,
            terminal_width: 511,
            terminal_height: 24,
        }
    }

    /// Add a privilege level.
    pub fn with_privilege(mut self, level: PrivilegeLevel) -> Self {
        self.privilege_levels.insert(level.mode, level);
        self
    }

    /// Add a pattern that ends a read.
    pub fn with_stdout_pattern(mut self, pattern: Regex) -> Self {
        self.stdout_patterns.push(pattern);
        self
    }

    /// Add a pattern that marks output as a device error.
    pub fn with_stderr_pattern(mut self, pattern: Regex) -> Self {
        self.stderr_patterns.push(pattern);
        self
    }

    /// Add a prompt substring that identifies configuration mode.
    pub fn with_config_marker(mut self, marker: impl Into<String>) -> Self {
        self.config_markers.push(marker.into());
        self
    }

    /// Add a command to run when the shell opens.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Set the PTY size.
    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Get a privilege level by mode.
    pub fn get_privilege(&self, mode: SessionMode) -> Option<&PrivilegeLevel> {
        self.privilege_levels.get(&mode)
    }

    /// Escalation command of a level, if it has one.
    pub fn escalate_command(&self, mode: SessionMode) -> Option<&str> {
        self.get_privilege(mode)
            .and_then(|level| level.escalate_command.as_deref())
    }

    /// De-escalation command of a level, if it has one.
    pub fn deescalate_command(&self, mode: SessionMode) -> Option<&str> {
        self.get_privilege(mode)
            .and_then(|level| level.deescalate_command.as_deref())
    }

    /// Whether a prompt shows configuration mode.
    pub fn is_config_prompt(&self, prompt: &str) -> bool {
        self.config_markers
            .iter()
            .any(|marker| prompt.contains(marker.as_str()))
    }

    /// Whether a prompt is a yes/no confirmation rather than a command prompt.
    pub fn is_confirmation_prompt(&self, prompt: &str) -> bool {
        self.stdout_patterns
            .iter()
            .skip(1)
            .any(|pattern| pattern.is_match(prompt.as_bytes()))
    }

    /// One regex matching any confirmation prompt.
    pub fn confirmation_pattern(&self) -> Result<Regex, regex::Error> {
        let alternatives: Vec<String> = self
            .stdout_patterns
            .iter()
            .skip(1)
            .map(|pattern| format!("(?:{})", pattern.as_str()))
            .collect();
        Regex::new(&alternatives.join("|"))
    }

    /// First stderr pattern found in `output`, as matched text.
    pub fn detect_failure(&self, output: &str) -> Option<String> {
        self.stderr_patterns.iter().find_map(|pattern| {
            pattern
                .find(output.as_bytes())
                .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
        })
    }
}
