//! Capability document returned by `get_capabilities`.

use serde::{Deserialize, Serialize};

/// RPCs every family answers.
pub const RPC: [&str; 6] = [
    "get_config",
    "edit_config",
    "get_capabilities",
    "get",
    "commit",
    "discard_changes",
];

/// Facts about the device, gathered from system info and the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub network_os: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_os_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_os_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_os_hostname: Option<String>,
}

/// Static operation flags. Identical for all three families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceOperations {
    pub supports_replace: bool,
    pub supports_commit: bool,
    pub supports_rollback: bool,
    pub supports_defaults: bool,
    pub supports_onbox_diff: bool,
    pub supports_commit_comment: bool,
    pub supports_multiline_delimiter: bool,
    pub support_match: bool,
    pub support_diff_ignore_lines: bool,
    pub supports_generate_diff: bool,
}

impl Default for DeviceOperations {
    fn default() -> Self {
        Self {
            supports_replace: false,
            supports_commit: true,
            supports_rollback: false,
            supports_defaults: true,
            supports_onbox_diff: true,
            supports_commit_comment: false,
            supports_multiline_delimiter: false,
            support_match: false,
            support_diff_ignore_lines: false,
            supports_generate_diff: false,
        }
    }
}

/// The full capability document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDocument {
    pub rpc: Vec<String>,
    pub network_api: String,
    pub device_info: DeviceInfo,
    pub device_operations: DeviceOperations,
    pub format: Vec<String>,
    #[serde(rename = "match")]
    pub match_: Vec<String>,
    pub replace: Vec<String>,
}

impl CapabilityDocument {
    /// Build the document for a device.
    pub fn new(device_info: DeviceInfo) -> Self {
        Self {
            rpc: RPC.iter().map(|rpc| rpc.to_string()).collect(),
            network_api: "cliconf".to_string(),
            device_info,
            device_operations: DeviceOperations::default(),
            format: vec!["text".to_string()],
            match_: vec!["none".to_string()],
            replace: vec!["line".to_string()],
        }
    }
}

/// Hostname shown by a prompt, without mode markers.
///
/// `Si-R220C(config)#` gives `Si-R220C`.
pub fn hostname_from_prompt(prompt: &str) -> Option<String> {
    let prompt = prompt.trim().trim_end_matches(['>', '#']);
    let hostname = prompt.split('(').next().unwrap_or(prompt).trim();
    (!hostname.is_empty()).then(|| hostname.to_string())
}
