//! Load configuration lines and save the result.

use std::str::FromStr;

use log::{debug, info, warn};
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::check_network_api;
use crate::cliconf::{ConfigCache, Connection, EditOptions, EditResult};
use crate::driver::CommandRequest;
use crate::error::{ChannelError, Result};

/// When to copy the running configuration to startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveWhen {
    Always,
    #[default]
    Never,
    /// When running and startup differ.
    Modified,
    /// When this run changed the device.
    Changed,
}

impl FromStr for SaveWhen {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "always" => Ok(SaveWhen::Always),
            "never" => Ok(SaveWhen::Never),
            "modified" => Ok(SaveWhen::Modified),
            "changed" => Ok(SaveWhen::Changed),
            other => Err(format!(
                "save_when must be one of always, never, modified, changed; got '{other}'"
            )),
        }
    }
}

/// Arguments of the config action.
#[derive(Debug, Clone, Default)]
pub struct ConfigArgs {
    pub lines: Vec<String>,
    pub save_when: SaveWhen,
    /// Regexes; matching lines are left out of the modified comparison.
    pub diff_ignore_lines: Vec<String>,
}

/// Result document of the config action.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigResult {
    pub changed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<EditResult>,
    pub warnings: Vec<String>,
}

/// SHA-256 of a configuration, hex encoded.
///
/// Trailing whitespace and blank lines are ignored, as are lines
/// matching any of `ignore`.
pub fn config_hash(text: &str, ignore: &[Regex]) -> String {
    let mut hasher = Sha256::new();
    for line in text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !ignore.iter().any(|pattern| pattern.is_match(line)))
    {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

/// Apply `lines`, then save according to `save_when`.
///
/// In check mode nothing is sent; a save that would happen is reported
/// as a warning and still marks the result changed.
pub async fn run<C: Connection>(
    conn: &mut C,
    cache: &mut ConfigCache,
    args: &ConfigArgs,
    check_mode: bool,
) -> Result<ConfigResult> {
    check_network_api(conn).await?;

    let ignore = args
        .diff_ignore_lines
        .iter()
        .map(|pattern| Regex::new(pattern).map_err(ChannelError::InvalidPattern))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut result = ConfigResult::default();

    if !args.lines.is_empty() && !check_mode {
        let edit = conn.edit_config(&args.lines, &EditOptions::default()).await?;
        cache.invalidate();
        result.changed = true;
        result.commands = args.lines.clone();
        result.updates = args.lines.clone();
        for diagnostic in &edit.commit_response {
            warn!("commit diagnostic: {}", diagnostic);
        }
        result.warnings.extend(edit.commit_response.iter().cloned());
        result.result = Some(edit);
    }

    let save = match args.save_when {
        SaveWhen::Always => true,
        SaveWhen::Never => false,
        SaveWhen::Changed => result.changed,
        SaveWhen::Modified => {
            // Running is refetched; the cache may be older than startup.
            let running = cache.refresh_running(conn, &[]).await?;
            let startup = conn.get_config("startup", &[]).await?;
            let differ = config_hash(&running, &ignore) != config_hash(&startup, &ignore);
            debug!("running and startup configuration differ: {}", differ);
            differ
        }
    };

    if save {
        save_config(conn, &mut result, check_mode).await?;
    }

    Ok(result)
}

async fn save_config<C: Connection>(
    conn: &mut C,
    result: &mut ConfigResult,
    check_mode: bool,
) -> Result<()> {
    result.changed = true;
    if check_mode {
        result
            .warnings
            .push("Configuration not saved due to check mode".to_string());
        return Ok(());
    }

    let command = conn.platform().commands.save_startup.clone();
    info!("saving configuration with {:?}", command.trim());
    conn.get(&CommandRequest::new(command)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_when_parse() {
        assert_eq!("modified".parse::<SaveWhen>().unwrap(), SaveWhen::Modified);
        assert_eq!(SaveWhen::default(), SaveWhen::Never);
        assert!("sometimes".parse::<SaveWhen>().is_err());
    }

    #[test]
    fn test_hash_ignores_whitespace_and_patterns() {
        let running = "sysname r1  \n\nlan 0 ip address 10.0.0.1/24 3\n! Last change at 10:00\n";
        let startup = "sysname r1\nlan 0 ip address 10.0.0.1/24 3\n! Last change at 09:00\n";
        let ignore = [Regex::new(r"^! Last change").unwrap()];

        assert_ne!(config_hash(running, &[]), config_hash(startup, &[]));
        assert_eq!(config_hash(running, &ignore), config_hash(startup, &ignore));
        assert_eq!(config_hash("", &[]).len(), 64);
    }
}
