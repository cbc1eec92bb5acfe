//! Run show commands, optionally until `wait_for` conditionals hold.

use std::str::FromStr;
use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;

use super::conditional::Conditional;
use super::{check_network_api, run_commands, to_lines};
use crate::cliconf::Connection;
use crate::driver::CommandRequest;
use crate::error::{ModuleError, Result};

/// How many conditionals must hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    #[default]
    All,
    Any,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(MatchMode::All),
            "any" => Ok(MatchMode::Any),
            other => Err(format!("match must be 'all' or 'any', got '{other}'")),
        }
    }
}

/// Arguments of the command action.
#[derive(Debug, Clone)]
pub struct CommandArgs {
    pub commands: Vec<CommandRequest>,
    pub wait_for: Vec<String>,
    pub match_mode: MatchMode,
    /// Maximum number of command rounds.
    pub retries: u32,
    /// Pause between rounds.
    pub interval: Duration,
}

impl Default for CommandArgs {
    fn default() -> Self {
        Self {
            commands: vec![],
            wait_for: vec![],
            match_mode: MatchMode::All,
            retries: 10,
            interval: Duration::from_secs(1),
        }
    }
}

/// Result document of the command action.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResult {
    pub changed: bool,
    pub stdout: Vec<String>,
    pub stdout_lines: Vec<Vec<String>>,
    pub warnings: Vec<String>,
}

/// Drop non-`show` commands in check mode, with a warning for each.
pub fn filter_check_mode(
    commands: &[CommandRequest],
    check_mode: bool,
    warnings: &mut Vec<String>,
) -> Vec<CommandRequest> {
    commands
        .iter()
        .filter(|request| {
            if check_mode && !request.is_show() {
                warnings.push(format!(
                    "only show commands are supported when using check mode, not executing `{}`",
                    request.command
                ));
                false
            } else {
                true
            }
        })
        .cloned()
        .collect()
}

/// Run the commands until the conditionals hold or the retries run out.
///
/// Each round runs every command, drops the conditionals that now hold
/// (all of them, in `any` mode, once one holds), then sleeps. At least
/// one round always runs.
pub async fn run<C: Connection>(
    conn: &mut C,
    args: &CommandArgs,
    check_mode: bool,
) -> Result<CommandResult> {
    check_network_api(conn).await?;

    let mut warnings = Vec::new();
    let commands = filter_check_mode(&args.commands, check_mode, &mut warnings);
    for warning in &warnings {
        warn!("{}", warning);
    }

    let mut conditionals = args
        .wait_for
        .iter()
        .map(|raw| Conditional::new(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut retries = args.retries.max(1);
    let mut responses = Vec::new();

    while retries > 0 {
        responses = run_commands(conn, &commands).await?;

        if conditionals.iter().any(|c| c.evaluate(&responses)) && args.match_mode == MatchMode::Any {
            conditionals.clear();
        } else {
            conditionals.retain(|c| !c.evaluate(&responses));
        }

        if conditionals.is_empty() {
            break;
        }

        retries -= 1;
        debug!(
            "{} conditionals unmet, {} rounds left",
            conditionals.len(),
            retries
        );
        tokio::time::sleep(args.interval).await;
    }

    if !conditionals.is_empty() {
        return Err(ModuleError::ConditionsUnmet {
            failed_conditions: conditionals.into_iter().map(|c| c.raw).collect(),
        }
        .into());
    }

    Ok(CommandResult {
        changed: false,
        stdout_lines: to_lines(&responses),
        stdout: responses,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_mode_keeps_show_only() {
        let commands = vec![
            CommandRequest::new("show system status"),
            CommandRequest::new("reset"),
        ];
        let mut warnings = Vec::new();
        let kept = filter_check_mode(&commands, true, &mut warnings);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].command, "show system status");
        assert_eq!(
            warnings,
            ["only show commands are supported when using check mode, not executing `reset`"]
        );

        let kept = filter_check_mode(&commands, false, &mut warnings);
        assert_eq!(kept.len(), 2);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_match_mode_parse() {
        assert_eq!("any".parse::<MatchMode>().unwrap(), MatchMode::Any);
        assert!("some".parse::<MatchMode>().is_err());
    }
}
