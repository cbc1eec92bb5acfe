//! Host-facing actions: `command`, `config` and `facts`.
//!
//! Each action runs against any [`Connection`] and returns a
//! serializable result document. Errors map to a [`Failure`] document.

pub mod command;
pub mod conditional;
pub mod config;
pub mod facts;

use log::debug;
use serde::Serialize;

use crate::cliconf::Connection;
use crate::driver::CommandRequest;
use crate::error::{Error, ModuleError, Result};

/// Fail unless the connection speaks cliconf.
pub async fn check_network_api<C: Connection>(conn: &mut C) -> Result<()> {
    let capabilities = conn.get_capabilities().await?;
    let document: serde_json::Value =
        serde_json::from_str(&capabilities).map_err(ModuleError::Json)?;

    match document.get("network_api").and_then(|api| api.as_str()) {
        Some("cliconf") => Ok(()),
        other => Err(ModuleError::InvalidConnectionType {
            network_api: other.unwrap_or("unknown").to_string(),
        }
        .into()),
    }
}

/// Run each request in order and collect the outputs.
pub async fn run_commands<C: Connection>(
    conn: &mut C,
    commands: &[CommandRequest],
) -> Result<Vec<String>> {
    let mut responses = Vec::with_capacity(commands.len());
    for request in commands {
        debug!("running {:?}", request);
        responses.push(conn.get(request).await?);
    }
    Ok(responses)
}

/// Split every output into its lines.
pub fn to_lines(stdout: &[String]) -> Vec<Vec<String>> {
    stdout
        .iter()
        .map(|output| output.split('\n').map(String::from).collect())
        .collect()
}

/// Parse a command argument: a JSON object
/// (`{"command": ..., "prompt": ..., "answer": ...}`) or a plain command.
pub fn parse_command_spec(spec: &str) -> Result<CommandRequest> {
    if spec.trim_start().starts_with('{') {
        Ok(serde_json::from_str(spec).map_err(ModuleError::Json)?)
    } else {
        Ok(CommandRequest::new(spec))
    }
}

/// Failure document printed when an action fails.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub failed: bool,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_conditions: Option<Vec<String>>,
}

impl From<&Error> for Failure {
    fn from(error: &Error) -> Self {
        let failed_conditions = match error {
            Error::Module(module) => module.failed_conditions().map(<[String]>::to_vec),
            _ => None,
        };
        Self {
            failed: true,
            msg: error.to_string(),
            failed_conditions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriverError;

    #[test]
    fn test_to_lines() {
        let lines = to_lines(&["a\nb".to_string(), String::new()]);
        assert_eq!(lines, vec![vec!["a", "b"], vec![""]]);
    }

    #[test]
    fn test_parse_command_spec() {
        let plain = parse_command_spec("show system information").unwrap();
        assert_eq!(plain.command, "show system information");

        let full = parse_command_spec(r#"{"command": "save", "answer": "y"}"#).unwrap();
        assert_eq!(full.command, "save");
        assert_eq!(full.answer.as_deref(), Some("y"));

        assert!(parse_command_spec("{not json").is_err());
    }

    #[test]
    fn test_failure_document() {
        let error: Error = ModuleError::ConditionsUnmet {
            failed_conditions: vec!["result[0] contains x".into()],
        }
        .into();
        let json = serde_json::to_value(Failure::from(&error)).unwrap();
        assert_eq!(json["failed"], true);
        assert_eq!(
            json["msg"],
            "One or more conditional statements have not been satisfied"
        );
        assert_eq!(json["failed_conditions"][0], "result[0] contains x");

        let error: Error = DriverError::CommandFailed {
            command: "show foo".into(),
            message: "% Incomplete command".into(),
        }
        .into();
        let json = serde_json::to_value(Failure::from(&error)).unwrap();
        assert!(json.get("failed_conditions").is_none());
        assert!(json["msg"].as_str().unwrap().contains("show foo"));
    }
}
