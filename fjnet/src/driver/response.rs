//! Response type for command execution results.

use std::time::Duration;

/// Response from a command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// The command output (normalized - command echo and trailing prompt removed).
    pub result: String,

    /// The raw output before normalization.
    pub raw_result: String,

    /// The prompt that was matched at the end.
    pub prompt: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,
}

impl Response {
    /// Create a new response.
    pub fn new(
        command: impl Into<String>,
        result: impl Into<String>,
        raw_result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            raw_result: raw_result.into(),
            prompt: prompt.into(),
            elapsed,
        }
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

/// Clean command output that has already had its trailing prompt cut off.
///
/// Removes carriage returns, the echoed command line and blank lines at
/// either end.
pub(crate) fn normalize_output(body: &str, command: &str) -> String {
    let body = body.replace('\r', "");
    let mut lines: Vec<&str> = body.lines().collect();

    let echo = command.trim();
    if !echo.is_empty()
        && lines
            .first()
            .is_some_and(|first| first.trim_end().ends_with(echo))
    {
        lines.remove(0);
    }

    let start = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(start, |i| i + 1);

    lines[start..end.max(start)].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_echo_and_blank_edges() {
        let body = "show clock\r\n\r\nThu Jan  1 10:59:30 1970\r\n\r\n";
        assert_eq!(normalize_output(body, "show clock"), "Thu Jan  1 10:59:30 1970");
    }

    #[test]
    fn test_normalize_keeps_inner_blank_lines() {
        let body = "show ether\n[LAN PORT-0]\nstatus : up\n\n[LAN PORT-1]\n";
        assert_eq!(
            normalize_output(body, "show ether"),
            "[LAN PORT-0]\nstatus : up\n\n[LAN PORT-1]"
        );
    }

    #[test]
    fn test_normalize_without_echo() {
        assert_eq!(normalize_output("\n  \n", "save"), "");
        assert_eq!(normalize_output("done\n", "save"), "done");
    }

    #[test]
    fn test_normalize_carriage_return_command() {
        let body = "copy running-config startup-config\r\r\ncopied\r\n";
        assert_eq!(
            normalize_output(body, "copy running-config startup-config\r"),
            "copied"
        );
    }
}
