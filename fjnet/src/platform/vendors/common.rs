//! Prompt handling shared by every Fujitsu family.
//!
//! # Prompt Examples
//!
//! ```text
//! Si-R220C>                      # unprivileged
//! Si-R220C#                      # privileged (after `admin`)
//! Si-R220C(config)#              # configuration
//! ipcom(edit)#                   # configuration (IPCOM)
//! Do you exit "configure" anyway? (y|[n]):
//! ```
//!
//! # Privilege Chain
//!
//! ```text
//! ┌──────────────┐  admin   ┌────────────┐  configure  ┌───────────────┐
//! │ unprivileged ├──────────► privileged ├─────────────► configuration │
//! │      >       │   exit   │     #      │     end     │ (config)#     │
//! └──────────────┘◄─────────┴────────────┘◄────────────┴───────────────┘
//! ```

use regex::bytes::Regex;

use crate::facts::FactDialect;
use crate::platform::{
    CommandSet, DeviceInfoPatterns, PlatformDefinition, PrivilegeLevel, SessionMode,
};

/// Any prompt, with up to three parenthesized qualifiers.
pub const PROMPT: &str = r"[\r\n]?[\w+\-.:/\[\]]+(?:\([^)]+\)){0,3}(?:[>#]) ?$";

/// `(y|[n])` confirmation, default no.
pub const CONFIRM_NO: &str = r"\?\s+\(y\|\[n\]\):$";

/// `([y]|n)` confirmation, default yes.
pub const CONFIRM_YES: &str = r"\?\s+\(\[y\]\|n\):$";

/// Password prompt printed by `admin`.
pub const PASSWORD_PROMPT: &str = r"(?i)[\r\n]?Password: ?$";

/// Prompt substrings that mean configuration mode.
pub const CONFIG_MARKERS: [&str; 2] = ["(config", "(edit"];

/// Error strings every family prints.
pub const UNKNOWN_COMMAND: &str = r"Unknown commands or command parameters are insufficient";
pub const PERMISSION_DENIED: &str = r"Permission denied, please try again";

/// Build a platform with the shared prompt, privilege and paging setup.
pub fn base(
    name: &str,
    commands: CommandSet,
    device_info: DeviceInfoPatterns,
    facts: FactDialect,
) -> PlatformDefinition {
    let unprivileged = PrivilegeLevel::new(
        SessionMode::Unprivileged,
        r"(?m)^[\w+\-.:/\[\]]+(?:\([^)]+\)){0,3}>\s?$",
    )
    .unwrap();

    // `#` also ends configuration prompts; not_contains keeps them apart
    let privileged = PrivilegeLevel::new(
        SessionMode::Privileged,
        r"(?m)^[\w+\-.:/\[\]]+(?:\([^)]+\)){0,3}#\s?$",
    )
    .unwrap()
    .with_parent(SessionMode::Unprivileged)
    .with_escalate("admin")
    .with_deescalate("exit")
    .with_auth(PASSWORD_PROMPT)
    .unwrap()
    .with_not_contains(CONFIG_MARKERS[0])
    .with_not_contains(CONFIG_MARKERS[1]);

    let configuration = PrivilegeLevel::new(
        SessionMode::Configuration,
        r"(?m)^[\w+\-.:/\[\]]+(?:\([^)]*\))*\((?:config|edit)[^)]*\)(?:\([^)]*\))*#\s?$",
    )
    .unwrap()
    .with_parent(SessionMode::Privileged)
    .with_escalate("configure")
    .with_deescalate("end");

    let mut platform = PlatformDefinition::new(name, commands, device_info, facts)
        .with_privilege(unprivileged)
        .with_privilege(privileged)
        .with_privilege(configuration)
        .with_stdout_pattern(Regex::new(PROMPT).unwrap())
        .with_stdout_pattern(Regex::new(CONFIRM_NO).unwrap())
        .with_stdout_pattern(Regex::new(CONFIRM_YES).unwrap())
        .with_on_open_command("terminal pager disable");

    for marker in CONFIG_MARKERS {
        platform = platform.with_config_marker(marker);
    }
    platform
}

/// Case-sensitive byte regex from a literal pattern.
pub fn pattern(literal: &str) -> Regex {
    Regex::new(literal).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_pattern() {
        let prompt = Regex::new(PROMPT).unwrap();
        assert!(prompt.is_match(b"Si-R220C>"));
        assert!(prompt.is_match(b"Si-R220C# "));
        assert!(prompt.is_match(b"\r\nipcom(edit)#"));
        assert!(prompt.is_match(b"sw(config)(config-if)(x)#"));
        assert!(!prompt.is_match(b"sw(a)(b)(c)(d)#"));
        assert!(!prompt.is_match(b"Status: up since Jan  1 09:01:39 1970"));
    }

    #[test]
    fn test_confirmation_patterns() {
        let no = Regex::new(CONFIRM_NO).unwrap();
        let yes = Regex::new(CONFIRM_YES).unwrap();
        assert!(no.is_match(b"Do you exit \"configure\" anyway? (y|[n]):"));
        assert!(yes.is_match(b"Do you reset? ([y]|n):"));
        assert!(!no.is_match(b"Do you reset? ([y]|n):"));
    }

    #[test]
    fn test_password_prompt() {
        let password = Regex::new(PASSWORD_PROMPT).unwrap();
        assert!(password.is_match(b"admin\r\nPassword: "));
        assert!(password.is_match(b"password:"));
    }
}
