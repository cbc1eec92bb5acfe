//! Session mode tracking.

use indexmap::IndexMap;

use crate::error::{DriverError, Result};
use crate::platform::{PrivilegeLevel, SessionMode};

/// Tracks the session mode and classifies prompts.
///
/// Exactly one mode is current. It only changes through
/// [`set_current`](Self::set_current), which the terminal driver calls
/// after classifying the prompt that ends each command exchange.
#[derive(Debug, Clone)]
pub struct PrivilegeManager {
    /// All defined privilege levels, in classification order.
    levels: IndexMap<SessionMode, PrivilegeLevel>,

    /// Current session mode.
    current: SessionMode,
}

impl PrivilegeManager {
    /// Create a manager starting at the root level (the one without a parent).
    pub fn new(levels: IndexMap<SessionMode, PrivilegeLevel>) -> Self {
        let current = levels
            .values()
            .find(|level| level.previous_priv.is_none())
            .map(|level| level.mode)
            .unwrap_or(SessionMode::Unprivileged);

        Self { levels, current }
    }

    /// Determine the session mode shown by a prompt.
    pub fn determine_from_prompt(&self, prompt: &str) -> Result<SessionMode> {
        self.levels
            .values()
            .find(|level| level.matches(prompt))
            .map(|level| level.mode)
            .ok_or_else(|| {
                DriverError::UnknownPrivilege {
                    prompt: prompt.to_string(),
                }
                .into()
            })
    }

    /// Current session mode.
    pub fn current(&self) -> SessionMode {
        self.current
    }

    /// Current privilege level definition.
    pub fn current_level(&self) -> Option<&PrivilegeLevel> {
        self.levels.get(&self.current)
    }

    /// Set the current session mode.
    pub fn set_current(&mut self, mode: SessionMode) -> Result<()> {
        if self.levels.contains_key(&mode) {
            self.current = mode;
            Ok(())
        } else {
            Err(DriverError::UnknownPrivilege {
                prompt: mode.to_string(),
            }
            .into())
        }
    }

    /// Get a privilege level by mode.
    pub fn get(&self, mode: SessionMode) -> Option<&PrivilegeLevel> {
        self.levels.get(&mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;

    fn manager() -> PrivilegeManager {
        PrivilegeManager::new(Platform::FujitsuSir.definition().privilege_levels)
    }

    #[test]
    fn test_starts_unprivileged() {
        assert_eq!(manager().current(), SessionMode::Unprivileged);
    }

    #[test]
    fn test_determine_from_prompt() {
        let manager = manager();
        assert_eq!(
            manager.determine_from_prompt("Si-R220C>").unwrap(),
            SessionMode::Unprivileged
        );
        assert_eq!(
            manager.determine_from_prompt("Si-R220C# ").unwrap(),
            SessionMode::Privileged
        );
        assert_eq!(
            manager.determine_from_prompt("Si-R220C(config)#").unwrap(),
            SessionMode::Configuration
        );
        assert_eq!(
            manager.determine_from_prompt("ipcom(edit)#").unwrap(),
            SessionMode::Configuration
        );
        assert!(manager.determine_from_prompt("Password:").is_err());
    }

    #[test]
    fn test_set_current() {
        let mut manager = manager();
        manager.set_current(SessionMode::Configuration).unwrap();
        assert_eq!(manager.current(), SessionMode::Configuration);
        assert!(manager.current_level().unwrap().escalate_command.is_some());
    }
}
