//! Running-configuration cache for one session.

use std::collections::HashMap;

use log::debug;

use super::Connection;
use crate::error::Result;

/// Fetched `show running-config [flags]` text, keyed by the normalized
/// command. Entries live until [`invalidate`](Self::invalidate) is called
/// or [`refresh_running`](Self::refresh_running) replaces them.
#[derive(Debug, Default, Clone)]
pub struct ConfigCache {
    entries: HashMap<String, String>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for a running-config fetch with `flags`.
    pub fn key(flags: &[String]) -> String {
        std::iter::once("show running-config")
            .chain(flags.iter().flat_map(|flag| flag.split_whitespace()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Running configuration, fetched through `conn` on first use.
    pub async fn running_config<C: Connection>(
        &mut self,
        conn: &mut C,
        flags: &[String],
    ) -> Result<String> {
        let key = Self::key(flags);
        if let Some(text) = self.entries.get(&key) {
            debug!("config cache hit for '{}'", key);
            return Ok(text.clone());
        }

        let text = conn.get_config("running", flags).await?;
        self.entries.insert(key, text.clone());
        Ok(text)
    }

    /// Running configuration fetched fresh through `conn`, replacing any
    /// cached entry for the same flags.
    pub async fn refresh_running<C: Connection>(
        &mut self,
        conn: &mut C,
        flags: &[String],
    ) -> Result<String> {
        let key = Self::key(flags);
        let text = conn.get_config("running", flags).await?;
        debug!("refreshed '{}'", key);
        self.entries.insert(key, text.clone());
        Ok(text)
    }

    /// Drop every entry; the device configuration changed.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    /// Cached text for an exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalizes_whitespace() {
        assert_eq!(ConfigCache::key(&[]), "show running-config");
        assert_eq!(
            ConfigCache::key(&["  lan  0".to_string(), "ip".to_string()]),
            "show running-config lan 0 ip"
        );
    }
}
