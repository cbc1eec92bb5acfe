//! Fact collection: fixed `show` commands parsed into a flat mapping.
//!
//! Parsing is best effort. A field whose regex does not match is left
//! out of the result, and a fact command rejected by the device only
//! produces a warning.
//!
//! # Example
//!
//! ```rust
//! use fjnet::facts::{FactSubset, resolve_subsets};
//!
//! let subsets = resolve_subsets(&["all".into(), "!config".into()]).unwrap();
//! assert!(!subsets.contains(&FactSubset::Config));
//! assert!(subsets.contains(&FactSubset::Default));
//! ```

mod blocks;
mod dialect;
mod table;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub use blocks::split_blocks;
pub use dialect::{FactDialect, InterfaceFacts, PortFacts, ScalarFacts, parse_config};
pub use table::FactTable;

use crate::cliconf::Connection;
use crate::driver::CommandRequest;
use crate::error::{DriverError, Error, ModuleError, Result};

/// Prefix applied to every fact name handed back to callers.
pub const FACT_PREFIX: &str = "ansible_net_";

/// A fact value: text, a list of text, or a nested mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Text(String),
    List(Vec<String>),
    Map(IndexMap<String, FactValue>),
}

impl FactValue {
    /// The text value, if this is `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The list value, if this is `List`.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FactValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// The nested mapping, if this is `Map`.
    pub fn as_map(&self) -> Option<&IndexMap<String, FactValue>> {
        match self {
            FactValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Ordered fact mapping.
pub type Facts = IndexMap<String, FactValue>;

/// Named groups of facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactSubset {
    Default,
    Hardware,
    Interfaces,
    Config,
}

impl FactSubset {
    pub const ALL: [FactSubset; 4] = [
        FactSubset::Default,
        FactSubset::Hardware,
        FactSubset::Interfaces,
        FactSubset::Config,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FactSubset::Default => "default",
            FactSubset::Hardware => "hardware",
            FactSubset::Interfaces => "interfaces",
            FactSubset::Config => "config",
        }
    }
}

impl fmt::Display for FactSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactSubset {
    type Err = ModuleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FactSubset::ALL
            .into_iter()
            .find(|subset| subset.as_str() == s)
            .ok_or_else(|| ModuleError::BadSubset {
                subset: s.to_string(),
            })
    }
}

/// Resolve a `gather_subset` list.
///
/// `all` adds every subset and `!all` excludes every subset; `!name`
/// excludes one. An empty include set means every subset. `default` is
/// always part of the result.
pub fn resolve_subsets(requested: &[String]) -> Result<BTreeSet<FactSubset>> {
    let mut include = BTreeSet::new();
    let mut exclude = BTreeSet::new();

    for entry in requested {
        let entry = entry.trim();
        let (negated, name) = match entry.strip_prefix('!') {
            Some(name) => (true, name.trim()),
            None => (false, entry),
        };

        if name == "all" {
            if negated {
                exclude.extend(FactSubset::ALL);
            } else {
                include.extend(FactSubset::ALL);
            }
            continue;
        }

        let subset: FactSubset = name.parse()?;
        if negated {
            exclude.insert(subset);
        } else {
            include.insert(subset);
        }
    }

    if include.is_empty() {
        include.extend(FactSubset::ALL);
    }
    include.retain(|subset| !exclude.contains(subset));
    include.insert(FactSubset::Default);
    Ok(include)
}

/// Run every subset's commands over `conn` and merge the parsed facts.
///
/// Device-reported command errors become warnings and the command's
/// output is treated as empty. Any other error aborts collection.
pub async fn collect<C: Connection>(
    conn: &mut C,
    subsets: &BTreeSet<FactSubset>,
    warnings: &mut Vec<String>,
) -> Result<Facts> {
    let mut facts = Facts::new();

    for &subset in subsets {
        let commands: Vec<String> = conn
            .platform()
            .facts
            .commands(subset)
            .into_iter()
            .map(String::from)
            .collect();

        let mut outputs = Vec::with_capacity(commands.len());
        for command in commands {
            debug!("collecting {} facts with '{}'", subset, command);
            match conn.get(&CommandRequest::new(command.as_str())).await {
                Ok(output) => outputs.push(output),
                Err(Error::Driver(DriverError::CommandFailed { command, message })) => {
                    warn!("fact command '{}' failed: {}", command, message);
                    warnings.push(format!("command '{command}' failed: {message}"));
                    outputs.push(String::new());
                }
                Err(e) => return Err(e),
            }
        }

        facts.extend(conn.platform().facts.parse(subset, &outputs));
    }

    Ok(facts)
}

/// Prefix every key with [`FACT_PREFIX`].
pub fn namespace(facts: Facts) -> Facts {
    facts
        .into_iter()
        .map(|(key, value)| (format!("{FACT_PREFIX}{key}"), value))
        .collect()
}
