//! Per-family fact commands and parse tables.

use indexmap::IndexMap;
use regex::Regex;

use super::blocks::split_blocks;
use super::table::{FactTable, capture_all};
use super::{FactSubset, FactValue, Facts};

/// A command whose output is parsed with one flat table.
#[derive(Debug, Clone)]
pub struct ScalarFacts {
    pub command: String,
    pub table: FactTable,
}

/// Bracketed per-port sections of `show ether`.
#[derive(Debug, Clone)]
pub struct PortFacts {
    pub command: String,
    /// Fact name the port map is stored under (`lan_port`, `ether_port`).
    pub fact: String,
    pub anchor: Regex,
    pub fields: FactTable,
}

/// Per-interface sections of `show interface`.
#[derive(Debug, Clone)]
pub struct InterfaceFacts {
    pub command: String,
    pub anchor: Regex,
    pub fields: FactTable,
    /// Repeated match; first capture group (or whole match) is one address.
    pub ipv4: Regex,
    pub ipv6: Regex,
}

/// Fact collection tables of one device family.
#[derive(Debug, Clone)]
pub struct FactDialect {
    pub system_info: ScalarFacts,
    /// Command whose last output line is the hostname, when
    /// `show system information` does not carry it.
    pub hostname_command: Option<String>,
    pub hardware: ScalarFacts,
    pub ports: Option<PortFacts>,
    pub interfaces: InterfaceFacts,
    pub config_command: String,
}

impl FactDialect {
    /// Fixed commands a subset runs, in order.
    pub fn commands(&self, subset: FactSubset) -> Vec<&str> {
        match subset {
            FactSubset::Default => std::iter::once(self.system_info.command.as_str())
                .chain(self.hostname_command.as_deref())
                .collect(),
            FactSubset::Hardware => vec![self.hardware.command.as_str()],
            FactSubset::Interfaces => self
                .ports
                .as_ref()
                .map(|ports| ports.command.as_str())
                .into_iter()
                .chain(std::iter::once(self.interfaces.command.as_str()))
                .collect(),
            FactSubset::Config => vec![self.config_command.as_str()],
        }
    }

    /// Parse the outputs of [`commands`](Self::commands) for `subset`.
    ///
    /// Missing outputs are treated as empty.
    pub fn parse(&self, subset: FactSubset, outputs: &[String]) -> Facts {
        let output = |index: usize| outputs.get(index).map(String::as_str).unwrap_or("");
        match subset {
            FactSubset::Default => {
                let hostname = self.hostname_command.as_ref().map(|_| output(1));
                self.parse_default(output(0), hostname)
            }
            FactSubset::Hardware => self.parse_hardware(output(0)),
            FactSubset::Interfaces => match self.ports {
                Some(_) => self.parse_interfaces(Some(output(0)), output(1)),
                None => self.parse_interfaces(None, output(0)),
            },
            FactSubset::Config => parse_config(output(0)),
        }
    }

    /// Firmware, version, serial number and model.
    pub fn parse_default(&self, system_info: &str, hostname: Option<&str>) -> Facts {
        let mut facts = self.system_info.table.extract(system_info);
        if let Some(hostname) = hostname.and_then(parse_hostname) {
            facts.insert("hostname".to_string(), FactValue::Text(hostname));
        }
        facts
    }

    /// Power, fan and temperature state.
    pub fn parse_hardware(&self, status: &str) -> Facts {
        self.hardware.table.extract(status)
    }

    /// Ports, interfaces and aggregate address lists.
    ///
    /// `interfaces`, `all_ipv4_addresses` and `all_ipv6_addresses` are
    /// always present.
    pub fn parse_interfaces(&self, ether: Option<&str>, interface: &str) -> Facts {
        let mut facts = Facts::new();

        if let (Some(ports), Some(text)) = (&self.ports, ether) {
            let parsed: IndexMap<String, FactValue> = split_blocks(&ports.anchor, text)
                .into_iter()
                .map(|(port, block)| (port, FactValue::Map(ports.fields.extract(&block))))
                .collect();
            if !parsed.is_empty() {
                facts.insert(ports.fact.clone(), FactValue::Map(parsed));
            }
        }

        let spec = &self.interfaces;
        let mut interfaces = IndexMap::new();
        let mut all_ipv4 = Vec::new();
        let mut all_ipv6 = Vec::new();

        for (name, block) in split_blocks(&spec.anchor, interface) {
            let ipv4 = capture_all(&spec.ipv4, &block);
            let ipv6 = capture_all(&spec.ipv6, &block);
            all_ipv4.extend(ipv4.iter().cloned());
            all_ipv6.extend(ipv6.iter().cloned());

            let mut entry = IndexMap::new();
            entry.insert("ipv4".to_string(), FactValue::List(ipv4));
            entry.insert("ipv6".to_string(), FactValue::List(ipv6));
            entry.extend(spec.fields.extract(&block));
            interfaces.insert(name, FactValue::Map(entry));
        }

        facts.insert("interfaces".to_string(), FactValue::Map(interfaces));
        facts.insert("all_ipv4_addresses".to_string(), FactValue::List(all_ipv4));
        facts.insert("all_ipv6_addresses".to_string(), FactValue::List(all_ipv6));
        facts
    }
}

/// The running configuration, verbatim.
pub fn parse_config(running: &str) -> Facts {
    let mut facts = Facts::new();
    if !running.trim().is_empty() {
        facts.insert("config".to_string(), FactValue::Text(running.to_string()));
    }
    facts
}

/// Hostname from `show running-config sysname`: the last line, without
/// the `sysname` keyword.
fn parse_hostname(output: &str) -> Option<String> {
    let line = output.lines().rev().find(|line| !line.trim().is_empty())?.trim();
    let name = line.strip_prefix("sysname").map(str::trim).unwrap_or(line);
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hostname() {
        assert_eq!(
            parse_hostname("--- Fri Jun  8 18:31:11 2018 ---\nAccessFJWAN-SRS\n").as_deref(),
            Some("AccessFJWAN-SRS")
        );
        assert_eq!(parse_hostname("sysname core-1").as_deref(), Some("core-1"));
        assert_eq!(parse_hostname("\n\n"), None);
    }

    #[test]
    fn test_parse_config_skips_empty() {
        assert!(parse_config("  \n").is_empty());
        assert_eq!(
            parse_config("sysname r1\n")["config"],
            FactValue::Text("sysname r1\n".into())
        );
    }
}
