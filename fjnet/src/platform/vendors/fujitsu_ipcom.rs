//! Fujitsu IPCOM platform definition.
//!
//! On IPCOM an `<ERROR>` line is a command failure; on Si-R and SR-S
//! the same marker is only a diagnostic. Saving the configuration is a
//! copy to startup rather than `save`.

use regex::Regex;

use super::common::{self, PERMISSION_DENIED, UNKNOWN_COMMAND, pattern};
use crate::facts::{FactDialect, FactTable, InterfaceFacts, ScalarFacts};
use crate::platform::{CommandSet, DeviceInfoPatterns, PlatformDefinition};

pub const PLATFORM_NAME: &str = "fujitsu_ipcom";

/// Create the IPCOM platform definition.
pub fn platform() -> PlatformDefinition {
    let commands = CommandSet {
        system_info: "show system information".into(),
        show_running: "show running-config".into(),
        show_startup: "show startup-config".into(),
        commit: "commit".into(),
        save: "save".into(),
        save_startup: "copy running-config startup-config\r".into(),
        confirm: "y".into(),
    };

    let device_info = DeviceInfoPatterns {
        version: Regex::new(r"(?m)^[ \t]*Firm Ver\.[ \t]*:[ \t]*(.*?)[ \t]*$").unwrap(),
        model: Regex::new(r"(?m)^[ \t]*System[ \t]*:[ \t]*(\S.*?)[ \t]*$").unwrap(),
        strip_version_commas: false,
    };

    common::base(PLATFORM_NAME, commands, device_info, facts())
        .with_stderr_pattern(pattern(UNKNOWN_COMMAND))
        .with_stderr_pattern(pattern(r"<ERROR>.*"))
        .with_stderr_pattern(pattern(PERMISSION_DENIED))
}

/// IPCOM fact tables.
pub fn facts() -> FactDialect {
    FactDialect {
        system_info: ScalarFacts {
            command: "show system information".into(),
            table: FactTable::new(&[
                ("firm", r"Firm Ver\.[ \t]*:[ \t]*(?P<target>\S.*)"),
                ("security", r"Security Ver\.[ \t]*:[ \t]*(?P<target>\S.*)"),
                ("deviceid", r"Device ID[ \t]*:[ \t]*(?P<target>\S+)"),
                ("softwareid", r"Software ID[ \t]*:[ \t]*(?P<target>\S+)"),
                ("system", r"(?m)^[ \t]*System[ \t]*:[ \t]*(?P<target>\S.*)"),
            ])
            .unwrap(),
        },
        hostname_command: None,
        hardware: ScalarFacts {
            command: "show system status".into(),
            table: FactTable::new(&[
                ("intake", r"Intake status[ \t]*:[ \t]*(?P<target>\S+)"),
                ("exhaust", r"Exhaust status[ \t]*:[ \t]*(?P<target>\S+)"),
                ("fan1", r"Fan1[ \t]*:[ \t]*(?P<target>\S+)"),
                ("memory", r"Memory[ \t]*:[ \t]*(?P<target>\S+)"),
                ("hdd", r"HDD[ \t]*:[ \t]*(?P<target>\S+)"),
            ])
            .unwrap(),
        },
        ports: None,
        interfaces: InterfaceFacts {
            command: "show interface".into(),
            anchor: Regex::new(r"^(\S+)\s+MTU").unwrap(),
            fields: FactTable::new(&[
                ("proxy_arp", r"Proxy ARP[ \t]*:[ \t]*(?P<target>\S+)"),
                ("description", r"Description[ \t]*:[ \t]*(?P<target>\S+)"),
                ("mac", r"MAC address[ \t]*:[ \t]*(?P<target>\S+)"),
            ])
            .unwrap(),
            ipv4: Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}/\d{1,2}").unwrap(),
            ipv6: Regex::new(r"IPv6 address[ \t]*:[ \t]*([0-9A-Fa-f]*:[0-9A-Fa-f:]*/\d{1,3})")
                .unwrap(),
        },
        config_command: "show running-config".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{FactSubset, FactValue};

    const VE2_INTERFACE: &str = "\
lan0.0     MTU:   1500  <LINKUP>
  Type: 10gigabit ethernet
  Description:
  MAC address: 00:50:56:83:1a:0d
  IP address: 172.18.0.15/16     Broadcast address: 172.18.255.255
  IP routing: enable
  Proxy ARP: disabled
  IPv6 address: none
  IPv6 routing: disable";

    const EX2_INTERFACE: &str = "\
lan0.0 MTU:1500 <LINKUP>
  Type: fast ethernet
  Description: phy-lan0.0
  MAC address: 00:e0:00:00:d8:21
  IP address: 155.1.1.1/24 Broadcast address: 155.1.1.255 IP routing: disable
  Proxy ARP: disabled
  IPv6 address: fe80::1/64
  IPv6 address: 2001:db8:1::1/64
  IPv6 address: 2001:db8:2::1/64 tentative
  IPv6 routing: disable";

    #[test]
    fn test_ipcom_platform() {
        let platform = platform();
        assert_eq!(platform.name, "fujitsu_ipcom");
        assert_eq!(
            platform.commands.save_startup,
            "copy running-config startup-config\r"
        );
        assert!(platform.facts.ports.is_none());
        assert_eq!(
            platform.facts.commands(FactSubset::Interfaces),
            ["show interface"]
        );
    }

    #[test]
    fn test_error_marker_is_failure() {
        let platform = platform();
        assert_eq!(
            platform.detect_failure("<ERROR> invalid address").as_deref(),
            Some("<ERROR> invalid address")
        );
    }

    #[test]
    fn test_ipv4_address() {
        let parsed = facts().parse_interfaces(None, VE2_INTERFACE);
        let lan = parsed["interfaces"].as_map().unwrap()["lan0.0"].as_map().unwrap();
        assert_eq!(lan["ipv4"], FactValue::List(vec!["172.18.0.15/16".into()]));
        assert_eq!(lan["ipv6"], FactValue::List(vec![]));
        assert_eq!(lan["mac"], FactValue::Text("00:50:56:83:1a:0d".into()));
        assert_eq!(lan["proxy_arp"], FactValue::Text("disabled".into()));
        assert!(!lan.contains_key("description"));
        assert_eq!(
            parsed["all_ipv4_addresses"].as_list().unwrap(),
            ["172.18.0.15/16"]
        );
    }

    #[test]
    fn test_ipv6_addresses() {
        let parsed = facts().parse_interfaces(None, EX2_INTERFACE);
        let lan = parsed["interfaces"].as_map().unwrap()["lan0.0"].as_map().unwrap();
        assert_eq!(lan["description"], FactValue::Text("phy-lan0.0".into()));
        assert_eq!(
            parsed["all_ipv6_addresses"].as_list().unwrap(),
            ["fe80::1/64", "2001:db8:1::1/64", "2001:db8:2::1/64"]
        );
    }
}
