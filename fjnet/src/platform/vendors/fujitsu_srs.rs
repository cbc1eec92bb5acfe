//! Fujitsu SR-S switch platform definition.
//!
//! SR-S prints the firmware version with a trailing comma and does not
//! include the hostname in `show system information`; the hostname is
//! read from `show running-config sysname`, which needs `admin`.

use regex::Regex;

use super::common::{self, PERMISSION_DENIED, UNKNOWN_COMMAND, pattern};
use crate::facts::{FactDialect, FactTable, InterfaceFacts, PortFacts, ScalarFacts};
use crate::platform::{CommandSet, DeviceInfoPatterns, PlatformDefinition};

pub const PLATFORM_NAME: &str = "fujitsu_srs";

/// Create the SR-S platform definition.
pub fn platform() -> PlatformDefinition {
    let commands = CommandSet {
        system_info: "show system info".into(),
        show_running: "show running-config".into(),
        show_startup: "show startup-config".into(),
        commit: "commit".into(),
        save: "save".into(),
        save_startup: "save".into(),
        confirm: "y".into(),
    };

    let device_info = DeviceInfoPatterns {
        version: Regex::new(r"Security Software Ver\.[ \t]*:[ \t]*(.*?)[ \t]*(?:\r?\n|$)").unwrap(),
        model: Regex::new(r"(?m)^System[ \t]*:[ \t]*(\S+)").unwrap(),
        strip_version_commas: true,
    };

    common::base(PLATFORM_NAME, commands, device_info, facts())
        .with_stderr_pattern(pattern(UNKNOWN_COMMAND))
        .with_stderr_pattern(pattern(r"% Incomplete command"))
        .with_stderr_pattern(pattern(PERMISSION_DENIED))
}

/// SR-S fact tables.
pub fn facts() -> FactDialect {
    FactDialect {
        system_info: ScalarFacts {
            command: "show system information".into(),
            table: FactTable::new(&[
                ("firm", r"Firm Ver\.[ \t]*:[ \t]*(?P<target>\S.*)"),
                (
                    "version",
                    r"Security Software Ver\.[ \t]*:[ \t]*(?P<target>\S.*)",
                ),
                ("serialnum", r"Serial No\.[ \t]*:[ \t]*(?P<target>\S+)"),
                ("model", r"(?m)^[ \t]*System[ \t]*:[ \t]*(?P<target>\S+)"),
            ])
            .unwrap(),
        },
        hostname_command: Some("show running-config sysname".into()),
        hardware: ScalarFacts {
            command: "show system status".into(),
            table: FactTable::new(&[
                ("power0_state", r"power0_state[ \t]*:[ \t]*(?P<target>\S+)"),
                ("power1_state", r"power1_state[ \t]*:[ \t]*(?P<target>\S+)"),
            ])
            .unwrap(),
        },
        ports: Some(PortFacts {
            command: "show ether".into(),
            fact: "ether_port".into(),
            anchor: Regex::new(r"^\[ETHER (\S+)\]").unwrap(),
            fields: FactTable::new(&[
                ("status", r"(?m)^[ \t]*status[ \t]*:[ \t]*(?P<target>\S.*)$"),
                ("media", r"(?m)^[ \t]*media[ \t]*:[ \t]*(?P<target>\S.*)$"),
                (
                    "flowcontrol",
                    r"(?m)^[ \t]*flow control[ \t]*:[ \t]*(?P<target>\S.*)$",
                ),
                ("type", r"(?m)^[ \t]*type[ \t]*:[ \t]*(?P<target>\S.*)$"),
                ("since", r"(?m)^[ \t]*since[ \t]*:[ \t]*(?P<target>\S.*)$"),
                ("config", r"(?m)^[ \t]*config[ \t]*:[ \t]*(?P<target>\S.*)$"),
                (
                    "linkcontrol",
                    r"(?m)^[ \t]*linkcontrol[ \t]*:[ \t]*(?P<target>\S.*)$",
                ),
            ])
            .unwrap(),
        }),
        interfaces: InterfaceFacts {
            command: "show interface".into(),
            anchor: Regex::new(r"^(\S+)\s+MTU").unwrap(),
            fields: FactTable::default(),
            ipv4: Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}/\d{1,2}").unwrap(),
            ipv6: Regex::new(r"(?m)^[ \t]+([0-9A-Fa-f]*:[0-9A-Fa-f:]*/\d{1,3})").unwrap(),
        },
        config_command: "show running-config".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{FactSubset, FactValue};

    const SHOW_ETHER: &str = "\
--- Fri Jun  8 17:48:30 2018 ---
[ETHER PORT-1]
status\t\t: auto 1000M Full MDI
media\t\t: Metal
flow control\t: send off, receive off
type\t\t: Normal
since\t\t: Feb  5 10:01:09 2018
config\t\t: mode(auto), mdi(auto)
linkcontrol\t: online, recovery(-), downrelay(-)

[ETHER PORT-16]
status\t\t: down
media\t\t: -";

    const SHOW_INTERFACE: &str = "\
--- Fri Jun  8 17:50:21 2018 ---
lan0           MTU 1500    <UP,BROADCAST,RUNNING,SIMPLEX,MULTICAST>
    Type: port vlan
    VLAN ID is 1000
    MAC address: 00:0b:5d:89:11:00
    IP address/masklen:
      192.168.1.200/24       Broadcast 192.168.1.255
    Proxy ARP: enabled
    IPv6 address/prefixlen:
      fe80::20b:5dff:fe89:1100/64
      999::716:1/64";

    #[test]
    fn test_srs_platform() {
        let platform = platform();
        assert_eq!(platform.name, "fujitsu_srs");
        assert!(platform.device_info.strip_version_commas);
        assert_eq!(platform.commands.save_startup, "save");
    }

    #[test]
    fn test_default_with_hostname() {
        let facts = facts();
        assert_eq!(
            facts.commands(FactSubset::Default),
            ["show system information", "show running-config sysname"]
        );
        let parsed = facts.parse(
            FactSubset::Default,
            &[
                "System : SR-S716C2\nSerial No. : 12345678".to_string(),
                "--- Fri Jun  8 18:31:11 2018 ---\nAccessFJWAN-SRS".to_string(),
            ],
        );
        assert_eq!(parsed["model"], FactValue::Text("SR-S716C2".into()));
        assert_eq!(parsed["hostname"], FactValue::Text("AccessFJWAN-SRS".into()));
    }

    #[test]
    fn test_power_state() {
        let status = "power0_state         : NORMAL\npower1_state         : NO_PRESENT\n";
        let parsed = facts().parse_hardware(status);
        assert_eq!(parsed["power0_state"], FactValue::Text("NORMAL".into()));
        assert_eq!(parsed["power1_state"], FactValue::Text("NO_PRESENT".into()));
    }

    #[test]
    fn test_ether_ports() {
        let parsed = facts().parse_interfaces(Some(SHOW_ETHER), SHOW_INTERFACE);
        let ports = parsed["ether_port"].as_map().unwrap();
        let port1 = ports["PORT-1"].as_map().unwrap();
        assert_eq!(port1["type"], FactValue::Text("Normal".into()));
        assert_eq!(port1["config"], FactValue::Text("mode(auto), mdi(auto)".into()));
        assert_eq!(
            port1["linkcontrol"],
            FactValue::Text("online, recovery(-), downrelay(-)".into())
        );

        let port16 = ports["PORT-16"].as_map().unwrap();
        assert_eq!(port16["status"], FactValue::Text("down".into()));
        assert!(!port16.contains_key("since"));
    }

    #[test]
    fn test_interface_addresses() {
        let parsed = facts().parse_interfaces(None, SHOW_INTERFACE);
        let lan0 = parsed["interfaces"].as_map().unwrap()["lan0"].as_map().unwrap();
        assert_eq!(lan0["ipv4"], FactValue::List(vec!["192.168.1.200/24".into()]));
        assert_eq!(
            lan0["ipv6"],
            FactValue::List(vec![
                "fe80::20b:5dff:fe89:1100/64".into(),
                "999::716:1/64".into()
            ])
        );
        assert!(!parsed.contains_key("ether_port"));
    }
}
