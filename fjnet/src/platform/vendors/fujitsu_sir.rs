//! Fujitsu Si-R router platform definition.
//!
//! ```text
//! Si-R220C# show system info
//! System : Si-R220C
//! Serial No. : 00002982
//! Firm Ver. : V35.03 NY0028 Wed Feb  1 16:57:33 JST 2012
//! Security Software Ver. : Si-R Security Software V03.03
//! ```

use regex::Regex;

use super::common::{self, PERMISSION_DENIED, UNKNOWN_COMMAND, pattern};
use crate::facts::{FactDialect, FactTable, InterfaceFacts, PortFacts, ScalarFacts};
use crate::platform::{CommandSet, DeviceInfoPatterns, PlatformDefinition};

pub const PLATFORM_NAME: &str = "fujitsu_sir";

/// Create the Si-R platform definition.
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
        version: Regex::new(r"(?m)^Security Software Ver\.[ \t]*:[ \t]*(.*?)[ \t]*$").unwrap(),
        model: Regex::new(r"(?m)^System[ \t]*:[ \t]*(\S+)").unwrap(),
        strip_version_commas: false,
    };

    common::base(PLATFORM_NAME, commands, device_info, facts())
        .with_stderr_pattern(pattern(UNKNOWN_COMMAND))
        .with_stderr_pattern(pattern(r"% Incomplete command"))
        .with_stderr_pattern(pattern(PERMISSION_DENIED))
}

/// Si-R fact tables.
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
        hostname_command: None,
        hardware: ScalarFacts {
            command: "show system status".into(),
            table: FactTable::new(&[
                ("restart_cause", r"restart_cause[ \t]*:[ \t]*(?P<target>\S.*)"),
                ("machine_state", r"machine_state[ \t]*:[ \t]*(?P<target>\S+)"),
                (
                    "inspiration_state",
                    r"inspiration_state[ \t]*:[ \t]*(?P<target>\S+)",
                ),
                (
                    "inspiration_temp",
                    r"inspiration_temp[ \t]*:[ \t]*(?P<target>\S+)",
                ),
            ])
            .unwrap(),
        },
        ports: Some(PortFacts {
            command: "show ether".into(),
            fact: "lan_port".into(),
            anchor: Regex::new(r"^\[LAN (PORT-\d+)\]").unwrap(),
            fields: FactTable::new(&[
                ("status", r"(?m)^[ \t]*status[ \t]*:[ \t]*(?P<target>\S.*)$"),
                ("media", r"(?m)^[ \t]*media[ \t]*:[ \t]*(?P<target>\S.*)$"),
                (
                    "flowcontrol",
                    r"(?m)^[ \t]*flow control[ \t]*:[ \t]*(?P<target>\S.*)$",
                ),
                ("since", r"(?m)^[ \t]*since[ \t]*:[ \t]*(?P<target>\S.*)$"),
            ])
            .unwrap(),
        }),
        interfaces: InterfaceFacts {
            command: "show interface".into(),
            anchor: Regex::new(r"^(\S+)\s+MTU").unwrap(),
            fields: FactTable::new(&[
                ("proxy_arp", r"Proxy ARP[ \t]*:[ \t]*(?P<target>\S+)"),
                ("icmp_redirect", r"ICMP redirect[ \t]*:[ \t]*(?P<target>\S+)"),
            ])
            .unwrap(),
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
    use crate::platform::SessionMode;

    const SYSTEM_INFO: &str = "\
Current-time : Thu Jan  1 10:59:30 1970
Startup-time : Thu Jan  1 09:00:00 1970
System : Si-R220C
Serial No. : 00002982
ROM Ver. : 1.2
Firm Ver. : V35.03 NY0028 Wed Feb  1 16:57:33 JST 2012
Security Software Ver. : Si-R Security Software V03.03
Startup-config : Thu Jan  1 10:12:13 1970 config1
Running-config : Thu Jan  1 10:12:16 1970
MAC : 0017424a1e8c-0017424a1e8f
Memory : 128MB";

    const SHOW_ETHER: &str = "\
[LAN PORT-0]
status                  : auto 100M Full MDI-X
media                   : Metal
flow control            : send off, receive off
since                   : Jan  1 09:01:39 1970

[LAN PORT-1]
status                  : disable
media                   : -
flow control            : -
since                   : -";

    const SHOW_INTERFACE: &str = "\
lan0           MTU 1500    <UP,BROADCAST,RUNNING,SIMPLEX,MULTICAST>
    Type: ethernet
    MAC address: 00:17:42:4a:1e:8c
    Status: up since Jan  1 09:01:39 1970
    IP address/masklen:
      172.20.0.200/24       Broadcast 172.20.0.255
    ICMP redirect: enabled
    Proxy ARP: enabled
lo0            MTU 16384   <UP,LOOPBACK,RUNNING,MULTICAST>
    Type: loopback
    Status: up since Jan  1 09:00:04 1970
    IP address/masklen:
      127.0.0.1/32
    IPv6 address/prefixlen:
      fe80::1/64
      ::1/128";

    #[test]
    fn test_sir_platform() {
        let platform = platform();
        assert_eq!(platform.name, "fujitsu_sir");
        assert_eq!(platform.privilege_levels.len(), 3);
        assert_eq!(platform.escalate_command(SessionMode::Privileged), Some("admin"));
        assert_eq!(platform.on_open_commands, ["terminal pager disable"]);
    }

    #[test]
    fn test_sir_error_detection() {
        let platform = platform();
        assert!(platform.detect_failure("% Incomplete command.").is_some());
        assert!(
            platform
                .detect_failure("<ERROR> Need to do reset after execute the save command.")
                .is_none()
        );
    }

    #[test]
    fn test_model_and_serial() {
        let facts = facts();
        let table = &facts.system_info.table;
        assert_eq!(table.field("model", SYSTEM_INFO).as_deref(), Some("Si-R220C"));
        assert_eq!(table.field("serialnum", SYSTEM_INFO).as_deref(), Some("00002982"));

        let first = facts.parse(FactSubset::Default, &[SYSTEM_INFO.to_string()]);
        let second = facts.parse(FactSubset::Default, &[SYSTEM_INFO.to_string()]);
        assert_eq!(first, second);
        assert_eq!(
            first["version"],
            FactValue::Text("Si-R Security Software V03.03".into())
        );
    }

    #[test]
    fn test_machine_state() {
        let status = "restart_cause        : power on\nmachine_state        : RUNNING\n";
        let parsed = facts().parse_hardware(status);
        assert_eq!(parsed["restart_cause"], FactValue::Text("power on".into()));
        assert_eq!(parsed["machine_state"], FactValue::Text("RUNNING".into()));
        assert!(!parsed.contains_key("inspiration_temp"));
    }

    #[test]
    fn test_interfaces() {
        let parsed = facts().parse_interfaces(Some(SHOW_ETHER), SHOW_INTERFACE);

        let ports = parsed["lan_port"].as_map().unwrap();
        let port0 = ports["PORT-0"].as_map().unwrap();
        assert_eq!(port0["status"], FactValue::Text("auto 100M Full MDI-X".into()));
        assert_eq!(
            port0["flowcontrol"],
            FactValue::Text("send off, receive off".into())
        );

        let interfaces = parsed["interfaces"].as_map().unwrap();
        let lan0 = interfaces["lan0"].as_map().unwrap();
        assert_eq!(lan0["ipv4"], FactValue::List(vec!["172.20.0.200/24".into()]));
        assert_eq!(lan0["proxy_arp"], FactValue::Text("enabled".into()));
        assert_eq!(lan0["icmp_redirect"], FactValue::Text("enabled".into()));

        assert_eq!(
            parsed["all_ipv4_addresses"].as_list().unwrap(),
            ["172.20.0.200/24", "127.0.0.1/32"]
        );
        assert_eq!(
            parsed["all_ipv6_addresses"].as_list().unwrap(),
            ["fe80::1/64", "::1/128"]
        );
    }
}
