//! Splitting multi-section `show` output into named blocks.

use indexmap::IndexMap;
use regex::Regex;

/// Split `text` into blocks that each start at an anchor line.
///
/// The block key is the anchor's first capture group. Indented lines and
/// lines containing `": "` belong to the current block. Blank lines,
/// `---` timestamp lines, text before the first anchor and any other
/// unrecognized line are skipped without closing the current block.
pub fn split_blocks(anchor: &Regex, text: &str) -> IndexMap<String, String> {
    let mut blocks: IndexMap<String, String> = IndexMap::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        if line.trim().is_empty() || line.starts_with("---") {
            continue;
        }

        if let Some(captures) = anchor.captures(line) {
            let key = captures
                .get(1)
                .map_or(line.trim(), |m| m.as_str())
                .to_string();
            blocks.insert(key.clone(), line.to_string());
            current = Some(key);
            continue;
        }

        let continuation = line.starts_with([' ', '\t']) || line.contains(": ");
        if !continuation {
            continue;
        }
        if let Some(block) = current.as_ref().and_then(|key| blocks.get_mut(key)) {
            block.push('\n');
            block.push_str(line);
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_port_blocks() {
        let anchor = Regex::new(r"^\[LAN (PORT-\d+)\]").unwrap();
        let text = "\
--- Thu Jan  1 10:59:30 1970 ---
[LAN PORT-0]
status                  : auto 100M Full MDI-X
media                   : Metal

[LAN PORT-1]
status                  : disable
";
        let blocks = split_blocks(&anchor, text);
        assert_eq!(blocks.len(), 2);
        assert!(blocks["PORT-0"].contains("media                   : Metal"));
        assert!(!blocks["PORT-0"].contains("disable"));
        assert!(blocks["PORT-1"].ends_with("status                  : disable"));
    }

    #[test]
    fn test_indented_interface_blocks() {
        let anchor = Regex::new(r"^(\S+)\s+MTU").unwrap();
        let text = "\
garbage before
    Type: ignored
lan0           MTU 1500    <UP,BROADCAST>
    IP address/masklen:
      172.20.0.200/24       Broadcast 172.20.0.255
lo0            MTU 16384   <UP,LOOPBACK>
    Type: loopback
";
        let blocks = split_blocks(&anchor, text);
        let keys: Vec<_> = blocks.keys().map(String::as_str).collect();
        assert_eq!(keys, ["lan0", "lo0"]);
        assert!(blocks["lan0"].contains("172.20.0.200/24"));
        assert!(!blocks["lan0"].contains("loopback"));
    }

    #[test]
    fn test_unrecognized_line_keeps_block_open() {
        let anchor = Regex::new(r"^(\S+)\s+MTU").unwrap();
        let text = "lan0.0 MTU:1500 <LINKUP>\n  Proxy ARP: disabled\nlan0.1\n  Description: lan-bnd1\n";
        let blocks = split_blocks(&anchor, text);
        assert_eq!(blocks.len(), 1);
        assert!(!blocks["lan0.0"].contains("lan0.1"));
        assert!(blocks["lan0.0"].ends_with("  Description: lan-bnd1"));
    }
}
