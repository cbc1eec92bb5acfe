//! Ordered `(field, regex)` extraction tables.

use regex::Regex;

use super::{FactValue, Facts};

/// An ordered list of scalar extractions.
///
/// Each regex yields its `target` named group, or group 1 when there is
/// no such group. The captured value is trimmed; a regex that does not
/// match (or captures only whitespace) leaves its field absent.
#[derive(Debug, Clone, Default)]
pub struct FactTable {
    entries: Vec<(String, Regex)>,
}

impl FactTable {
    /// Compile a table from `(field, pattern)` pairs.
    pub fn new(entries: &[(&str, &str)]) -> Result<Self, regex::Error> {
        let entries = entries
            .iter()
            .map(|(field, pattern)| Ok((field.to_string(), Regex::new(pattern)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { entries })
    }

    /// Field names in table order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(field, _)| field.as_str())
    }

    /// Extract a single field from `text`.
    pub fn field(&self, name: &str, text: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .and_then(|(_, pattern)| capture(pattern, text))
    }

    /// Extract every field that matches, in table order.
    pub fn extract(&self, text: &str) -> Facts {
        self.entries
            .iter()
            .filter_map(|(field, pattern)| {
                capture(pattern, text).map(|value| (field.clone(), FactValue::Text(value)))
            })
            .collect()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// First capture of `pattern` in `text`.
pub(crate) fn capture(pattern: &Regex, text: &str) -> Option<String> {
    let captures = pattern.captures(text)?;
    let value = captures
        .name("target")
        .or_else(|| captures.get(1))?
        .as_str()
        .trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Every capture of `pattern` in `text`, in order.
pub(crate) fn capture_all(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|captures| captures.get(1).or_else(|| captures.get(0)))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM: &str = "System : Si-R220C\nSerial No. : 00002982\nROM Ver. : 1.2\n";

    #[test]
    fn test_extract_in_table_order() {
        let table = FactTable::new(&[
            ("serialnum", r"Serial No\.[ \t]*:[ \t]*(?P<target>\S+)"),
            ("model", r"System[ \t]*:[ \t]*(\S+)"),
            ("mac", r"MAC[ \t]*:[ \t]*(\S+)"),
        ])
        .unwrap();

        let facts = table.extract(SYSTEM);
        let keys: Vec<_> = facts.keys().map(String::as_str).collect();
        assert_eq!(keys, ["serialnum", "model"]);
        assert_eq!(facts["model"], FactValue::Text("Si-R220C".into()));
    }

    #[test]
    fn test_blank_capture_is_absent() {
        let table = FactTable::new(&[("description", r"Description:[ \t]*(.*)")]).unwrap();
        assert_eq!(table.field("description", "Description:   \n"), None);
        assert_eq!(table.field("missing", SYSTEM), None);
    }

    #[test]
    fn test_capture_all() {
        let pattern = Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}/\d{1,2}").unwrap();
        let found = capture_all(&pattern, "a 10.0.0.1/8 b 192.168.1.1/24 c 10.0.0.2");
        assert_eq!(found, ["10.0.0.1/8", "192.168.1.1/24"]);
    }
}
