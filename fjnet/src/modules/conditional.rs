//! `wait_for` conditionals: `result[N] <op> <value>`.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, ModuleError, Result};

static CONDITIONAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*result\[(\d+)\]\s+(\S+)(?:\s+(.*?))?\s*$").unwrap());

/// Comparison operator of a conditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
    Matches,
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "eq" | "==" => Ok(Operator::Eq),
            "neq" | "ne" | "!=" => Ok(Operator::Neq),
            "gt" | ">" => Ok(Operator::Gt),
            "ge" | ">=" => Ok(Operator::Ge),
            "lt" | "<" => Ok(Operator::Lt),
            "le" | "<=" => Ok(Operator::Le),
            "contains" => Ok(Operator::Contains),
            "matches" => Ok(Operator::Matches),
            other => Err(format!("unknown operator '{other}'")),
        }
    }
}

/// One parsed `wait_for` entry.
#[derive(Debug, Clone)]
pub struct Conditional {
    /// The entry as written; reported back when unmet.
    pub raw: String,
    index: usize,
    operator: Operator,
    value: String,
    pattern: Option<Regex>,
}

impl Conditional {
    /// Parse a conditional such as `result[0] contains Si-R220C`.
    pub fn new(raw: &str) -> Result<Self> {
        let invalid = |message: String| -> Error {
            ModuleError::InvalidConditional {
                raw: raw.to_string(),
                message,
            }
            .into()
        };

        let captures = CONDITIONAL
            .captures(raw)
            .ok_or_else(|| invalid("expected 'result[N] <operator> <value>'".to_string()))?;

        let index = captures[1]
            .parse::<usize>()
            .map_err(|e| invalid(e.to_string()))?;
        let operator: Operator = captures[2].parse().map_err(invalid)?;
        let value = unquote(captures.get(3).map_or("", |m| m.as_str())).to_string();

        let pattern = match operator {
            // `^` and `$` anchor at every line of the output.
            Operator::Matches => Some(
                Regex::new(&format!("(?m){value}")).map_err(|e| invalid(e.to_string()))?,
            ),
            _ => None,
        };

        Ok(Self {
            raw: raw.to_string(),
            index,
            operator,
            value,
            pattern,
        })
    }

    /// Whether the conditional holds for the latest responses.
    ///
    /// A missing response never satisfies it.
    pub fn evaluate(&self, responses: &[String]) -> bool {
        let Some(response) = responses.get(self.index) else {
            return false;
        };
        let actual = response.trim();

        match self.operator {
            Operator::Eq => equal(actual, &self.value),
            Operator::Neq => !equal(actual, &self.value),
            Operator::Gt => compare(actual, &self.value, |a, b| a > b),
            Operator::Ge => compare(actual, &self.value, |a, b| a >= b),
            Operator::Lt => compare(actual, &self.value, |a, b| a < b),
            Operator::Le => compare(actual, &self.value, |a, b| a <= b),
            Operator::Contains => response.contains(self.value.as_str()),
            Operator::Matches => self
                .pattern
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(response)),
        }
    }
}

impl FromStr for Conditional {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Conditional::new(s)
    }
}

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn equal(actual: &str, expected: &str) -> bool {
    match (actual.parse::<f64>(), expected.parse::<f64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => actual == expected,
    }
}

fn compare(actual: &str, expected: &str, op: fn(f64, f64) -> bool) -> bool {
    match (actual.parse::<f64>(), expected.parse::<f64>()) {
        (Ok(a), Ok(b)) => op(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responses(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_operator_aliases() {
        for (alias, operator) in [
            ("==", Operator::Eq),
            ("ne", Operator::Neq),
            ("!=", Operator::Neq),
            (">=", Operator::Ge),
            ("le", Operator::Le),
        ] {
            assert_eq!(alias.parse::<Operator>().unwrap(), operator);
        }
        assert!("~=".parse::<Operator>().is_err());
    }

    #[test]
    fn test_contains_and_matches() {
        let out = responses(&["System : Si-R220C\nSerial No. : 00002982"]);
        assert!(Conditional::new("result[0] contains Si-R220C").unwrap().evaluate(&out));
        assert!(
            Conditional::new(r"result[0] matches 'Serial No\. : \d+'")
                .unwrap()
                .evaluate(&out)
        );
        assert!(!Conditional::new("result[1] contains Si-R").unwrap().evaluate(&out));
    }

    #[test]
    fn test_matches_anchors_per_line() {
        let out = responses(&["System : Si-R220C\nSerial No. : 00002982\nMemory : 128MB"]);
        assert!(
            Conditional::new(r"result[0] matches ^Serial No\. : \d+$")
                .unwrap()
                .evaluate(&out)
        );
        assert!(!Conditional::new(r"result[0] matches ^Memory : 64MB$").unwrap().evaluate(&out));
    }

    #[test]
    fn test_numeric_comparisons() {
        let out = responses(&["  42 \n"]);
        assert!(Conditional::new("result[0] eq 42").unwrap().evaluate(&out));
        assert!(Conditional::new("result[0] gt 41.5").unwrap().evaluate(&out));
        assert!(!Conditional::new("result[0] lt 10").unwrap().evaluate(&out));
        assert!(!Conditional::new("result[0] gt abc").unwrap().evaluate(&out));
        assert!(Conditional::new("result[0] != 7").unwrap().evaluate(&out));
    }

    #[test]
    fn test_quoted_string_equality() {
        let out = responses(&["RUNNING"]);
        assert!(Conditional::new(r#"result[0] == "RUNNING""#).unwrap().evaluate(&out));
    }

    #[test]
    fn test_invalid_conditionals() {
        for raw in ["output contains x", "result[0] approx 3", "result[0] matches ("] {
            let err = Conditional::new(raw).unwrap_err();
            assert!(matches!(
                err,
                Error::Module(ModuleError::InvalidConditional { .. })
            ));
        }
    }
}
