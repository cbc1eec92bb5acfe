//! Gather device facts.

use indexmap::IndexMap;
use serde::Serialize;

use super::check_network_api;
use crate::cliconf::Connection;
use crate::error::Result;
use crate::facts::{self, FactValue, Facts};

/// Arguments of the facts action.
#[derive(Debug, Clone)]
pub struct FactsArgs {
    /// Subsets to collect; `!name` excludes, `all` selects everything.
    pub gather_subset: Vec<String>,
}

impl Default for FactsArgs {
    fn default() -> Self {
        Self {
            gather_subset: vec!["!config".to_string()],
        }
    }
}

/// Result document of the facts action.
#[derive(Debug, Clone, Serialize)]
pub struct FactsResult {
    pub ansible_facts: Facts,
    pub warnings: Vec<String>,
}

/// Collect the requested subsets and namespace the result.
///
/// `gather_subset` in the result lists the subsets that ran.
pub async fn run<C: Connection>(conn: &mut C, args: &FactsArgs) -> Result<FactsResult> {
    check_network_api(conn).await?;

    let subsets = facts::resolve_subsets(&args.gather_subset)?;
    let mut warnings = Vec::new();
    let collected = facts::collect(conn, &subsets, &mut warnings).await?;

    let mut gathered = IndexMap::with_capacity(collected.len() + 1);
    gathered.insert(
        "gather_subset".to_string(),
        FactValue::List(subsets.iter().map(|s| s.as_str().to_string()).collect()),
    );
    gathered.extend(collected);

    Ok(FactsResult {
        ansible_facts: facts::namespace(gathered),
        warnings,
    })
}
