use std::collections::HashSet;

use crate::core::Table;

/// Column names present in every table, ordered as in the first table.
///
/// Comparing needs at least two tables; with fewer the result is empty.
pub fn shared_columns(tables: &[&Table]) -> Vec<String> {
    let Some((first, rest)) = tables.split_first() else {
        return Vec::new();
    };
    if rest.is_empty() {
        return Vec::new();
    }

    let others: Vec<HashSet<&str>> = rest
        .iter()
        .map(|t| t.headers.iter().map(|h| h.name.as_str()).collect())
        .collect();

    let mut seen = HashSet::new();
    first
        .headers
        .iter()
        .map(|h| h.name.as_str())
        .filter(|name| seen.insert(*name))
        .filter(|name| others.iter().all(|set| set.contains(name)))
        .map(str::to_string)
        .collect()
}
