use std::collections::HashMap;

use crate::domain::Snapshot;

/// Dense 1..N ranks by experience descending.
///
/// Ties keep the order players were inserted into the snapshot (stable sort),
/// so the result is reproducible from identical input. Stored rank columns
/// are ignored here on purpose.
pub fn compute_ranks(snapshot: &Snapshot) -> HashMap<String, u32> {
    let mut ordered: Vec<(&str, u64)> = snapshot
        .iter()
        .map(|record| (record.name.as_str(), record.experience))
        .collect();

    ordered.sort_by(|a, b| b.1.cmp(&a.1));

    ordered
        .into_iter()
        .enumerate()
        .map(|(position, (name, _))| (name.to_string(), position as u32 + 1))
        .collect()
}
