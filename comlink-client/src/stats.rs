//! Roster post-processing helpers for stats service responses

use serde_json::Value;
use std::collections::HashMap;

/// Merge computed stat records into a unit roster
///
/// Stat records are matched to units by their `id` field. Each matched
/// unit gains the record's `stat` field; units without a matching record
/// pass through unmodified. Pure data merge, no I/O.
pub fn merge_unit_stats(roster: &[Value], stats: &[Value]) -> Vec<Value> {
    let stats_by_id: HashMap<&str, &Value> = stats
        .iter()
        .filter_map(|record| {
            record
                .get("id")
                .and_then(Value::as_str)
                .map(|id| (id, record))
        })
        .collect();

    roster
        .iter()
        .map(|unit| {
            let mut unit = unit.clone();
            let id = unit
                .get("id")
                .and_then(Value::as_str)
                .map(ToString::to_string);
            if let Some(id) = id
                && let Some(record) = stats_by_id.get(id.as_str())
                && let Some(stat) = record.get("stat")
                && let Some(fields) = unit.as_object_mut()
            {
                fields.insert("stat".to_string(), stat.clone());
            }
            unit
        })
        .collect()
}
