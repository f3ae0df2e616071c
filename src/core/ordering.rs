//! Priority ordering and substring search over daily snapshots

use super::rate::DailySnapshot;

fn priority(currency_code: &str) -> u8 {
    match currency_code {
        "USD" => 0,
        "EUR" => 1,
        _ => 2,
    }
}

/// Puts USD first, EUR second and everything else after, keeping the input
/// order among records of equal priority.
pub fn order_by_priority(snapshot: &DailySnapshot) -> DailySnapshot {
    let mut records = snapshot.records().to_vec();
    // sort_by_key is stable
    records.sort_by_key(|r| priority(&r.currency_code));
    snapshot.derived(records)
}

/// Keeps records whose code or label contains `query`, ignoring case.
/// An empty query keeps everything. Order is preserved.
pub fn filter_by_substring(snapshot: &DailySnapshot, query: &str) -> DailySnapshot {
    let query = query.to_lowercase();
    if query.is_empty() {
        return snapshot.clone();
    }
    let records = snapshot
        .records()
        .iter()
        .filter(|r| {
            r.currency_code.to_lowercase().contains(&query)
                || r.currency_label.to_lowercase().contains(&query)
        })
        .cloned()
        .collect();
    snapshot.derived(records)
}
