/// Tab lifecycle operations: duplicate detection and stale-tab filtering.

use std::collections::HashMap;

use crate::tab_data::TabInfo;

/// Find redundant duplicate tabs.
///
/// Tabs are grouped by exact `url` equality (no normalization of trailing
/// slashes, query order, or scheme case). In every group with two or more
/// members the lowest-id member is kept as the oldest and the rest are
/// returned as closure candidates, in first-seen-group order.
pub fn find_duplicates(tabs: &[TabInfo]) -> Vec<i32> {
    let mut groups: HashMap<&str, Vec<i32>> = HashMap::new();
    let mut url_order: Vec<&str> = Vec::new();

    for tab in tabs {
        let ids = groups.entry(tab.url.as_str()).or_insert_with(|| {
            url_order.push(tab.url.as_str());
            Vec::new()
        });
        // A repeated id within a group is the same tab listed twice; count it once.
        if !ids.contains(&tab.id) {
            ids.push(tab.id);
        }
    }

    let mut remove_ids = Vec::new();
    for url in url_order {
        if let Some(ids) = groups.get_mut(url) {
            if ids.len() < 2 {
                continue;
            }
            ids.sort_unstable();
            remove_ids.extend_from_slice(&ids[1..]);
        }
    }

    remove_ids
}

/// Find ungrouped tabs whose last access is older than `threshold_millis`.
///
/// Tabs the host never assigned a `last_accessed` time are skipped rather
/// than treated as infinitely stale. Elapsed time must strictly exceed the
/// threshold.
pub fn find_stale(tabs: &[TabInfo], now_millis: f64, threshold_millis: f64) -> Vec<i32> {
    tabs.iter()
        .filter(|tab| !tab.is_grouped())
        .filter_map(|tab| {
            let last = tab.last_accessed?;
            if now_millis - last > threshold_millis {
                Some(tab.id)
            } else {
                None
            }
        })
        .collect()
}
