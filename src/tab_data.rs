/// Data structures for Tab Warden
use serde::{Deserialize, Serialize};

/// Sentinel group id the host uses for tabs that belong to no tab group
/// (chrome.tabGroups.TAB_GROUP_ID_NONE).
pub const TAB_GROUP_ID_NONE: i32 = -1;

/// Information about a browser tab, as reported by chrome.tabs.query.
///
/// Tab ids are unique among currently open tabs but may be reused by the
/// host after a tab closes. `last_accessed` is absent for tabs the host has
/// not tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: i32,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub last_accessed: Option<f64>,
    #[serde(default = "no_group")]
    pub group_id: i32,
}

fn no_group() -> i32 {
    TAB_GROUP_ID_NONE
}

impl TabInfo {
    pub fn new(id: i32, url: String, title: String) -> TabInfo {
        TabInfo {
            id,
            url,
            title,
            last_accessed: None,
            group_id: TAB_GROUP_ID_NONE,
        }
    }

    /// Whether the tab belongs to a user-defined tab group.
    pub fn is_grouped(&self) -> bool {
        self.group_id != TAB_GROUP_ID_NONE
    }
}
