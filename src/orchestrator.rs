/// Wires popup actions to the host: snapshot, filter, batched close, status text.

use crate::config::WardenConfig;
use crate::host::{HostError, TabHost};
use crate::operations::{find_duplicates, find_stale};

/// Tab actions exposed to the popup. Constructed once with its host and
/// configuration and handed to the UI; holds no tab state of its own.
pub struct TabActions<H: TabHost> {
    host: H,
    config: WardenConfig,
}

impl<H: TabHost> TabActions<H> {
    pub fn new(host: H, config: WardenConfig) -> TabActions<H> {
        TabActions { host, config }
    }

    /// Close every duplicate tab, keeping the oldest of each URL group.
    /// Always returns user-facing status text; host errors never escape.
    pub async fn remove_duplicates(&self) -> String {
        match self.dedup_pass().await {
            Ok(0) => "No duplicate tabs to close.".to_string(),
            Ok(n) => format!(
                "Closed {n} duplicate {}, keeping the oldest ones.",
                tabs_word(n)
            ),
            Err(e) => {
                log::warn!("remove_duplicates failed: {e}");
                format!("Error removing duplicate tabs: {e}")
            }
        }
    }

    /// Close every ungrouped tab not accessed within the configured threshold.
    pub async fn close_stale_tabs(&self) -> String {
        match self.stale_pass().await {
            Ok(0) => "No old tabs to close.".to_string(),
            Ok(n) => format!("Closed {n} old {}.", tabs_word(n)),
            Err(e) => {
                log::warn!("close_stale_tabs failed: {e}");
                format!("Error closing old tabs: {e}")
            }
        }
    }

    /// Issue one batched close request for `ids`. An empty list is a no-op
    /// that never contacts the host.
    pub async fn close_tabs(&self, ids: Vec<i32>) -> Result<usize, HostError> {
        if ids.is_empty() {
            return Ok(0);
        }
        log::info!("closing {} tabs: {:?}", ids.len(), ids);
        self.host.remove_tabs(&ids).await?;
        Ok(ids.len())
    }

    async fn dedup_pass(&self) -> Result<usize, HostError> {
        let tabs = self.host.query_all_tabs().await?;
        self.close_tabs(find_duplicates(&tabs)).await
    }

    async fn stale_pass(&self) -> Result<usize, HostError> {
        let tabs = self.host.query_all_tabs().await?;
        let now = self.host.now_millis();
        let stale = find_stale(&tabs, now, self.config.stale_threshold_millis);
        self.close_tabs(stale).await
    }
}

fn tabs_word(n: usize) -> &'static str {
    if n == 1 { "tab" } else { "tabs" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab_data::{TAB_GROUP_ID_NONE, TabInfo};
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;

    struct MockHost {
        tabs: Vec<TabInfo>,
        now: f64,
        removed: RefCell<Vec<Vec<i32>>>,
        fail_query: bool,
        fail_remove: bool,
    }

    impl MockHost {
        fn with_tabs(tabs: Vec<TabInfo>) -> MockHost {
            MockHost {
                tabs,
                now: 100_000_000.0,
                removed: RefCell::new(Vec::new()),
                fail_query: false,
                fail_remove: false,
            }
        }
    }

    #[async_trait(?Send)]
    impl TabHost for MockHost {
        async fn query_all_tabs(&self) -> Result<Vec<TabInfo>, HostError> {
            if self.fail_query {
                return Err(HostError::Unavailable("host gone".to_string()));
            }
            Ok(self.tabs.clone())
        }

        async fn remove_tabs(&self, ids: &[i32]) -> Result<(), HostError> {
            if self.fail_remove {
                return Err(HostError::CloseRejected("No tab with id: 2.".to_string()));
            }
            self.removed.borrow_mut().push(ids.to_vec());
            Ok(())
        }

        fn now_millis(&self) -> f64 {
            self.now
        }
    }

    fn tab(id: i32, url: &str) -> TabInfo {
        TabInfo::new(id, url.to_string(), format!("Tab {id}"))
    }

    fn stale_tab(id: i32, group_id: i32, last_accessed: f64) -> TabInfo {
        let mut t = tab(id, "https://example.com");
        t.group_id = group_id;
        t.last_accessed = Some(last_accessed);
        t
    }

    fn actions(host: MockHost) -> TabActions<MockHost> {
        TabActions::new(host, WardenConfig::default())
    }

    #[test]
    fn test_remove_duplicates_closes_in_one_batch() {
        let actions = actions(MockHost::with_tabs(vec![
            tab(1, "a"),
            tab(2, "a"),
            tab(3, "b"),
            tab(4, "b"),
        ]));

        let status = block_on(actions.remove_duplicates());

        assert_eq!(status, "Closed 2 duplicate tabs, keeping the oldest ones.");
        // One batched host call, never a per-id loop.
        let removed = actions.host.removed.borrow();
        assert_eq!(*removed, vec![vec![2, 4]]);
    }

    #[test]
    fn test_remove_duplicates_nothing_to_do() {
        let actions = actions(MockHost::with_tabs(vec![tab(1, "a"), tab(2, "b")]));

        let status = block_on(actions.remove_duplicates());

        assert_eq!(status, "No duplicate tabs to close.");
        assert!(actions.host.removed.borrow().is_empty());
    }

    #[test]
    fn test_close_stale_tabs_respects_groups_and_threshold() {
        let day = 86_400_000.0;
        let now = 10.0 * day;
        let mut host = MockHost::with_tabs(vec![
            stale_tab(1, TAB_GROUP_ID_NONE, now - 2.0 * day),
            stale_tab(2, 5, now - 2.0 * day),
            stale_tab(3, TAB_GROUP_ID_NONE, now - 1000.0),
        ]);
        host.now = now;
        let actions = actions(host);

        let status = block_on(actions.close_stale_tabs());

        assert_eq!(status, "Closed 1 old tab.");
        assert_eq!(*actions.host.removed.borrow(), vec![vec![1]]);
    }

    #[test]
    fn test_empty_snapshot_reports_nothing_to_do() {
        let actions = actions(MockHost::with_tabs(Vec::new()));

        assert_eq!(
            block_on(actions.remove_duplicates()),
            "No duplicate tabs to close."
        );
        assert_eq!(block_on(actions.close_stale_tabs()), "No old tabs to close.");
        assert!(actions.host.removed.borrow().is_empty());
    }

    #[test]
    fn test_close_tabs_empty_skips_host() {
        let mut host = MockHost::with_tabs(Vec::new());
        host.fail_remove = true; // any host contact would error
        let actions = actions(host);

        assert_eq!(block_on(actions.close_tabs(Vec::new())), Ok(0));
    }

    #[test]
    fn test_query_failure_becomes_status_text() {
        let mut host = MockHost::with_tabs(vec![tab(1, "a"), tab(2, "a")]);
        host.fail_query = true;
        let actions = actions(host);

        let status = block_on(actions.remove_duplicates());

        assert_eq!(
            status,
            "Error removing duplicate tabs: tab query failed: host gone"
        );
        assert!(actions.host.removed.borrow().is_empty());
    }

    #[test]
    fn test_close_failure_becomes_status_text() {
        let mut host = MockHost::with_tabs(vec![tab(1, "a"), tab(2, "a")]);
        host.fail_remove = true;
        let actions = actions(host);

        let status = block_on(actions.remove_duplicates());

        assert_eq!(
            status,
            "Error removing duplicate tabs: tab close rejected: No tab with id: 2."
        );
    }
}
