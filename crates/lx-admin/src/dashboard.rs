//! Headline counters and the latest-messages panel.

use std::rc::Rc;

use lx_api_types::Stats;
use lx_client::{Transport, calls};
use tracing::warn;

use crate::controller::{AdminContext, LoadOutcome, ResourceController};
use crate::format::money;
use crate::resources::RecentMessages;

pub trait StatsView {
    /// Set the text of the counter element `element_id`; absent elements are skipped.
    fn show_stat(&self, element_id: &str, value: &str);
}

pub fn stat_cards(stats: &Stats) -> [(&'static str, String); 6] {
    [
        ("views-count", stats.page_views.to_string()),
        ("orders-count", stats.orders.to_string()),
        ("users-count", stats.users.to_string()),
        ("subscribers-count", stats.subscribers.to_string()),
        ("messages-count", stats.unread_messages.to_string()),
        ("revenue-total", money(stats.total_revenue)),
    ]
}

pub struct Dashboard {
    transport: Rc<dyn Transport>,
    view: Rc<dyn StatsView>,
    recent: Rc<ResourceController<RecentMessages>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardLoad {
    pub stats_shown: bool,
    pub recent: LoadOutcome,
}

impl Dashboard {
    pub fn new(
        ctx: &AdminContext,
        view: Rc<dyn StatsView>,
        recent: Rc<ResourceController<RecentMessages>>,
    ) -> Self {
        Self {
            transport: ctx.transport.clone(),
            view,
            recent,
        }
    }

    pub async fn load(&self) -> DashboardLoad {
        let stats_shown = match calls::fetch_stats(self.transport.as_ref()).await {
            Ok(stats) => {
                for (element_id, value) in stat_cards(&stats) {
                    self.view.show_stat(element_id, &value);
                }
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to load dashboard stats");
                false
            }
        };
        DashboardLoad {
            stats_shown,
            recent: self.recent.load().await,
        }
    }
}
