use std::sync::Arc;

use campus_proto::models::Activity;
use serde_json::Value;

use crate::action::{perform, ActionOutcome};
use crate::api::activities;
use crate::session::PageContext;
use crate::view::list::{show_failure, show_items};
use crate::view::templates::activity_card;
use crate::view::{render_list, ListView, RenderOutcome};

pub const ACTIVITY_LIST: &str = "activity-list";
pub const USERNAME_DISPLAY: &str = "usernameDisplay";

/// Type filter value that keeps every activity.
pub const ALL_TYPES: &str = "all";

pub struct ActivitiesPage {
    ctx: Arc<PageContext>,
    list: ListView,
}

impl ActivitiesPage {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        ctx.show_welcome(USERNAME_DISPLAY);
        Self {
            ctx,
            list: ListView::new(
                ACTIVITY_LIST,
                "No activities yet",
                "Failed to load activities, please refresh the page",
            ),
        }
    }

    pub async fn load(&self) -> RenderOutcome {
        render_list(
            &self.ctx,
            &self.list,
            activities::fetch_activities(&self.ctx.api),
            activity_card,
        )
        .await
    }

    /// Client-side type filter over a fresh fetch; server order is kept.
    pub async fn filter_by_type(&self, kind: &str) -> RenderOutcome {
        self.ctx.surface.replace(ACTIVITY_LIST, String::new());
        match activities::fetch_activities(&self.ctx.api).await {
            Ok(all) => {
                let kept: Vec<Activity> = all
                    .into_iter()
                    .filter(|activity| matches_kind(activity, kind))
                    .collect();
                show_items(&self.ctx, &self.list, &kept, activity_card)
            }
            Err(err) => show_failure(&self.ctx, &self.list, err),
        }
    }

    pub async fn search(&self, keyword: &str, kind: &str) -> RenderOutcome {
        let keyword = keyword.trim();
        let kind = kind.trim();
        if keyword.is_empty() && (kind.is_empty() || kind == ALL_TYPES) {
            return self.load().await;
        }

        let kind = if kind == ALL_TYPES { "" } else { kind };
        render_list(
            &self.ctx,
            &self.list,
            activities::search_activities(&self.ctx.api, keyword, kind),
            activity_card,
        )
        .await
    }

    pub async fn join(&self, activity_id: i64) -> ActionOutcome<Value> {
        let outcome = perform(
            &self.ctx,
            "activity.join",
            activities::join_activity(&self.ctx.api, activity_id),
            "Joined the activity",
        )
        .await;
        self.reload_after(outcome).await
    }

    pub async fn leave(&self, activity_id: i64) -> ActionOutcome<Value> {
        let outcome = perform(
            &self.ctx,
            "activity.leave",
            activities::leave_activity(&self.ctx.api, activity_id),
            "Left the activity",
        )
        .await;
        self.reload_after(outcome).await
    }

    pub async fn favorite(&self, activity_id: i64) -> ActionOutcome<Value> {
        let outcome = perform(
            &self.ctx,
            "activity.favorite",
            activities::favorite_activity(&self.ctx.api, activity_id),
            "Favorites updated",
        )
        .await;
        self.reload_after(outcome).await
    }

    async fn reload_after(&self, outcome: ActionOutcome<Value>) -> ActionOutcome<Value> {
        if outcome.succeeded() {
            self.load().await;
        }
        outcome
    }
}

fn matches_kind(activity: &Activity, kind: &str) -> bool {
    let kind = kind.trim();
    kind.is_empty() || kind == ALL_TYPES || activity.kind == kind
}
