use std::sync::{Arc, Mutex, PoisonError};

use campus_proto::models::UserId;
use campus_proto::requests::FriendAction;
use serde_json::Value;
use url::form_urlencoded;

use crate::action::{perform, ActionOutcome};
use crate::api::friends;
use crate::error::AppErrorCode;
use crate::session::PageContext;
use crate::validation::require_text;
use crate::view::list::{show_failure, show_items};
use crate::view::templates::{friend_card, friend_request_card, request_badge, search_result_card};
use crate::view::{render_list, ListView, RenderOutcome};

pub const FRIENDS_LIST: &str = "friendsList";
pub const REQUESTS_LIST: &str = "requestsList";
pub const REQUEST_BADGE: &str = "requestBadge";
pub const SEARCH_RESULTS: &str = "searchResults";

pub const MESSAGES_PATH: &str = "/messages";

pub struct FriendsPage {
    ctx: Arc<PageContext>,
    friends: ListView,
    requests: ListView,
    results: ListView,
    last_search: Mutex<Option<String>>,
}

impl FriendsPage {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        Self {
            ctx,
            friends: ListView::new(
                FRIENDS_LIST,
                "No friends yet, search for classmates to add",
                "Failed to load friends",
            ),
            requests: ListView::new(
                REQUESTS_LIST,
                "No pending friend requests",
                "Failed to load friend requests",
            ),
            results: ListView::new(SEARCH_RESULTS, "No matching users", "Search failed"),
            last_search: Mutex::new(None),
        }
    }

    /// Friends and pending requests, fetched side by side.
    pub async fn load(&self) -> (RenderOutcome, RenderOutcome) {
        tokio::join!(self.load_friends(), self.load_requests())
    }

    pub async fn load_friends(&self) -> RenderOutcome {
        render_list(
            &self.ctx,
            &self.friends,
            friends::fetch_friends(&self.ctx.api),
            friend_card,
        )
        .await
    }

    /// Renders the requests list and the badge with the pending count.
    pub async fn load_requests(&self) -> RenderOutcome {
        self.ctx.surface.replace(REQUESTS_LIST, String::new());
        match friends::fetch_pending_requests(&self.ctx.api).await {
            Ok(response) => {
                let pending = response.data.unwrap_or_default();
                let count = response.count.unwrap_or(pending.len() as u64);
                self.ctx.surface.replace(REQUEST_BADGE, request_badge(count));
                show_items(&self.ctx, &self.requests, &pending, friend_request_card)
            }
            Err(err) => {
                self.ctx.surface.replace(REQUEST_BADGE, String::new());
                show_failure(&self.ctx, &self.requests, err)
            }
        }
    }

    pub async fn search(&self, keyword: &str) -> RenderOutcome {
        let keyword = match require_text(keyword, "Search keyword") {
            Ok(keyword) => keyword,
            Err(err) => {
                self.ctx.notify_error(err.message);
                return RenderOutcome::Failed(AppErrorCode::Validation);
            }
        };

        *self.last_search.lock().unwrap_or_else(PoisonError::into_inner) = Some(keyword.clone());
        render_list(
            &self.ctx,
            &self.results,
            friends::search_users(&self.ctx.api, &keyword),
            search_result_card,
        )
        .await
    }

    pub async fn send_request(&self, user_id: &UserId, username: &str) -> ActionOutcome<Value> {
        if !self
            .ctx
            .surface
            .confirm(&format!("Send a friend request to {username}?"))
        {
            return ActionOutcome::Cancelled;
        }

        let outcome = perform(
            &self.ctx,
            "friends.request",
            friends::send_friend_request(&self.ctx.api, user_id.clone()),
            "Friend request sent",
        )
        .await;

        if outcome.succeeded() {
            let last = self
                .last_search
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            if let Some(keyword) = last {
                self.search(&keyword).await;
            }
        }
        outcome
    }

    pub async fn respond(&self, friendship_id: i64, action: FriendAction) -> ActionOutcome<Value> {
        let success_text = match action {
            FriendAction::Accept => "Friend request accepted",
            FriendAction::Reject => "Friend request rejected",
        };
        let outcome = perform(
            &self.ctx,
            "friends.respond",
            friends::respond_to_request(&self.ctx.api, friendship_id, action),
            success_text,
        )
        .await;

        if outcome.succeeded() {
            self.load().await;
        }
        outcome
    }

    pub async fn remove(&self, friend_id: &UserId, username: &str) -> ActionOutcome<Value> {
        if !self
            .ctx
            .surface
            .confirm(&format!("Remove {username} from your friends?"))
        {
            return ActionOutcome::Cancelled;
        }

        let outcome = perform(
            &self.ctx,
            "friends.remove",
            friends::remove_friend(&self.ctx.api, friend_id),
            "Friend removed",
        )
        .await;

        if outcome.succeeded() {
            self.load_friends().await;
        }
        outcome
    }

    /// Leaves for the messages page with the chat for `user_id` open.
    pub fn open_chat(&self, user_id: &UserId) {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("user_id", user_id.as_str())
            .finish();
        self.ctx.surface.navigate(&format!("{MESSAGES_PATH}?{query}"));
    }
}
