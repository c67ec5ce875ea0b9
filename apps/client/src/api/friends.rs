use campus_proto::models::{Friend, FriendRequest, UserId, UserSearchResult};
use campus_proto::requests::{FriendAction, FriendDecision, FriendRequestPayload};

use crate::api::{Ack, ApiClient, ApiResponse};
use crate::error::AppResult;

pub async fn fetch_friends(api: &ApiClient) -> AppResult<Vec<Friend>> {
    api.get("/api/friends").await?.into_data()
}

/// Pending requests addressed to the current user; the envelope's `count`
/// feeds the request badge.
pub async fn fetch_pending_requests(api: &ApiClient) -> AppResult<ApiResponse<Vec<FriendRequest>>> {
    api.get("/api/friends/requests").await
}

pub async fn send_friend_request(api: &ApiClient, user_id: UserId) -> AppResult<Ack> {
    api.post_json("/api/friends/request", &FriendRequestPayload { user_id })
        .await
}

pub async fn respond_to_request(
    api: &ApiClient,
    friendship_id: i64,
    action: FriendAction,
) -> AppResult<Ack> {
    api.post_json(
        &format!("/api/friends/request/{}", friendship_id),
        &FriendDecision { action },
    )
    .await
}

pub async fn remove_friend(api: &ApiClient, friend_id: &UserId) -> AppResult<Ack> {
    let path = api.item_path("/api/friends", friend_id.as_str())?;
    api.delete(&path).await
}

pub async fn search_users(api: &ApiClient, keyword: &str) -> AppResult<Vec<UserSearchResult>> {
    api.get_with_query("/api/users/search", &[("keyword", keyword)])
        .await?
        .into_data()
}
