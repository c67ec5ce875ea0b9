use campus_proto::models::Activity;

use crate::api::{Ack, ApiClient};
use crate::error::AppResult;

pub async fn fetch_activities(api: &ApiClient) -> AppResult<Vec<Activity>> {
    api.get("/api/activities").await?.into_data()
}

pub async fn search_activities(
    api: &ApiClient,
    keyword: &str,
    kind: &str,
) -> AppResult<Vec<Activity>> {
    api.get_with_query("/api/activities/search", &[("keyword", keyword), ("type", kind)])
        .await?
        .into_data()
}

pub async fn join_activity(api: &ApiClient, activity_id: i64) -> AppResult<Ack> {
    api.post_empty(&format!("/api/activities/{}/join", activity_id))
        .await
}

pub async fn leave_activity(api: &ApiClient, activity_id: i64) -> AppResult<Ack> {
    api.post_empty(&format!("/api/activities/{}/leave", activity_id))
        .await
}

pub async fn favorite_activity(api: &ApiClient, activity_id: i64) -> AppResult<Ack> {
    api.post_empty(&format!("/api/activities/{}/favorite", activity_id))
        .await
}
