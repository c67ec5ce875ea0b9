use campus_proto::models::{Activity, DetailedProfile, UserProfile};
use campus_proto::requests::UpdateProfileRequest;

use crate::api::{Ack, ApiClient};
use crate::error::AppResult;

pub async fn fetch_profile(api: &ApiClient) -> AppResult<UserProfile> {
    api.get("/api/user/profile").await?.into_data()
}

pub async fn update_profile(api: &ApiClient, request: &UpdateProfileRequest) -> AppResult<Ack> {
    api.put_json("/api/user/profile", request).await
}

pub async fn fetch_detailed_profile(api: &ApiClient) -> AppResult<DetailedProfile> {
    api.get("/api/user/profile/detailed").await?.into_data()
}

pub async fn update_detailed_profile(api: &ApiClient, profile: &DetailedProfile) -> AppResult<Ack> {
    api.put_json("/api/user/profile/detailed", profile).await
}

pub async fn fetch_joined_activities(api: &ApiClient) -> AppResult<Vec<Activity>> {
    api.get("/api/user/joined-activities").await?.into_data()
}

pub async fn fetch_favorites(api: &ApiClient) -> AppResult<Vec<Activity>> {
    api.get("/api/user/favorites").await?.into_data()
}
