use campus_proto::models::CurrentUser;
use campus_proto::requests::LoginRequest;

use crate::api::{Ack, ApiClient};
use crate::error::AppResult;

pub async fn fetch_current_user(api: &ApiClient) -> AppResult<CurrentUser> {
    api.get("/api/current-user").await?.into_data()
}

pub async fn login(api: &ApiClient, username: String, password: String) -> AppResult<Ack> {
    api.post_json("/api/login", &LoginRequest { username, password })
        .await
}

pub async fn logout(api: &ApiClient) -> AppResult<Ack> {
    api.post_empty("/api/logout").await
}
