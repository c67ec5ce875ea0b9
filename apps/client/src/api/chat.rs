use campus_proto::models::{ChatMessage, ChatPeer, Conversation, UserId};
use campus_proto::requests::SendMessageRequest;

use crate::api::{Ack, ApiClient};
use crate::error::AppResult;

/// Message history with one peer. `peer` is `None` when the server does not
/// know the user.
#[derive(Debug, Clone)]
pub struct ChatThread {
    pub peer: Option<ChatPeer>,
    pub messages: Vec<ChatMessage>,
}

pub async fn fetch_conversations(api: &ApiClient) -> AppResult<Vec<Conversation>> {
    api.get("/api/messages/conversations").await?.into_data()
}

pub async fn fetch_thread(api: &ApiClient, user_id: &UserId) -> AppResult<ChatThread> {
    let path = api.item_path("/api/messages", user_id.as_str())?;
    let res = api.get::<Vec<ChatMessage>>(&path).await?;
    let peer = res.extra_field::<ChatPeer>("target_user")?;
    let messages = res.data.unwrap_or_default();

    Ok(ChatThread { peer, messages })
}

pub async fn send_message(api: &ApiClient, receiver_id: UserId, content: String) -> AppResult<Ack> {
    api.post_json(
        "/api/messages",
        &SendMessageRequest {
            receiver_id,
            content,
        },
    )
    .await
}
