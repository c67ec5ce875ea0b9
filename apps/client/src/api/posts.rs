use campus_proto::models::{Comment, Group, Post, PostTemplate, SimilarPost};
use campus_proto::requests::{CommentRequest, CreateGroupRequest, ReactRequest};
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};

use crate::api::{Ack, ApiClient, ApiResponse};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fully validated submission, ready to be encoded as multipart.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub category: String,
    pub content: String,
    pub tags: String,
    pub metadata: Map<String, Value>,
    pub attachments: Vec<Attachment>,
}

impl NewPost {
    fn into_form(self) -> AppResult<Form> {
        let metadata = serde_json::to_string(&Value::Object(self.metadata))?;

        let mut form = Form::new()
            .text("title", self.title)
            .text("category", self.category)
            .text("content", self.content)
            .text("tags", self.tags)
            .text("metadata", metadata);

        for attachment in self.attachments {
            let mut part = Part::bytes(attachment.bytes).file_name(attachment.file_name.clone());
            if let Some(mime) = attachment.mime.as_deref() {
                part = part.mime_str(mime).map_err(|e| {
                    AppError::validation(format!(
                        "Unsupported attachment type for {}",
                        attachment.file_name
                    ))
                    .with_details(e.to_string())
                })?;
            }
            form = form.part("files", part);
        }

        Ok(form)
    }
}

pub async fn fetch_templates(api: &ApiClient) -> AppResult<Vec<PostTemplate>> {
    api.get("/api/post-templates").await?.into_data()
}

pub async fn fetch_posts(api: &ApiClient) -> AppResult<Vec<Post>> {
    api.get("/api/posts").await?.into_data()
}

pub async fn fetch_post(api: &ApiClient, post_id: i64) -> AppResult<Post> {
    api.get(&format!("/api/posts/{}", post_id)).await?.into_data()
}

pub async fn fetch_similar(api: &ApiClient, title: &str, content: &str) -> AppResult<Vec<SimilarPost>> {
    api.get_with_query("/api/posts/similar", &[("title", title), ("content", content)])
        .await?
        .into_data()
}

pub async fn create_post(api: &ApiClient, post: NewPost) -> AppResult<Ack> {
    let form = post.into_form()?;
    api.post_multipart("/api/posts", form).await
}

pub async fn react_to_post(api: &ApiClient, post_id: i64, reaction: String) -> AppResult<Ack> {
    api.post_json(
        &format!("/api/posts/{}/react", post_id),
        &ReactRequest { reaction },
    )
    .await
}

pub async fn fetch_comments(api: &ApiClient, post_id: i64) -> AppResult<Vec<Comment>> {
    api.get(&format!("/api/posts/{}/comments", post_id))
        .await?
        .into_data()
}

pub async fn add_comment(
    api: &ApiClient,
    post_id: i64,
    content: String,
    parent_id: Option<i64>,
) -> AppResult<Ack> {
    api.post_json(
        &format!("/api/posts/{}/comments", post_id),
        &CommentRequest { content, parent_id },
    )
    .await
}

pub async fn create_group(
    api: &ApiClient,
    name: String,
    description: Option<String>,
) -> AppResult<ApiResponse<Group>> {
    api.post_json("/api/groups", &CreateGroupRequest { name, description })
        .await
}
