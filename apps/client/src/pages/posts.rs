use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use campus_proto::models::{Comment, Group, PostTemplate, SimilarPost};
use serde_json::{Map, Value};

use crate::action::{invalid, perform, perform_submission, ActionOutcome};
use crate::api::posts::{self, Attachment, NewPost};
use crate::error::{AppError, AppResult};
use crate::session::PageContext;
use crate::validation::{require_text, validate_comment};
use crate::view::list::show_failure;
use crate::view::templates::{post_card, post_detail, similar_posts_advisory};
use crate::view::{render_list, ListView, RenderOutcome};

pub const POSTS_LIST: &str = "postsList";
pub const POST_DETAIL: &str = "postDetail";
pub const POST_ADVISORY: &str = "postAdvisory";

const DEFAULT_REACTION: &str = "like";

/// A post as filled in on the submission form.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub category: String,
    pub content: String,
    /// Comma separated, sent as typed.
    pub tags: String,
    /// Values keyed by template field key.
    pub metadata: Map<String, Value>,
    pub attachments: Vec<Attachment>,
}

impl PostDraft {
    /// Checks required fields and shapes the metadata by the category
    /// template. Blank values count as missing.
    pub fn into_new_post(self, template: Option<&PostTemplate>) -> AppResult<NewPost> {
        let title = require_text(&self.title, "Title")?;
        let category = require_text(&self.category, "Category")?;

        let metadata = match template {
            Some(template) => template_metadata(template, self.metadata)?,
            None => self
                .metadata
                .into_iter()
                .filter(|(_, value)| !is_blank(value))
                .collect(),
        };

        Ok(NewPost {
            title,
            category,
            content: self.content.trim().to_string(),
            tags: self.tags.trim().to_string(),
            metadata,
            attachments: self.attachments,
        })
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Keeps only the template's fields, in template order.
fn template_metadata(
    template: &PostTemplate,
    mut values: Map<String, Value>,
) -> AppResult<Map<String, Value>> {
    let mut metadata = Map::new();
    for field in &template.fields {
        match values.remove(&field.key) {
            Some(value) if !is_blank(&value) => {
                let value = match value {
                    Value::String(text) => Value::String(text.trim().to_string()),
                    other => other,
                };
                metadata.insert(field.key.clone(), value);
            }
            _ if field.required => {
                let label = field.label.as_deref().unwrap_or(&field.key);
                return Err(AppError::validation(format!("{label} is required")));
            }
            _ => {}
        }
    }
    Ok(metadata)
}

/// Assembles flat comments into a tree by `parent_id`, keeping server order
/// among siblings. Replies the server already nested are kept. Comments whose
/// parent is missing become roots.
pub fn build_comment_tree(comments: Vec<Comment>) -> Vec<Comment> {
    let ids: HashSet<i64> = comments.iter().map(|comment| comment.id).collect();
    let mut children: HashMap<i64, Vec<Comment>> = HashMap::new();
    let mut roots = Vec::new();

    for comment in comments {
        match comment.parent_id {
            Some(parent) if parent != comment.id && ids.contains(&parent) => {
                children.entry(parent).or_default().push(comment)
            }
            _ => roots.push(comment),
        }
    }

    let mut tree: Vec<Comment> = roots
        .into_iter()
        .map(|root| attach_replies(root, &mut children))
        .collect();

    // parent chains that loop back on themselves never reach a root
    let mut stranded: Vec<Comment> = children.into_values().flatten().collect();
    stranded.sort_by_key(|comment| comment.id);
    tree.extend(stranded);
    tree
}

fn attach_replies(mut comment: Comment, children: &mut HashMap<i64, Vec<Comment>>) -> Comment {
    if let Some(replies) = children.remove(&comment.id) {
        comment.replies.extend(
            replies
                .into_iter()
                .map(|reply| attach_replies(reply, children)),
        );
    }
    comment
}

pub struct PostsPage {
    ctx: Arc<PageContext>,
    list: ListView,
    detail: ListView,
    /// Candidates from the last similarity check, used for the 409 advisory.
    similar: Mutex<Vec<SimilarPost>>,
}

impl PostsPage {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        Self {
            ctx,
            list: ListView::new(POSTS_LIST, "No posts yet, be the first", "Failed to load posts"),
            detail: ListView::new(POST_DETAIL, "Post not found", "Failed to load the post"),
            similar: Mutex::new(Vec::new()),
        }
    }

    pub async fn load(&self) -> RenderOutcome {
        render_list(
            &self.ctx,
            &self.list,
            posts::fetch_posts(&self.ctx.api),
            post_card,
        )
        .await
    }

    pub async fn templates(&self) -> AppResult<Vec<PostTemplate>> {
        posts::fetch_templates(&self.ctx.api).await
    }

    /// Post plus its comment tree, rendered into the detail container.
    pub async fn open_post(&self, post_id: i64) -> RenderOutcome {
        self.ctx.surface.replace(POST_DETAIL, String::new());
        let (post, comments) = tokio::join!(
            posts::fetch_post(&self.ctx.api, post_id),
            posts::fetch_comments(&self.ctx.api, post_id),
        );

        match (post, comments) {
            (Ok(post), Ok(comments)) => {
                let count = comments.len();
                let tree = build_comment_tree(comments);
                self.ctx
                    .surface
                    .replace(POST_DETAIL, post_detail(&post, &tree));
                RenderOutcome::Rendered(count)
            }
            (Err(err), _) | (_, Err(err)) => show_failure(&self.ctx, &self.detail, err),
        }
    }

    /// Advisory list of near-duplicates for a draft. Never blocks anything;
    /// a failed check only clears the advisory.
    pub async fn check_similar(&self, title: &str, content: &str) -> Vec<SimilarPost> {
        let (title, content) = (title.trim(), content.trim());
        if title.is_empty() && content.is_empty() {
            self.remember_similar(Vec::new());
            return Vec::new();
        }

        let candidates = match posts::fetch_similar(&self.ctx.api, title, content).await {
            Ok(candidates) => candidates,
            Err(err) if err.is_session() => {
                self.ctx.redirect_to_login();
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(
                    component = "posts",
                    code = ?err.code,
                    message = %err.message,
                    "similarity check failed"
                );
                Vec::new()
            }
        };
        self.remember_similar(candidates.clone());
        candidates
    }

    fn remember_similar(&self, candidates: Vec<SimilarPost>) {
        self.ctx
            .surface
            .replace(POST_ADVISORY, similar_posts_advisory(&candidates));
        *self.similar.lock().unwrap_or_else(PoisonError::into_inner) = candidates;
    }

    fn duplicate_advice(&self, err: &AppError) -> String {
        let similar = self.similar.lock().unwrap_or_else(PoisonError::into_inner);
        if similar.is_empty() {
            return err.message.clone();
        }
        let titles: Vec<String> = similar
            .iter()
            .map(|candidate| format!("\"{}\" ({:.0}%)", candidate.title, candidate.score * 100.0))
            .collect();
        format!("Possible duplicate of {}", titles.join(", "))
    }

    pub async fn submit(
        &self,
        draft: PostDraft,
        template: Option<&PostTemplate>,
    ) -> ActionOutcome<Value> {
        let post = match draft.into_new_post(template) {
            Ok(post) => post,
            Err(err) => return invalid(&self.ctx, "posts.create", err),
        };
        tracing::info!(
            component = "posts",
            category = %post.category,
            attachments = post.attachments.len(),
            "submitting post"
        );

        let outcome = perform_submission(
            &self.ctx,
            "posts.create",
            posts::create_post(&self.ctx.api, post),
            "Post published",
            |err| self.duplicate_advice(err),
        )
        .await;

        if outcome.succeeded() {
            self.remember_similar(Vec::new());
            self.load().await;
        }
        outcome
    }

    pub async fn comment(
        &self,
        post_id: i64,
        content: &str,
        parent_id: Option<i64>,
    ) -> ActionOutcome<Value> {
        if let Err(err) = validate_comment(content) {
            let message = err
                .message
                .map(|text| text.to_string())
                .unwrap_or_else(|| err.code.to_string());
            return invalid(&self.ctx, "posts.comment", AppError::validation(message));
        }

        let outcome = perform(
            &self.ctx,
            "posts.comment",
            posts::add_comment(&self.ctx.api, post_id, content.trim().to_string(), parent_id),
            "Comment posted",
        )
        .await;

        if outcome.succeeded() {
            self.open_post(post_id).await;
        }
        outcome
    }

    pub async fn react(&self, post_id: i64) -> ActionOutcome<Value> {
        let outcome = perform(
            &self.ctx,
            "posts.react",
            posts::react_to_post(&self.ctx.api, post_id, DEFAULT_REACTION.to_string()),
            "Reaction saved",
        )
        .await;

        if outcome.succeeded() {
            self.open_post(post_id).await;
        }
        outcome
    }

    pub async fn create_group(&self, name: &str, description: &str) -> ActionOutcome<Group> {
        let name = match require_text(name, "Group name") {
            Ok(name) => name,
            Err(err) => return invalid(&self.ctx, "groups.create", err),
        };
        let description = Some(description.trim().to_string()).filter(|text| !text.is_empty());

        perform(
            &self.ctx,
            "groups.create",
            posts::create_group(&self.ctx.api, name, description),
            "Group created",
        )
        .await
    }
}
