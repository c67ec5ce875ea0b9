#![allow(dead_code)]

//! In-process stand-in for the campus API. Every request is recorded so tests
//! can check which calls were (or were not) made.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use campus_client::view::{MemorySurface, Surface};
use campus_client::{ApiClient, ClientConfig, PageContext, PageSession, SessionOutcome};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

pub const SELF_ID: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
}

/// Server-side data, freely editable by tests between calls.
pub struct Backend {
    pub user: Value,
    pub activities: Vec<Value>,
    pub friends: Vec<Value>,
    pub requests: Vec<Value>,
    pub directory: Vec<Value>,
    pub conversations: Vec<Value>,
    pub threads: HashMap<String, Vec<Value>>,
    pub posts: Vec<Value>,
    pub comments: HashMap<i64, Vec<Value>>,
    pub templates: Vec<Value>,
    pub similar: Vec<Value>,
    pub profile: Value,
    pub detailed: Value,
    pub last_post_fields: HashMap<String, String>,
    pub last_post_files: Vec<String>,
    pub last_profile_update: Option<Value>,
    next_id: i64,
}

impl Backend {
    pub fn seeded() -> Self {
        Self {
            user: json!({"user_id": SELF_ID, "username": "alice"}),
            activities: vec![
                json!({
                    "id": 1, "title": "Basketball league", "type": "sports",
                    "time": "2025-05-01 18:00", "location": "Gym",
                    "participant_count": 10, "is_joined": false, "is_favorited": false
                }),
                json!({
                    "id": 2, "title": "Chess club night", "type": "club",
                    "time": "2025-05-02 19:00", "location": "Library",
                    "participant_count": 4, "is_joined": false, "is_favorited": false
                }),
                json!({
                    "id": 3, "title": "Spring concert", "type": "culture",
                    "time": "2025-05-03 20:00", "location": "Hall",
                    "participant_count": 300, "is_joined": false, "is_favorited": false,
                    "full": true
                }),
            ],
            friends: vec![json!({"user_id": 2, "username": "bob", "bio": "Physics"})],
            requests: vec![json!({
                "friendship_id": 11, "requester_id": 3,
                "requester_username": "carol", "created_at": "2025-04-18 10:00:00"
            })],
            directory: vec![
                json!({"user_id": 2, "username": "bob", "friendship_status": "accepted"}),
                json!({"user_id": 3, "username": "carol", "friendship_status": "pending"}),
                json!({"user_id": 4, "username": "alice_w", "friendship_status": null}),
                json!({"user_id": 5, "username": "dave", "friendship_status": "rejected"}),
            ],
            conversations: vec![json!({
                "user_id": 2, "username": "bob", "last_message": "See you",
                "last_message_time": "2025-04-18 09:00:00",
                "unread_count": 2, "is_own_last_message": false
            })],
            threads: HashMap::from([(
                "2".to_string(),
                vec![json!({
                    "id": 1, "sender_id": 2, "receiver_id": SELF_ID,
                    "content": "See you", "created_at": "2025-04-18 09:00:00", "is_own": false
                })],
            )]),
            posts: vec![json!({
                "id": 1, "title": "Lost umbrella", "category": "lost-found",
                "content": "Black umbrella near the library", "tags": "lost,umbrella",
                "reactions": {"count": 0, "reacted": false}, "comment_count": 2,
                "created_at": "2025-04-18 08:00:00"
            })],
            comments: HashMap::from([(
                1,
                vec![
                    json!({"id": 1, "post_id": 1, "parent_id": null, "username": "bob", "content": "Which floor?"}),
                    json!({"id": 2, "post_id": 1, "parent_id": 1, "username": "alice", "content": "Third floor"}),
                ],
            )]),
            templates: vec![json!({
                "category": "lost-found",
                "fields": [
                    {"key": "location", "label": "Location", "required": true},
                    {"key": "reward", "required": false, "type": "number"}
                ]
            })],
            similar: vec![json!({"id": 1, "title": "Lost umbrella", "score": 0.92})],
            profile: json!({
                "user_id": SELF_ID, "username": "alice",
                "email": "alice@campus.edu", "major": "Physics"
            }),
            detailed: json!({"real_name": "Alice Wang", "major": "Physics", "interests": ["chess"]}),
            last_post_fields: HashMap::new(),
            last_post_files: Vec::new(),
            last_profile_update: None,
            next_id: 100,
        }
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_name(&self, user_id: &str) -> Option<String> {
        self.directory
            .iter()
            .chain(self.friends.iter())
            .find(|user| id_of(&user["user_id"]) == user_id)
            .and_then(|user| user["username"].as_str().map(str::to_string))
    }
}

pub struct StubState {
    backend: Mutex<Backend>,
    hits: Mutex<Vec<Hit>>,
    html_paths: Mutex<HashSet<String>>,
    failures: Mutex<HashMap<String, (u16, String)>>,
    pub unauthorized: AtomicBool,
    pub require_cookie: AtomicBool,
    pub redirect_to_login: AtomicBool,
    pub conversations_delay_ms: AtomicU64,
    thread_delays: Mutex<HashMap<String, Duration>>,
}

type Shared = Arc<StubState>;

pub struct StubServer {
    pub state: Shared,
    pub base_url: Url,
    task: JoinHandle<()>,
}

impl StubServer {
    pub async fn start() -> Self {
        Self::start_with(Backend::seeded()).await
    }

    pub async fn start_with(backend: Backend) -> Self {
        let state = Arc::new(StubState {
            backend: Mutex::new(backend),
            hits: Mutex::new(Vec::new()),
            html_paths: Mutex::new(HashSet::new()),
            failures: Mutex::new(HashMap::new()),
            unauthorized: AtomicBool::new(false),
            require_cookie: AtomicBool::new(false),
            redirect_to_login: AtomicBool::new(false),
            conversations_delay_ms: AtomicU64::new(0),
            thread_delays: Mutex::new(HashMap::new()),
        });

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub address");
        let app = router(state.clone());
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve stub api");
        });

        Self {
            state,
            base_url: Url::parse(&format!("http://{addr}")).expect("stub url"),
            task,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone())
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("api client")
    }

    /// Establishes a session on a fresh surface with the default config.
    pub async fn open_page(&self) -> (Arc<MemorySurface>, Arc<PageContext>) {
        self.open_page_with(self.config()).await
    }

    pub async fn open_page_with(
        &self,
        config: ClientConfig,
    ) -> (Arc<MemorySurface>, Arc<PageContext>) {
        let memory = Arc::new(MemorySurface::new());
        let surface: Arc<dyn Surface> = memory.clone();
        let api = ApiClient::new(&config).expect("api client");
        match PageSession::establish(api, surface, config).await {
            SessionOutcome::Active(ctx) => (memory, ctx),
            SessionOutcome::Redirected => panic!("stub session was not established"),
        }
    }

    pub fn backend(&self) -> MutexGuard<'_, Backend> {
        self.state.backend.lock().expect("backend lock")
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().expect("hits lock").clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.hits()
            .iter()
            .filter(|hit| hit.method == method && hit.path == path)
            .count()
    }

    pub fn reset_hits(&self) {
        self.state.hits.lock().expect("hits lock").clear();
    }

    /// Answers `path` with an HTML page instead of JSON.
    pub fn serve_html(&self, path: &str) {
        self.state
            .html_paths
            .lock()
            .expect("html lock")
            .insert(path.to_string());
    }

    /// Answers `path` with `{success: false, error}` and the given status.
    pub fn fail(&self, path: &str, status: u16, error: &str) {
        self.state
            .failures
            .lock()
            .expect("failures lock")
            .insert(path.to_string(), (status, error.to_string()));
    }

    pub fn clear_failures(&self) {
        self.state.failures.lock().expect("failures lock").clear();
    }

    pub fn set_unauthorized(&self, value: bool) {
        self.state.unauthorized.store(value, Ordering::SeqCst);
    }

    pub fn set_conversations_delay(&self, delay: Duration) {
        self.state
            .conversations_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Holds back the thread with `user_id` before answering.
    pub fn set_thread_delay(&self, user_id: &str, delay: Duration) {
        self.state
            .thread_delays
            .lock()
            .expect("delays lock")
            .insert(user_id.to_string(), delay);
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Polls `check` until it holds or `timeout` runs out.
pub async fn eventually(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

fn id_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn ok(data: Value) -> Response {
    Json(json!({"success": true, "data": data})).into_response()
}

fn ok_message(message: &str) -> Response {
    Json(json!({"success": true, "message": message})).into_response()
}

fn fail(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({"success": false, "error": error}))).into_response()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/login", get(login_page))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/current-user", get(current_user))
        .route("/api/activities", get(list_activities))
        .route("/api/activities/search", get(search_activities))
        .route("/api/activities/:id/join", post(join_activity))
        .route("/api/activities/:id/leave", post(leave_activity))
        .route("/api/activities/:id/favorite", post(favorite_activity))
        .route("/api/friends", get(list_friends))
        .route("/api/friends/requests", get(list_requests))
        .route("/api/friends/request", post(send_request))
        .route("/api/friends/request/:id", post(respond_request))
        .route("/api/friends/:id", delete(remove_friend))
        .route("/api/users/search", get(search_users))
        .route("/api/messages", post(send_message))
        .route("/api/messages/conversations", get(conversations))
        .route("/api/messages/:user_id", get(thread))
        .route("/api/post-templates", get(templates))
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/similar", get(similar_posts))
        .route("/api/posts/:id", get(get_post))
        .route("/api/posts/:id/react", post(react))
        .route("/api/posts/:id/comments", get(list_comments).post(add_comment))
        .route("/api/groups", post(create_group))
        .route("/api/user/profile", get(profile).put(update_profile))
        .route(
            "/api/user/profile/detailed",
            get(detailed_profile).put(update_detailed_profile),
        )
        .route("/api/user/joined-activities", get(joined_activities))
        .route("/api/user/favorites", get(favorite_activities))
        .layer(middleware::from_fn_with_state(state.clone(), gate))
        .with_state(state)
}

async fn gate(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    state.hits.lock().expect("hits lock").push(Hit {
        method: req.method().to_string(),
        path: path.clone(),
        query: req.uri().query().map(str::to_string),
    });

    if path == "/login" || path == "/api/login" {
        return next.run(req).await;
    }

    let html = state.html_paths.lock().expect("html lock").contains(&path);
    if html {
        return Html("<!DOCTYPE html><html><body>Please log in</body></html>").into_response();
    }

    let has_cookie = req
        .headers()
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|cookies| cookies.contains("session=ok"));
    let authorized = !state.unauthorized.load(Ordering::SeqCst)
        && (!state.require_cookie.load(Ordering::SeqCst) || has_cookie);
    if !authorized {
        if state.redirect_to_login.load(Ordering::SeqCst) {
            return Redirect::to("/login").into_response();
        }
        return fail(StatusCode::UNAUTHORIZED, "Not logged in");
    }

    let failure = state
        .failures
        .lock()
        .expect("failures lock")
        .get(&path)
        .cloned();
    if let Some((status, error)) = failure {
        let status = StatusCode::from_u16(status).expect("failure status");
        return fail(status, &error);
    }

    next.run(req).await
}

async fn login_page() -> Html<&'static str> {
    Html("<!DOCTYPE html><html><body><form id=\"login\"></form></body></html>")
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" && body["username"].is_string() {
        (
            [(SET_COOKIE, "session=ok; Path=/")],
            Json(json!({"success": true, "message": "Logged in"})),
        )
            .into_response()
    } else {
        fail(StatusCode::OK, "Invalid username or password")
    }
}

async fn logout() -> Response {
    ok_message("Logged out")
}

async fn current_user(State(state): State<Shared>) -> Response {
    let user = state.backend.lock().expect("backend lock").user.clone();
    ok(user)
}

// -- Activities --

async fn list_activities(State(state): State<Shared>) -> Response {
    let activities = state.backend.lock().expect("backend lock").activities.clone();
    ok(Value::Array(activities))
}

async fn search_activities(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let keyword = params.get("keyword").cloned().unwrap_or_default().to_lowercase();
    let kind = params.get("type").cloned().unwrap_or_default();
    let backend = state.backend.lock().expect("backend lock");
    let found: Vec<Value> = backend
        .activities
        .iter()
        .filter(|activity| {
            let title = activity["title"].as_str().unwrap_or_default().to_lowercase();
            title.contains(&keyword) && (kind.is_empty() || activity["type"] == kind.as_str())
        })
        .cloned()
        .collect();
    ok(Value::Array(found))
}

fn with_activity(
    state: &StubState,
    id: i64,
    change: impl FnOnce(&mut Value) -> Result<(), String>,
) -> Response {
    let mut backend = state.backend.lock().expect("backend lock");
    let Some(activity) = backend.activities.iter_mut().find(|a| a["id"] == id) else {
        return fail(StatusCode::NOT_FOUND, "Activity not found");
    };
    match change(activity) {
        Ok(()) => ok_message("ok"),
        Err(error) => fail(StatusCode::OK, &error),
    }
}

async fn join_activity(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    with_activity(&state, id, |activity| {
        if activity["full"] == true {
            return Err("Activity is full".to_string());
        }
        if activity["is_joined"] == true {
            return Err("Already joined".to_string());
        }
        activity["is_joined"] = json!(true);
        activity["participant_count"] = json!(activity["participant_count"].as_i64().unwrap_or(0) + 1);
        Ok(())
    })
}

async fn leave_activity(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    with_activity(&state, id, |activity| {
        if activity["is_joined"] != true {
            return Err("Not joined".to_string());
        }
        activity["is_joined"] = json!(false);
        activity["participant_count"] = json!(activity["participant_count"].as_i64().unwrap_or(1) - 1);
        Ok(())
    })
}

async fn favorite_activity(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    with_activity(&state, id, |activity| {
        let favorited = activity["is_favorited"] == true;
        activity["is_favorited"] = json!(!favorited);
        Ok(())
    })
}

// -- Friends --

async fn list_friends(State(state): State<Shared>) -> Response {
    let friends = state.backend.lock().expect("backend lock").friends.clone();
    ok(Value::Array(friends))
}

async fn list_requests(State(state): State<Shared>) -> Response {
    let requests = state.backend.lock().expect("backend lock").requests.clone();
    let count = requests.len();
    Json(json!({"success": true, "data": requests, "count": count})).into_response()
}

async fn send_request(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let target = id_of(&body["user_id"]);
    let mut backend = state.backend.lock().expect("backend lock");
    let Some(user) = backend
        .directory
        .iter_mut()
        .find(|user| id_of(&user["user_id"]) == target)
    else {
        return fail(StatusCode::NOT_FOUND, "User not found");
    };
    if user["friendship_status"] == "pending" || user["friendship_status"] == "accepted" {
        return fail(StatusCode::BAD_REQUEST, "Request already sent");
    }
    user["friendship_status"] = json!("pending");
    ok_message("Friend request sent")
}

async fn respond_request(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.backend.lock().expect("backend lock");
    let Some(index) = backend
        .requests
        .iter()
        .position(|request| request["friendship_id"] == id)
    else {
        return fail(StatusCode::NOT_FOUND, "Request not found");
    };
    let request = backend.requests.remove(index);
    if body["action"] == "accept" {
        backend.friends.push(json!({
            "user_id": request["requester_id"],
            "username": request["requester_username"],
        }));
    }
    ok_message("Request handled")
}

async fn remove_friend(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut backend = state.backend.lock().expect("backend lock");
    let before = backend.friends.len();
    backend.friends.retain(|friend| id_of(&friend["user_id"]) != id);
    if backend.friends.len() == before {
        return fail(StatusCode::NOT_FOUND, "Friend not found");
    }
    ok_message("Friend removed")
}

async fn search_users(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let keyword = params.get("keyword").cloned().unwrap_or_default();
    let backend = state.backend.lock().expect("backend lock");
    let found: Vec<Value> = backend
        .directory
        .iter()
        .filter(|user| user["username"].as_str().unwrap_or_default().contains(&keyword))
        .cloned()
        .collect();
    ok(Value::Array(found))
}

// -- Messages --

async fn conversations(State(state): State<Shared>) -> Response {
    let delay = state.conversations_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    let conversations = state.backend.lock().expect("backend lock").conversations.clone();
    ok(Value::Array(conversations))
}

async fn thread(State(state): State<Shared>, Path(user_id): Path<String>) -> Response {
    let delay = state
        .thread_delays
        .lock()
        .expect("delays lock")
        .get(&user_id)
        .copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let backend = state.backend.lock().expect("backend lock");
    let target = backend
        .user_name(&user_id)
        .map(|username| json!({"user_id": user_id, "username": username}))
        .unwrap_or(Value::Null);
    let messages = backend.threads.get(&user_id).cloned().unwrap_or_default();
    Json(json!({"success": true, "data": messages, "target_user": target})).into_response()
}

async fn send_message(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let receiver = id_of(&body["receiver_id"]);
    let content = body["content"].as_str().unwrap_or_default().to_string();
    if content.trim().is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Message cannot be empty");
    }

    let mut backend = state.backend.lock().expect("backend lock");
    let Some(username) = backend.user_name(&receiver) else {
        return fail(StatusCode::NOT_FOUND, "User not found");
    };
    let id = backend.next_id();
    backend.threads.entry(receiver.clone()).or_default().push(json!({
        "id": id, "sender_id": SELF_ID, "receiver_id": receiver,
        "content": content, "created_at": "2025-04-18 12:00:00", "is_own": true
    }));

    let existing = backend
        .conversations
        .iter_mut()
        .find(|conversation| id_of(&conversation["user_id"]) == receiver);
    match existing {
        Some(conversation) => {
            conversation["last_message"] = json!(content);
            conversation["is_own_last_message"] = json!(true);
            conversation["unread_count"] = json!(0);
        }
        None => backend.conversations.insert(
            0,
            json!({
                "user_id": receiver, "username": username, "last_message": content,
                "last_message_time": "2025-04-18 12:00:00",
                "unread_count": 0, "is_own_last_message": true
            }),
        ),
    }
    ok(json!({"id": id}))
}

// -- Posts --

async fn templates(State(state): State<Shared>) -> Response {
    let templates = state.backend.lock().expect("backend lock").templates.clone();
    ok(Value::Array(templates))
}

async fn list_posts(State(state): State<Shared>) -> Response {
    let posts = state.backend.lock().expect("backend lock").posts.clone();
    ok(Value::Array(posts))
}

async fn get_post(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let backend = state.backend.lock().expect("backend lock");
    match backend.posts.iter().find(|post| post["id"] == id) {
        Some(post) => ok(post.clone()),
        None => fail(StatusCode::NOT_FOUND, "Post not found"),
    }
}

async fn similar_posts(State(state): State<Shared>) -> Response {
    let similar = state.backend.lock().expect("backend lock").similar.clone();
    ok(Value::Array(similar))
}

async fn create_post(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    let mut fields = HashMap::new();
    let mut files = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "files" {
            files.push(field.file_name().unwrap_or("upload").to_string());
            let _ = field.bytes().await;
        } else {
            fields.insert(name, field.text().await.unwrap_or_default());
        }
    }

    let mut backend = state.backend.lock().expect("backend lock");
    let title = fields.get("title").cloned().unwrap_or_default();
    backend.last_post_fields = fields.clone();
    backend.last_post_files = files.clone();
    if backend.posts.iter().any(|post| post["title"] == title.as_str()) {
        return fail(StatusCode::CONFLICT, "A very similar post already exists");
    }

    let id = backend.next_id();
    let media: Vec<Value> = files
        .iter()
        .map(|name| json!({"url": format!("/uploads/{name}"), "name": name}))
        .collect();
    let metadata: Value = fields
        .get("metadata")
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or(Value::Null);
    backend.posts.insert(
        0,
        json!({
            "id": id, "title": title,
            "category": fields.get("category").cloned().unwrap_or_default(),
            "content": fields.get("content").cloned().unwrap_or_default(),
            "tags": fields.get("tags").cloned().unwrap_or_default(),
            "metadata": metadata, "media": media,
            "reactions": {"count": 0, "reacted": false}, "comment_count": 0
        }),
    );
    ok(json!({"id": id}))
}

async fn react(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut backend = state.backend.lock().expect("backend lock");
    let Some(post) = backend.posts.iter_mut().find(|post| post["id"] == id) else {
        return fail(StatusCode::NOT_FOUND, "Post not found");
    };
    let count = post["reactions"]["count"].as_i64().unwrap_or(0);
    post["reactions"] = json!({"count": count + 1, "reacted": true});
    ok_message("Reaction saved")
}

async fn list_comments(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let comments = state
        .backend
        .lock()
        .expect("backend lock")
        .comments
        .get(&id)
        .cloned()
        .unwrap_or_default();
    ok(Value::Array(comments))
}

async fn add_comment(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.backend.lock().expect("backend lock");
    let comment_id = backend.next_id();
    backend.comments.entry(id).or_default().push(json!({
        "id": comment_id, "post_id": id, "parent_id": body["parent_id"],
        "username": "alice", "content": body["content"]
    }));
    ok(json!({"id": comment_id}))
}

async fn create_group(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let id = state.backend.lock().expect("backend lock").next_id();
    ok(json!({"id": id, "name": body["name"], "description": body["description"]}))
}

// -- Profile --

async fn profile(State(state): State<Shared>) -> Response {
    let profile = state.backend.lock().expect("backend lock").profile.clone();
    ok(profile)
}

async fn update_profile(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = state.backend.lock().expect("backend lock");
    for key in ["username", "email", "bio", "major"] {
        if let Some(value) = body.get(key) {
            backend.profile[key] = value.clone();
        }
    }
    backend.last_profile_update = Some(body);
    ok_message("Profile updated")
}

async fn detailed_profile(State(state): State<Shared>) -> Response {
    let detailed = state.backend.lock().expect("backend lock").detailed.clone();
    ok(detailed)
}

async fn update_detailed_profile(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    state.backend.lock().expect("backend lock").detailed = body;
    ok_message("Profile details updated")
}

async fn joined_activities(State(state): State<Shared>) -> Response {
    let backend = state.backend.lock().expect("backend lock");
    let joined: Vec<Value> = backend
        .activities
        .iter()
        .filter(|activity| activity["is_joined"] == true)
        .cloned()
        .collect();
    ok(Value::Array(joined))
}

async fn favorite_activities(State(state): State<Shared>) -> Response {
    let backend = state.backend.lock().expect("backend lock");
    let favorites: Vec<Value> = backend
        .activities
        .iter()
        .filter(|activity| activity["is_favorited"] == true)
        .cloned()
        .collect();
    ok(Value::Array(favorites))
}
