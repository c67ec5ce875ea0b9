use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
    /// Non-blocking hint, e.g. a possible duplicate post.
    Advisory,
}

/// Transient banner that dismisses itself once `ttl` has elapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    #[serde(skip)]
    pub ttl: Duration,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            level,
            text: text.into(),
            ttl,
        }
    }
}

/// Everything a page controller may do to the screen. Containers are replaced
/// wholesale; there is no diffing.
pub trait Surface: Send + Sync {
    fn replace(&self, container: &str, markup: String);

    fn navigate(&self, location: &str);

    fn notify(&self, notice: Notice);

    fn scroll_to_bottom(&self, container: &str);

    fn input_value(&self, field: &str) -> String;

    fn set_input_value(&self, field: &str, value: &str);

    /// Yes/no prompt shown before destructive or outward actions.
    fn confirm(&self, prompt: &str) -> bool;
}

#[derive(Debug, Default)]
struct SurfaceState {
    containers: HashMap<String, String>,
    inputs: HashMap<String, String>,
    navigations: Vec<String>,
    notices: Vec<(Notice, Instant)>,
    scrolls: HashMap<String, usize>,
    prompts: Vec<String>,
    decline_prompts: bool,
}

/// Headless surface that keeps the rendered state in memory.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurfaceSnapshot {
    pub location: Option<String>,
    pub containers: BTreeMap<String, String>,
    pub notices: Vec<Notice>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn container(&self, id: &str) -> Option<String> {
        self.lock().containers.get(id).cloned()
    }

    /// Last navigation target, if the page navigated away.
    pub fn location(&self) -> Option<String> {
        self.lock().navigations.last().cloned()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    /// Notices whose display time has not run out yet.
    pub fn active_notices(&self) -> Vec<Notice> {
        let now = Instant::now();
        let mut state = self.lock();
        state.notices.retain(|(_, expires_at)| *expires_at > now);
        state.notices.iter().map(|(notice, _)| notice.clone()).collect()
    }

    pub fn scroll_count(&self, container: &str) -> usize {
        self.lock().scrolls.get(container).copied().unwrap_or(0)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    /// Makes every later `confirm` answer "no".
    pub fn decline_prompts(&self, decline: bool) {
        self.lock().decline_prompts = decline;
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        let notices = self.active_notices();
        let state = self.lock();
        SurfaceSnapshot {
            location: state.navigations.last().cloned(),
            containers: state
                .containers
                .iter()
                .map(|(id, markup)| (id.clone(), markup.clone()))
                .collect(),
            notices,
        }
    }
}

impl Surface for MemorySurface {
    fn replace(&self, container: &str, markup: String) {
        self.lock().containers.insert(container.to_string(), markup);
    }

    fn navigate(&self, location: &str) {
        tracing::info!(component = "surface", location, "navigating");
        self.lock().navigations.push(location.to_string());
    }

    fn notify(&self, notice: Notice) {
        let expires_at = Instant::now() + notice.ttl;
        self.lock().notices.push((notice, expires_at));
    }

    fn scroll_to_bottom(&self, container: &str) {
        *self.lock().scrolls.entry(container.to_string()).or_insert(0) += 1;
    }

    fn input_value(&self, field: &str) -> String {
        self.lock().inputs.get(field).cloned().unwrap_or_default()
    }

    fn set_input_value(&self, field: &str, value: &str) {
        self.lock()
            .inputs
            .insert(field.to_string(), value.to_string());
    }

    fn confirm(&self, prompt: &str) -> bool {
        let mut state = self.lock();
        state.prompts.push(prompt.to_string());
        !state.decline_prompts
    }
}
