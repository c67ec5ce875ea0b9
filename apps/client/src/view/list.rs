use std::future::Future;

use crate::error::{AppError, AppErrorCode, AppResult};
use crate::session::PageContext;
use crate::view::templates::state_block;

/// A container that shows one fetched collection.
#[derive(Debug, Clone)]
pub struct ListView {
    pub container: &'static str,
    pub empty: String,
    pub error: String,
}

impl ListView {
    pub fn new(container: &'static str, empty_text: &str, error_text: &str) -> Self {
        Self {
            container,
            empty: state_block("empty-state", "fa-inbox", empty_text),
            error: state_block("error-state", "fa-exclamation-circle", error_text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(usize),
    Empty,
    Failed(AppErrorCode),
    /// The session was gone; the surface is on its way to the login page.
    Redirected,
    /// The view moved on before the response arrived; nothing was drawn.
    Stale,
}

impl RenderOutcome {
    pub fn is_redirected(self) -> bool {
        self == RenderOutcome::Redirected
    }
}

/// Clears the container, awaits the fetch and replaces the container with the
/// items in server order, the empty block, or the error block. Never fails.
pub async fn render_list<T, F, M>(
    ctx: &PageContext,
    view: &ListView,
    fetch: F,
    template: M,
) -> RenderOutcome
where
    F: Future<Output = AppResult<Vec<T>>>,
    M: Fn(&T) -> String,
{
    ctx.surface.replace(view.container, String::new());
    match fetch.await {
        Ok(items) => show_items(ctx, view, &items, template),
        Err(err) => show_failure(ctx, view, err),
    }
}

/// Renders a collection that is already in hand.
pub fn show_items<T, M>(ctx: &PageContext, view: &ListView, items: &[T], template: M) -> RenderOutcome
where
    M: Fn(&T) -> String,
{
    if items.is_empty() {
        ctx.surface.replace(view.container, view.empty.clone());
        return RenderOutcome::Empty;
    }

    let markup: String = items.iter().map(template).collect();
    ctx.surface.replace(view.container, markup);
    RenderOutcome::Rendered(items.len())
}

pub fn show_failure(ctx: &PageContext, view: &ListView, err: AppError) -> RenderOutcome {
    if err.is_session() {
        ctx.redirect_to_login();
        return RenderOutcome::Redirected;
    }

    tracing::error!(
        component = "view.list",
        container = view.container,
        code = ?err.code,
        message = %err.message,
        details = err.details.as_deref().unwrap_or(""),
        "list load failed"
    );
    ctx.surface.replace(view.container, view.error.clone());
    RenderOutcome::Failed(err.code)
}
