use std::future::Future;

use crate::api::ApiResponse;
use crate::error::{AppError, AppErrorCode, AppResult};
use crate::session::PageContext;

/// Result of one mutation as the page sees it.
#[derive(Debug)]
pub enum ActionOutcome<T> {
    Succeeded(ApiResponse<T>),
    /// The session was gone; the surface is on its way to the login page.
    Redirected,
    /// 409 from the server; the advisory text that was shown.
    Conflict(String),
    Failed(AppError),
    /// The user declined the confirmation prompt; nothing was sent.
    Cancelled,
}

impl<T> ActionOutcome<T> {
    pub fn succeeded(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded(_))
    }

    pub fn error_code(&self) -> Option<AppErrorCode> {
        match self {
            ActionOutcome::Failed(err) => Some(err.code),
            _ => None,
        }
    }
}

/// Runs a mutation and reports it on the surface. On success the caller
/// reloads the affected lists; on failure nothing is reloaded.
pub async fn perform<T, F>(
    ctx: &PageContext,
    action: &'static str,
    request: F,
    success_text: &str,
) -> ActionOutcome<T>
where
    F: Future<Output = AppResult<ApiResponse<T>>>,
{
    perform_submission(ctx, action, request, success_text, |err| err.message.clone()).await
}

/// Like [`perform`], with the advisory text for a 409 supplied by the caller.
pub async fn perform_submission<T, F, C>(
    ctx: &PageContext,
    action: &'static str,
    request: F,
    success_text: &str,
    conflict_advice: C,
) -> ActionOutcome<T>
where
    F: Future<Output = AppResult<ApiResponse<T>>>,
    C: FnOnce(&AppError) -> String,
{
    match request.await {
        Ok(response) => {
            tracing::info!(component = "action", action, "action succeeded");
            ctx.notify_success(success_text);
            ActionOutcome::Succeeded(response)
        }
        Err(err) if err.is_session() => {
            ctx.redirect_to_login();
            ActionOutcome::Redirected
        }
        Err(err) if err.code == AppErrorCode::Conflict => {
            let advice = conflict_advice(&err);
            tracing::info!(
                component = "action",
                action,
                message = %err.message,
                "action rejected as conflicting"
            );
            ctx.notify_advisory(advice.clone());
            ActionOutcome::Conflict(advice)
        }
        Err(err) => {
            reject(ctx, action, &err);
            ActionOutcome::Failed(err)
        }
    }
}

/// Error notice plus diagnostic log for an action that did not go through.
pub fn reject(ctx: &PageContext, action: &'static str, err: &AppError) {
    tracing::error!(
        component = "action",
        action,
        code = ?err.code,
        status = err.status.unwrap_or_default(),
        message = %err.message,
        details = err.details.as_deref().unwrap_or(""),
        "action failed"
    );
    ctx.notify_error(err.message.clone());
}

/// Local validation failure: shown, logged, and no request is made.
pub fn invalid<T>(ctx: &PageContext, action: &'static str, err: AppError) -> ActionOutcome<T> {
    reject(ctx, action, &err);
    ActionOutcome::Failed(err)
}
