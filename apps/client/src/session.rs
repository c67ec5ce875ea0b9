use std::sync::Arc;

use campus_proto::models::CurrentUser;

use crate::api::{auth, ApiClient};
use crate::config::ClientConfig;
use crate::error::AppResult;
use crate::validation::require_text;
use crate::view::templates::welcome;
use crate::view::{Notice, NoticeLevel, Surface};

pub const HOME_PATH: &str = "/";

/// Page-scoped state shared by every controller of one page load.
pub struct PageContext {
    pub api: ApiClient,
    pub surface: Arc<dyn Surface>,
    pub user: CurrentUser,
    pub config: ClientConfig,
}

impl PageContext {
    pub fn notify(&self, level: NoticeLevel, text: impl Into<String>) {
        self.surface
            .notify(Notice::new(level, text, self.config.notice_ttl));
    }

    pub fn notify_success(&self, text: impl Into<String>) {
        self.notify(NoticeLevel::Success, text);
    }

    pub fn notify_error(&self, text: impl Into<String>) {
        self.notify(NoticeLevel::Error, text);
    }

    pub fn notify_advisory(&self, text: impl Into<String>) {
        self.notify(NoticeLevel::Advisory, text);
    }

    pub fn redirect_to_login(&self) {
        tracing::warn!(
            component = "session",
            user_id = %self.user.user_id,
            "session lost, redirecting to login"
        );
        self.surface.navigate(&self.config.login_path);
    }

    /// Header greeting shown by pages that carry a username display.
    pub fn show_welcome(&self, container: &str) {
        self.surface.replace(container, welcome(&self.user));
    }
}

pub enum SessionOutcome {
    Active(Arc<PageContext>),
    Redirected,
}

impl SessionOutcome {
    pub fn context(&self) -> Option<&Arc<PageContext>> {
        match self {
            SessionOutcome::Active(ctx) => Some(ctx),
            SessionOutcome::Redirected => None,
        }
    }
}

pub struct PageSession;

impl PageSession {
    /// Asks the server who is logged in. Every failure sends the surface to
    /// the login page and no loader runs.
    pub async fn establish(
        api: ApiClient,
        surface: Arc<dyn Surface>,
        config: ClientConfig,
    ) -> SessionOutcome {
        match auth::fetch_current_user(&api).await {
            Ok(user) => {
                tracing::info!(
                    component = "session",
                    user_id = %user.user_id,
                    username = %user.username,
                    "session established"
                );
                SessionOutcome::Active(Arc::new(PageContext {
                    api,
                    surface,
                    user,
                    config,
                }))
            }
            Err(err) => {
                tracing::warn!(
                    component = "session",
                    code = ?err.code,
                    message = %err.message,
                    "no session, redirecting to login"
                );
                surface.navigate(&config.login_path);
                SessionOutcome::Redirected
            }
        }
    }
}

/// Ends the session. The surface goes to the login page whatever the server
/// answered.
pub async fn logout(ctx: &PageContext) {
    if let Err(err) = auth::logout(&ctx.api).await {
        tracing::warn!(
            component = "session",
            code = ?err.code,
            message = %err.message,
            "logout request failed"
        );
    }
    ctx.surface.navigate(&ctx.config.login_path);
}

/// The one page that runs without a session.
pub struct LoginPage {
    api: ApiClient,
    surface: Arc<dyn Surface>,
    config: ClientConfig,
}

impl LoginPage {
    pub fn new(api: ApiClient, surface: Arc<dyn Surface>, config: ClientConfig) -> Self {
        Self {
            api,
            surface,
            config,
        }
    }

    pub async fn submit(&self, username: &str, password: &str) -> AppResult<()> {
        let result = self.try_login(username, password).await;
        match &result {
            Ok(()) => {
                tracing::info!(component = "session.login", "login accepted");
                self.surface.navigate(HOME_PATH);
            }
            Err(err) => {
                tracing::warn!(
                    component = "session.login",
                    code = ?err.code,
                    message = %err.message,
                    "login rejected"
                );
                self.surface.notify(Notice::new(
                    NoticeLevel::Error,
                    err.message.clone(),
                    self.config.notice_ttl,
                ));
            }
        }
        result
    }

    async fn try_login(&self, username: &str, password: &str) -> AppResult<()> {
        let username = require_text(username, "Username")?;
        require_text(password, "Password")?;
        auth::login(&self.api, username, password.to_string()).await?;
        Ok(())
    }
}
