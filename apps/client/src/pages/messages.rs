use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use campus_proto::models::{Conversation, UserId};
use url::form_urlencoded;

use crate::action::reject;
use crate::api::chat;
use crate::error::AppError;
use crate::poll::PollHandle;
use crate::session::PageContext;
use crate::view::list::{show_failure, show_items};
use crate::view::templates::{chat_header, conversation_item, message_bubble, state_block};
use crate::view::{ListView, RenderOutcome};

pub const CONVERSATIONS_LIST: &str = "conversationsList";
pub const CHAT_AREA: &str = "chatArea";
pub const CHAT_MESSAGES: &str = "chatMessages";
pub const MESSAGE_INPUT: &str = "messageInput";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    ConversationsLoaded,
    ChatOpen(UserId),
    Sending(UserId),
    /// The page is gone; nothing transitions out of here.
    Closed,
}

impl ChatState {
    pub fn open_peer(&self) -> Option<&UserId> {
        match self {
            ChatState::ChatOpen(peer) | ChatState::Sending(peer) => Some(peer),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum SendOutcome {
    Sent,
    /// Blank input; no request was made.
    Empty,
    /// No conversation is open.
    NoChat,
    /// A send is already in flight for this chat.
    Busy,
    Redirected,
    Failed(AppError),
}

/// `user_id` from a page query string such as `user_id=7`. Anything other
/// than a plain id token is ignored.
pub fn deep_link_peer(query: &str) -> Option<UserId> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == "user_id")
        .and_then(|(_, value)| peer_id(&value))
}

/// A chat peer id as typed by a user. Only ASCII letters, digits, `-` and `_`.
pub fn peer_id(raw: &str) -> Option<UserId> {
    let value = raw.trim();
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    plain.then(|| UserId::new(value))
}

struct ChatInner {
    state: ChatState,
    /// Last fetched list, kept so the active mark can move without a refetch.
    conversations: Vec<Conversation>,
    poller: Option<PollHandle>,
}

/// The part of the page that poll ticks hold on to.
pub struct ChatView {
    ctx: Arc<PageContext>,
    conversations: ListView,
    inner: Mutex<ChatInner>,
}

impl ChatView {
    fn lock(&self) -> MutexGuard<'_, ChatInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ChatState {
        self.lock().state.clone()
    }

    fn is_closed(&self) -> bool {
        self.lock().state == ChatState::Closed
    }

    fn transition(&self, next: ChatState) {
        let mut inner = self.lock();
        if inner.state == ChatState::Closed {
            return;
        }
        tracing::debug!(
            component = "messages",
            from = ?inner.state,
            to = ?next,
            "chat state transition"
        );
        inner.state = next;
    }

    /// Moves to `Closed` and stops the poll timer. Ticks already in flight
    /// see `Closed` and draw nothing.
    /// Returns false if the view was already closed.
    fn close(&self) -> bool {
        let (was_open, poller) = {
            let mut inner = self.lock();
            let was_open = inner.state != ChatState::Closed;
            if was_open {
                tracing::info!(component = "messages", "messages view closed");
                inner.state = ChatState::Closed;
            }
            (was_open, inner.poller.take())
        };
        if let Some(poller) = poller {
            poller.stop();
        }
        was_open
    }

    /// The session is gone: shut the view down, then leave for the login page.
    /// A view that was already closed has left the page and stays quiet.
    fn end_session(&self) {
        if self.close() {
            self.ctx.redirect_to_login();
        }
    }

    fn is_polling(&self) -> bool {
        self.lock().poller.as_ref().is_some_and(PollHandle::is_running)
    }

    pub async fn load_conversations(&self) -> RenderOutcome {
        if self.is_closed() {
            return RenderOutcome::Stale;
        }

        let result = chat::fetch_conversations(&self.ctx.api).await;
        if matches!(&result, Err(err) if err.is_session()) {
            self.end_session();
            return RenderOutcome::Redirected;
        }
        if self.is_closed() {
            return RenderOutcome::Stale;
        }

        match result {
            Ok(conversations) => {
                let active = {
                    let mut inner = self.lock();
                    inner.conversations = conversations.clone();
                    if inner.state == ChatState::Idle {
                        inner.state = ChatState::ConversationsLoaded;
                    }
                    inner.state.open_peer().cloned()
                };
                show_items(&self.ctx, &self.conversations, &conversations, |item| {
                    conversation_item(item, active.as_ref())
                })
            }
            Err(err) => show_failure(&self.ctx, &self.conversations, err),
        }
    }

    fn mark_active(&self) {
        let (conversations, active) = {
            let inner = self.lock();
            (inner.conversations.clone(), inner.state.open_peer().cloned())
        };
        show_items(&self.ctx, &self.conversations, &conversations, |item| {
            conversation_item(item, active.as_ref())
        });
    }

    pub async fn open_chat(&self, peer: UserId) -> RenderOutcome {
        if self.is_closed() {
            return RenderOutcome::Stale;
        }
        tracing::info!(component = "messages", peer = %peer, "opening chat");
        self.transition(ChatState::ChatOpen(peer.clone()));
        self.mark_active();
        self.load_thread(&peer).await
    }

    /// Fetches the thread with `peer` and redraws the chat area, unless
    /// another chat was opened while the request was out.
    pub async fn load_thread(&self, peer: &UserId) -> RenderOutcome {
        let result = chat::fetch_thread(&self.ctx.api, peer).await;
        if matches!(&result, Err(err) if err.is_session()) {
            self.end_session();
            return RenderOutcome::Redirected;
        }
        if self.lock().state.open_peer() != Some(peer) {
            tracing::debug!(component = "messages", peer = %peer, "dropping stale thread");
            return RenderOutcome::Stale;
        }

        let thread = match result {
            Ok(thread) => thread,
            Err(err) => {
                tracing::error!(
                    component = "messages",
                    peer = %peer,
                    code = ?err.code,
                    message = %err.message,
                    "failed to load chat"
                );
                self.ctx.surface.replace(
                    CHAT_AREA,
                    state_block("error-state", "fa-exclamation-circle", "Failed to load messages"),
                );
                self.ctx.surface.replace(CHAT_MESSAGES, String::new());
                return RenderOutcome::Failed(err.code);
            }
        };

        let Some(target) = thread.peer else {
            self.ctx.surface.replace(
                CHAT_AREA,
                state_block("empty-chat", "fa-user-slash", "This user does not exist"),
            );
            self.ctx.surface.replace(CHAT_MESSAGES, String::new());
            return RenderOutcome::Empty;
        };

        self.ctx.surface.replace(CHAT_AREA, chat_header(&target));
        let outcome = if thread.messages.is_empty() {
            self.ctx.surface.replace(
                CHAT_MESSAGES,
                state_block("empty-chat", "fa-comments", "No messages yet, say hello"),
            );
            RenderOutcome::Empty
        } else {
            let bubbles: String = thread.messages.iter().map(message_bubble).collect();
            self.ctx.surface.replace(CHAT_MESSAGES, bubbles);
            RenderOutcome::Rendered(thread.messages.len())
        };
        self.ctx.surface.scroll_to_bottom(CHAT_MESSAGES);
        outcome
    }

    pub async fn send(&self) -> SendOutcome {
        let content = self.ctx.surface.input_value(MESSAGE_INPUT);
        let content = content.trim();
        if content.is_empty() {
            return SendOutcome::Empty;
        }

        let peer = {
            let mut inner = self.lock();
            match inner.state.clone() {
                ChatState::ChatOpen(peer) => {
                    inner.state = ChatState::Sending(peer.clone());
                    Some(peer)
                }
                ChatState::Sending(_) => return SendOutcome::Busy,
                _ => None,
            }
        };
        let Some(peer) = peer else {
            self.ctx.notify_error("Select a conversation first");
            return SendOutcome::NoChat;
        };

        let result = chat::send_message(&self.ctx.api, peer.clone(), content.to_string()).await;
        let still_open = {
            let mut inner = self.lock();
            let sending = ChatState::Sending(peer.clone());
            if inner.state == sending {
                inner.state = ChatState::ChatOpen(peer.clone());
            }
            inner.state.open_peer() == Some(&peer)
        };

        match result {
            Ok(_) => {
                tracing::info!(component = "messages", peer = %peer, "message sent");
                self.ctx.surface.set_input_value(MESSAGE_INPUT, "");
                if still_open {
                    self.load_thread(&peer).await;
                }
                self.load_conversations().await;
                SendOutcome::Sent
            }
            Err(err) if err.is_session() => {
                self.end_session();
                SendOutcome::Redirected
            }
            Err(err) => {
                reject(&self.ctx, "messages.send", &err);
                SendOutcome::Failed(err)
            }
        }
    }

    /// One poll tick: the conversation list, then the open thread if any.
    pub async fn refresh(&self) {
        if self.is_closed() {
            return;
        }
        if self.load_conversations().await.is_redirected() {
            return;
        }
        let open = self.lock().state.open_peer().cloned();
        if let Some(peer) = open {
            self.load_thread(&peer).await;
        }
    }
}

/// Conversation list plus one open chat, kept fresh by a poll timer.
/// Dropping the page closes the view and stops the timer.
pub struct MessagesPage {
    view: Arc<ChatView>,
}

impl MessagesPage {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        Self {
            view: Arc::new(ChatView {
                ctx,
                conversations: ListView::new(
                    CONVERSATIONS_LIST,
                    "No conversations yet",
                    "Failed to load conversations",
                ),
                inner: Mutex::new(ChatInner {
                    state: ChatState::Idle,
                    conversations: Vec::new(),
                    poller: None,
                }),
            }),
        }
    }

    /// Loads the conversation list, opens the deep-linked chat if there is
    /// one, then starts polling.
    pub async fn start(ctx: Arc<PageContext>, deep_link: Option<UserId>) -> Self {
        let mut page = Self::new(ctx);
        if page.view.load_conversations().await.is_redirected() {
            return page;
        }
        if let Some(peer) = deep_link {
            if page.view.open_chat(peer).await.is_redirected() {
                return page;
            }
        }
        page.start_polling();
        page
    }

    pub fn start_polling(&mut self) {
        if self.view.is_closed() {
            return;
        }
        let period = self.view.ctx.config.poll_interval;
        let weak: Weak<ChatView> = Arc::downgrade(&self.view);
        let handle = PollHandle::start(period, move || {
            let weak = weak.clone();
            async move {
                if let Some(view) = weak.upgrade() {
                    view.refresh().await;
                }
            }
        });
        self.view.lock().poller = Some(handle);
        tracing::info!(
            component = "messages",
            period_ms = period.as_millis() as u64,
            "polling started"
        );
    }

    pub fn state(&self) -> ChatState {
        self.view.state()
    }

    pub fn is_polling(&self) -> bool {
        self.view.is_polling()
    }

    pub async fn open_chat(&self, peer: UserId) -> RenderOutcome {
        self.view.open_chat(peer).await
    }

    pub async fn send(&self) -> SendOutcome {
        self.view.send().await
    }

    pub async fn refresh(&self) {
        self.view.refresh().await
    }

    pub fn close(&mut self) {
        self.view.close();
    }
}

impl Drop for MessagesPage {
    fn drop(&mut self) {
        self.close();
    }
}
