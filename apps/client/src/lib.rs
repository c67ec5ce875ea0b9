pub mod action;
pub mod api;
pub mod config;
pub mod error;
pub mod observability;
pub mod pages;
pub mod poll;
pub mod protocol;
pub mod session;
pub mod validation;
pub mod view;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{AppError, AppErrorCode, AppResult};
pub use session::{PageContext, PageSession, SessionOutcome};
