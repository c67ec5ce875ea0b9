use reqwest::StatusCode;
use serde::Serialize;

/// What went wrong, from the page's point of view. Each kind has exactly one
/// handling path: session errors leave for the login page, conflicts become an
/// advisory, everything else is an error notice or an error block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppErrorCode {
    /// 401, or a redirect that landed on the login page.
    Session,
    Network,
    /// HTML or malformed JSON where an envelope was expected.
    Protocol,
    /// Rejected locally; no request was made.
    Validation,
    Conflict,
    /// Non-2xx status or `success: false`.
    Server,
    Internal,
}

impl AppErrorCode {
    /// Classification of a failed HTTP status.
    pub fn for_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => AppErrorCode::Session,
            StatusCode::CONFLICT => AppErrorCode::Conflict,
            _ => AppErrorCode::Server,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppError {
    pub code: AppErrorCode,
    /// Text fit for a notice.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(code: AppErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            details: None,
            trace_id: Some(crate::observability::trace_id().to_string()),
        }
    }

    /// Error for a response whose status or envelope said no.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::for_status(status), message).with_status(status.as_u16())
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn session(message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Session, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Network, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Protocol, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Validation, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Server, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Internal, message)
    }

    pub fn is_session(&self) -> bool {
        self.code == AppErrorCode::Session
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        let message = if value.is_timeout() {
            "The server took too long to answer"
        } else if value.is_connect() {
            "Could not reach the campus server"
        } else if value.is_decode() || value.is_body() {
            "The server response could not be read"
        } else {
            "Network request failed"
        };
        AppError::network(message).with_details(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::protocol("Unexpected data from the server").with_details(value.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(value: url::ParseError) -> Self {
        AppError::validation("Invalid URL").with_details(value.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(value: validator::ValidationErrors) -> Self {
        AppError::validation(crate::validation::first_message(&value))
            .with_details(value.to_string())
    }
}
