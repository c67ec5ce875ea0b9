use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response shape shared by every endpoint: `{success, data?, error?, count?}`.
///
/// Keys outside the common set (the message thread's `target_user`, for
/// example) are kept in `extra` instead of being dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub count: Option<u64>,
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> ApiEnvelope<T> {
    /// Human readable failure reason, preferring `error` over `message`.
    pub fn reason(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}
