pub mod activities;
pub mod auth;
pub mod chat;
pub mod friends;
pub mod posts;
pub mod users;

use std::time::Instant;

use campus_proto::ApiEnvelope;
use reqwest::{multipart::Form, Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{AppError, AppResult};
use crate::observability;
use crate::protocol::{self, HEADER_REQUEST_ID, HEADER_TRACE_ID};

/// Decoded success envelope.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub count: Option<u64>,
    pub message: Option<String>,
    pub extra: Map<String, Value>,
}

/// Response of a mutation endpoint, where only the success flag matters.
pub type Ack = ApiResponse<Value>;

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> AppResult<T> {
        self.data
            .ok_or_else(|| AppError::protocol("Response is missing its data payload"))
    }

    /// Typed view of a top-level key outside the common envelope fields.
    pub fn extra_field<U: DeserializeOwned>(&self, key: &str) -> AppResult<Option<U>> {
        match self.extra.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
        }
    }
}

/// HTTP client for the campus API. The session rides on the cookie store.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    login_path: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            AppError::internal("Failed to create HTTP client").with_details(e.to_string())
        })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            login_path: config.login_path.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> AppResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// `collection` plus `id` as one percent-encoded path segment. Slashes,
    /// `?` and `#` inside `id` stay part of the segment.
    pub fn item_path(&self, collection: &str, id: &str) -> AppResult<String> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(AppError::validation("Invalid id").with_details(format!("{id:?}")));
        }
        let mut url = self.endpoint(collection)?;
        url.path_segments_mut()
            .map_err(|_| AppError::internal("API base URL cannot hold a path"))?
            .pop_if_empty()
            .push(id);
        Ok(url.path().to_string())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<ApiResponse<T>> {
        let request = self.request(Method::GET, path)?;
        self.dispatch(Method::GET, path, request).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> AppResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path)?.query(query);
        self.dispatch(Method::GET, path, request).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path)?.json(body);
        self.dispatch(Method::POST, path, request).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> AppResult<ApiResponse<T>> {
        let request = self.request(Method::POST, path)?;
        self.dispatch(Method::POST, path, request).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> AppResult<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path)?.json(body);
        self.dispatch(Method::PUT, path, request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> AppResult<ApiResponse<T>> {
        let request = self.request(Method::DELETE, path)?;
        self.dispatch(Method::DELETE, path, request).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> AppResult<ApiResponse<T>> {
        let request = self.request(Method::POST, path)?.multipart(form);
        self.dispatch(Method::POST, path, request).await
    }

    fn request(&self, method: Method, path: &str) -> AppResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        Ok(self
            .client
            .request(method, url)
            .header(HEADER_TRACE_ID, observability::trace_id())
            .header(HEADER_REQUEST_ID, observability::request_id()))
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> AppResult<ApiResponse<T>> {
        let started = Instant::now();

        let res = request.send().await.map_err(|e| {
            tracing::warn!(
                component = "api",
                method = %method,
                path,
                error = %e,
                "request failed before a response arrived"
            );
            AppError::from(e)
        })?;

        let status = res.status();
        let landed_on_login = res.url().path() == self.login_path;
        let body = res.text().await?;

        tracing::debug!(
            component = "api",
            method = %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "api response"
        );

        decode_response(status, landed_on_login, &body).map_err(|err| {
            tracing::warn!(
                component = "api",
                method = %method,
                path,
                code = ?err.code,
                status = status.as_u16(),
                message = %err.message,
                "api call did not succeed"
            );
            err
        })
    }
}

/// Maps a raw HTTP answer onto the envelope contract. Session checks come
/// first, then HTML sniffing, then JSON parsing, then status and success flag.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    landed_on_login: bool,
    body: &str,
) -> AppResult<ApiResponse<T>> {
    if status == StatusCode::UNAUTHORIZED || landed_on_login {
        return Err(AppError::session("Session expired, please log in again")
            .with_status(StatusCode::UNAUTHORIZED.as_u16()));
    }

    if protocol::looks_like_html(body) {
        return Err(
            AppError::protocol("Server returned an HTML page instead of JSON")
                .with_status(status.as_u16())
                .with_details(protocol::body_excerpt(body)),
        );
    }

    let envelope: ApiEnvelope<Value> = serde_json::from_str(body).map_err(|e| {
        AppError::protocol("Invalid JSON payload")
            .with_status(status.as_u16())
            .with_details(format!("{e}; body: {}", protocol::body_excerpt(body)))
    })?;

    let reason = envelope
        .reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

    if status == StatusCode::CONFLICT || !status.is_success() || !envelope.success {
        return Err(AppError::from_status(status, reason));
    }

    let data = match envelope.data {
        None | Some(Value::Null) => None,
        Some(value) => Some(serde_json::from_value(value)?),
    };

    Ok(ApiResponse {
        data,
        count: envelope.count,
        message: envelope.message,
        extra: envelope.extra,
    })
}
