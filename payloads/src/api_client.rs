use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::session::{SessionContext, SessionError};

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for interfacing with the backend.
#[derive(Debug, Clone)]
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
    pub session: SessionContext,
}

/// Whether a request carries the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Required,
    None,
}

/// A uniqueness violation reported by the backend. The id of the record
/// already occupying the slot is included when the backend knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub message: String,
    pub existing_id: Option<Uuid>,
}

/// Outcome of a request that reached the backend and was not rejected.
/// A 409 is data, not an error, so callers can reconcile.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Ok(T),
    Conflict(Conflict),
}

impl<T> Reply<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Self::Ok(value) => Reply::Ok(f(value)),
            Self::Conflict(conflict) => Reply::Conflict(conflict),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// For call sites where a conflict isn't an expected outcome.
    pub fn into_result(self) -> Result<T, ClientError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Conflict(conflict) => {
                Err(ClientError::UnexpectedConflict(conflict.message))
            }
        }
    }
}

/// Helper methods for http actions
impl APIClient {
    pub fn new(address: impl Into<String>, session: SessionContext) -> Self {
        Self {
            address: address.into(),
            inner_client: reqwest::Client::new(),
            session,
        }
    }

    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    /// Send one request and classify the response.
    ///
    /// The bearer token is attached when `auth` is [`Auth::Required`] and a
    /// session exists; without a session the request goes out anonymously
    /// and the backend decides.
    pub async fn request<T, B, Q>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&Q>,
        auth: Auth,
    ) -> Result<Reply<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let mut request =
            self.inner_client.request(method.clone(), self.format_url(path));
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if auth == Auth::Required
            && let Some(token) = self.session.token()
        {
            request = request.bearer_auth(token);
        }

        tracing::debug!(%method, path, "sending request");
        let response: ReqwestResult = request.send().await;
        let response = response.map_err(ClientError::from_transport)?;
        self.classify(response).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: Auth,
    ) -> Result<Reply<T>, ClientError> {
        self.request(Method::GET, path, None::<&()>, None::<&()>, auth)
            .await
    }

    pub(crate) async fn get_with_query<T, Q>(
        &self,
        path: &str,
        query: &Q,
        auth: Auth,
    ) -> Result<Reply<T>, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request(Method::GET, path, None::<&()>, Some(query), auth)
            .await
    }

    pub(crate) async fn post<T, B>(
        &self,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<Reply<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body), None::<&()>, auth)
            .await
    }

    pub(crate) async fn put<T, B>(
        &self,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<Reply<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body), None::<&()>, auth)
            .await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: Auth,
    ) -> Result<Reply<T>, ClientError> {
        self.request(Method::DELETE, path, None::<&()>, None::<&()>, auth)
            .await
    }

    async fn classify<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Reply<T>, ClientError> {
        let status = response.status();
        if status.is_success() {
            let body = response.json::<T>().await.map_err(|e| {
                if e.is_decode() {
                    ClientError::Decode(e)
                } else {
                    ClientError::from_transport(e)
                }
            })?;
            return Ok(Reply::Ok(body));
        }

        let text = response
            .text()
            .await
            .map_err(ClientError::from_transport)?;
        if status == StatusCode::CONFLICT {
            return Ok(Reply::Conflict(parse_conflict(&text)));
        }
        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!("received 401, clearing stored session");
            if let Err(e) = self.session.clear() {
                tracing::warn!("Failed to clear session after 401: {e}");
            }
        }
        Err(ClientError::from_status(status, server_message(&text)))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    SessionExpired(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Server(String),
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    /// A 409 surfaced at a call site that has no reconciliation path.
    #[error("{0}")]
    UnexpectedConflict(String),
    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),
    #[error("The server took too long to respond.")]
    Timeout(#[source] reqwest::Error),
    #[error("Unexpected response from the server.")]
    Decode(#[source] reqwest::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e)
        } else {
            Self::Network(e)
        }
    }

    fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message =
            message.unwrap_or_else(|| fallback_message(status).to_string());
        match status {
            StatusCode::BAD_REQUEST => Self::InvalidRequest(message),
            StatusCode::UNAUTHORIZED => Self::SessionExpired(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::INTERNAL_SERVER_ERROR => Self::Server(message),
            _ => Self::APIError(status, message),
        }
    }

    /// The HTTP status the error was derived from, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::InvalidRequest(_) => Some(StatusCode::BAD_REQUEST),
            Self::SessionExpired(_) => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden(_) => Some(StatusCode::FORBIDDEN),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::Server(_) => Some(StatusCode::INTERNAL_SERVER_ERROR),
            Self::APIError(status, _) => Some(*status),
            Self::UnexpectedConflict(_) => Some(StatusCode::CONFLICT),
            Self::Network(_)
            | Self::Timeout(_)
            | Self::Decode(_)
            | Self::Session(_) => None,
        }
    }
}

pub fn fallback_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Invalid request.",
        StatusCode::UNAUTHORIZED => "Session expired. Please log in again.",
        StatusCode::FORBIDDEN => "You don't have permission to do that.",
        StatusCode::NOT_FOUND => "The requested resource was not found.",
        StatusCode::CONFLICT => "The record already exists.",
        StatusCode::INTERNAL_SERVER_ERROR => {
            "Server error. Please try again later."
        }
        _ => "Request failed.",
    }
}

/// Pull the human-readable message out of an error body: the JSON
/// `message` or `error` field, else the raw text.
fn server_message(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(serde_json::Value::Object(body)) =
        serde_json::from_str::<serde_json::Value>(text)
    {
        return ["message", "error"]
            .iter()
            .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
            .filter(|message| !message.trim().is_empty())
            .map(str::to_string);
    }
    Some(text.to_string())
}

/// The existing record's id may be reported at the top level or nested
/// under `data`, depending on the endpoint.
fn parse_conflict(text: &str) -> Conflict {
    let body = serde_json::from_str::<serde_json::Value>(text)
        .unwrap_or(serde_json::Value::Null);
    let existing_id = [
        &body["existing_id"],
        &body["existingId"],
        &body["data"]["id"],
    ]
    .into_iter()
    .find_map(|value| value.as_str().and_then(|id| id.parse().ok()));
    Conflict {
        message: server_message(text).unwrap_or_else(|| {
            fallback_message(StatusCode::CONFLICT).to_string()
        }),
        existing_id,
    }
}
