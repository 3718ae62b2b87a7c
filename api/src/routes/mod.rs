pub mod admin;
pub mod auth;
pub mod books;
pub mod calendar;
pub mod diary;
pub mod directories;
pub mod fafore;
pub mod moms_week;

use actix_web::http::header;
use actix_web::{
    HttpRequest, HttpResponse, ResponseError, body::BoxBody,
    dev::HttpServiceFactory, get, http::StatusCode, web,
};
use payloads::requests::PageRequest;
use payloads::responses::{Envelope, ErrorBody, Pagination};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{self, Store, StoreError};

pub fn api_services() -> impl HttpServiceFactory {
    web::scope("/api")
        .service(health_check)
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        // category routes must come before the `{id}` routes
        .service(books::book_categories)
        .service(books::list_books)
        .service(books::get_book)
        .service(books::create_book)
        .service(books::update_book)
        .service(books::delete_book)
        .service(directories::directory_categories)
        .service(directories::list_directories)
        .service(directories::get_directory)
        .service(directories::create_directory)
        .service(directories::update_directory)
        .service(directories::delete_directory)
        .service(calendar::list_events)
        .service(calendar::get_event)
        .service(calendar::create_event)
        .service(calendar::update_event)
        .service(calendar::delete_event)
        .service(diary::entry_by_date)
        .service(diary::list_entries)
        .service(diary::get_entry)
        .service(diary::create_entry)
        .service(diary::update_entry)
        .service(diary::delete_entry)
        .service(moms_week::current_week)
        .service(moms_week::week_of)
        .service(moms_week::list_summaries)
        .service(moms_week::create_summary)
        .service(moms_week::update_summary)
        .service(admin::admin_stats)
        .service(fafore::list_sections)
}

#[get("/health_check")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(Envelope::new("healthy"))
}

/// Malformed JSON bodies get the same error body as every other 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|e, _| {
        APIError::BadRequest(anyhow::anyhow!("Invalid request body: {e}"))
            .into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|e, _| {
        APIError::BadRequest(anyhow::anyhow!("Invalid query: {e}")).into()
    })
}

#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("Authentication failed")]
    AuthError(#[source] anyhow::Error),
    #[error("Forbidden")]
    Forbidden(#[source] anyhow::Error),
    #[error("Bad request")]
    BadRequest(#[source] anyhow::Error),
    #[error("Not found")]
    NotFound(#[source] anyhow::Error),
    #[error("{message}")]
    Conflict {
        message: String,
        existing_id: Option<Uuid>,
    },
    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl APIError {
    /// The message sent to the client. Internal errors stay in the logs.
    fn client_message(&self) -> String {
        match self {
            Self::AuthError(e)
            | Self::Forbidden(e)
            | Self::BadRequest(e)
            | Self::NotFound(e) => e.to_string(),
            Self::Conflict { message, .. } => message.clone(),
            Self::UnexpectedError(_) => self.to_string(),
        }
    }
}

impl ResponseError for APIError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthError(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        if let Self::UnexpectedError(e) = self {
            tracing::error!("Unexpected error: {e:?}");
        }
        let existing_id = match self {
            Self::Conflict { existing_id, .. } => *existing_id,
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            message: self.client_message(),
            existing_id,
        })
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::TokenNotFound => APIError::AuthError(e.into()),
            StoreError::UserNotFound
            | StoreError::BookNotFound
            | StoreError::DirectoryNotFound
            | StoreError::EventNotFound
            | StoreError::DiaryEntryNotFound
            | StoreError::WeeklySummaryNotFound => APIError::NotFound(e.into()),
            StoreError::DuplicateDiaryEntry(_, existing) => APIError::Conflict {
                message: e.to_string(),
                existing_id: Some(existing.0),
            },
            StoreError::DuplicateWeeklySummary(_, existing) => {
                APIError::Conflict {
                    message: e.to_string(),
                    existing_id: Some(existing.0),
                }
            }
            StoreError::EmailTaken => APIError::Conflict {
                message: e.to_string(),
                existing_id: None,
            },
            StoreError::Invalid(_) => APIError::BadRequest(e.into()),
            StoreError::Unexpected(e) => APIError::UnexpectedError(e),
        }
    }
}

/// Wrap `data` in a success envelope.
pub(crate) fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::new(data))
}

pub(crate) fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope::new(data))
}

pub(crate) fn paginated<T: Serialize>(
    (data, pagination): (Vec<T>, Pagination),
) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::paginated(data, pagination))
}

/// Paging parameters for endpoints that take no filters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn page_request(&self) -> PageRequest {
        page_request(self.page, self.limit)
    }
}

/// Filter queries repeat `page` and `limit` as plain fields because the
/// query-string deserializer can't parse numbers inside flattened structs.
pub(crate) fn page_request(page: Option<u32>, limit: Option<u32>) -> PageRequest {
    let default = PageRequest::default();
    PageRequest::new(page.unwrap_or(default.page), limit.unwrap_or(default.limit))
        .normalized()
}

pub(crate) fn bearer_token(request: &HttpRequest) -> Result<&str, APIError> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| APIError::AuthError(anyhow::anyhow!("Token missing")))
}

/// The user the request's bearer token belongs to.
fn get_user(request: &HttpRequest, store: &Store) -> Result<store::User, APIError> {
    let token = bearer_token(request)?;
    let user = store::users::user_for_token(store, token).map_err(|e| match e {
        StoreError::TokenNotFound | StoreError::UserNotFound => {
            APIError::AuthError(anyhow::anyhow!("Invalid or expired token"))
        }
        e => e.into(),
    })?;
    // special case: since this is used in so many routes, the user_id is
    // recorded here, but attaches to the span for the api route itself
    tracing::Span::current().record("user_id", tracing::field::display(&user.id));
    Ok(user)
}

fn require_admin(request: &HttpRequest, store: &Store) -> Result<store::User, APIError> {
    let user = get_user(request, store)?;
    if !user.rol.is_admin() {
        return Err(APIError::Forbidden(anyhow::anyhow!(
            "Administrator access required"
        )));
    }
    Ok(user)
}

/// Authenticate and check that the path's user is the caller.
fn require_owner(
    request: &HttpRequest,
    store: &Store,
    owner: &payloads::UserId,
) -> Result<store::User, APIError> {
    let user = get_user(request, store)?;
    if user.id != *owner {
        return Err(APIError::Forbidden(anyhow::anyhow!(
            "You can only access your own records"
        )));
    }
    Ok(user)
}

fn parse_path_date(raw: &str) -> Result<jiff::civil::Date, APIError> {
    payloads::dates::parse_date(raw).map_err(|e| APIError::BadRequest(e.into()))
}
