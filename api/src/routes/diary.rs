use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use payloads::requests::DiaryFilters;
use payloads::{DiaryEntry, DiaryEntryId, UserId};
use serde::Deserialize;

use crate::store::{self, Store};
use crate::time::TimeSource;

use super::{
    APIError, created, ok, page_request, paginated, parse_path_date,
    require_owner,
};

#[derive(Debug, Deserialize)]
pub struct EntryQuery {
    month: Option<i8>,
    year: Option<i16>,
    page: Option<u32>,
    limit: Option<u32>,
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty))]
#[get("/diary/{owner_id}/entries")]
pub async fn list_entries(
    request: HttpRequest,
    path: web::Path<UserId>,
    query: web::Query<EntryQuery>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let user = require_owner(&request, &store, &path)?;
    if query.month.is_some_and(|month| !(1..=12).contains(&month)) {
        return Err(APIError::BadRequest(anyhow::anyhow!(
            "month must be between 1 and 12"
        )));
    }
    let filters = DiaryFilters {
        month: query.month,
        year: query.year,
    };
    Ok(paginated(store::diary::list_entries(
        &store,
        &user.id,
        &filters,
        page_request(query.page, query.limit),
    )))
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty))]
#[get("/diary/{owner_id}/entries/date/{fecha}")]
pub async fn entry_by_date(
    request: HttpRequest,
    path: web::Path<(UserId, String)>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let (owner_id, fecha) = path.into_inner();
    let user = require_owner(&request, &store, &owner_id)?;
    let fecha = parse_path_date(&fecha)?;
    Ok(ok(store::diary::entry_by_date(&store, &user.id, fecha)?))
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty))]
#[get("/diary/{owner_id}/entries/{entry_id}")]
pub async fn get_entry(
    request: HttpRequest,
    path: web::Path<(UserId, DiaryEntryId)>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let (owner_id, entry_id) = path.into_inner();
    let user = require_owner(&request, &store, &owner_id)?;
    Ok(ok(store::diary::read_entry(&store, &user.id, &entry_id)?))
}

#[tracing::instrument(
    skip(request, store, entry, time_source),
    fields(user_id=tracing::field::Empty, fecha=%entry.fecha),
    ret,
)]
#[post("/diary/{owner_id}/entries")]
pub async fn create_entry(
    request: HttpRequest,
    path: web::Path<UserId>,
    entry: web::Json<DiaryEntry>,
    store: web::Data<Store>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user = require_owner(&request, &store, &path)?;
    Ok(created(store::diary::create_entry(
        &store,
        &user.id,
        entry.into_inner(),
        &time_source,
    )?))
}

#[tracing::instrument(
    skip(request, store, entry, time_source),
    fields(user_id=tracing::field::Empty),
    ret,
)]
#[put("/diary/{owner_id}/entries/{entry_id}")]
pub async fn update_entry(
    request: HttpRequest,
    path: web::Path<(UserId, DiaryEntryId)>,
    entry: web::Json<DiaryEntry>,
    store: web::Data<Store>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let (owner_id, entry_id) = path.into_inner();
    let user = require_owner(&request, &store, &owner_id)?;
    Ok(ok(store::diary::update_entry(
        &store,
        &user.id,
        &entry_id,
        entry.into_inner(),
        &time_source,
    )?))
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty), ret)]
#[delete("/diary/{owner_id}/entries/{entry_id}")]
pub async fn delete_entry(
    request: HttpRequest,
    path: web::Path<(UserId, DiaryEntryId)>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let (owner_id, entry_id) = path.into_inner();
    let user = require_owner(&request, &store, &owner_id)?;
    store::diary::delete_entry(&store, &user.id, &entry_id)?;
    Ok(ok(()))
}
