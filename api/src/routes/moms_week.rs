use actix_web::{HttpRequest, HttpResponse, get, post, put, web};
use payloads::{UserId, WeeklySummary, WeeklySummaryId};

use crate::Config;
use crate::store::{self, Store};
use crate::time::TimeSource;

use super::{
    APIError, PageQuery, created, ok, paginated, parse_path_date,
    require_owner,
};

/// "Today" is decided by the backend's configured time zone.
#[tracing::instrument(skip(request, store, time_source, config), fields(user_id=tracing::field::Empty))]
#[get("/moms-week/{owner_id}/current-week")]
pub async fn current_week(
    request: HttpRequest,
    path: web::Path<UserId>,
    store: web::Data<Store>,
    time_source: web::Data<TimeSource>,
    config: web::Data<Config>,
) -> Result<HttpResponse, APIError> {
    let user = require_owner(&request, &store, &path)?;
    let today = time_source.today(&config.timezone);
    Ok(ok(store::moms_week::week_overview(&store, &user.id, today)?))
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty))]
#[get("/moms-week/{owner_id}/week/{fecha}")]
pub async fn week_of(
    request: HttpRequest,
    path: web::Path<(UserId, String)>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let (owner_id, fecha) = path.into_inner();
    let user = require_owner(&request, &store, &owner_id)?;
    let fecha = parse_path_date(&fecha)?;
    Ok(ok(store::moms_week::week_overview(&store, &user.id, fecha)?))
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty))]
#[get("/moms-week/{owner_id}/summaries")]
pub async fn list_summaries(
    request: HttpRequest,
    path: web::Path<UserId>,
    query: web::Query<PageQuery>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let user = require_owner(&request, &store, &path)?;
    Ok(paginated(store::moms_week::list_summaries(
        &store,
        &user.id,
        query.page_request(),
    )))
}

#[tracing::instrument(skip(request, store, summary), fields(user_id=tracing::field::Empty), ret)]
#[post("/moms-week/{owner_id}/summaries")]
pub async fn create_summary(
    request: HttpRequest,
    path: web::Path<UserId>,
    summary: web::Json<WeeklySummary>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let user = require_owner(&request, &store, &path)?;
    Ok(created(store::moms_week::create_summary(
        &store,
        &user.id,
        summary.into_inner(),
    )?))
}

#[tracing::instrument(skip(request, store, summary), fields(user_id=tracing::field::Empty), ret)]
#[put("/moms-week/{owner_id}/summaries/{summary_id}")]
pub async fn update_summary(
    request: HttpRequest,
    path: web::Path<(UserId, WeeklySummaryId)>,
    summary: web::Json<WeeklySummary>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let (owner_id, summary_id) = path.into_inner();
    let user = require_owner(&request, &store, &owner_id)?;
    Ok(ok(store::moms_week::update_summary(
        &store,
        &user.id,
        &summary_id,
        summary.into_inner(),
    )?))
}
