use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use payloads::requests::{EventFilters, non_blank};
use payloads::{CalendarEvent, EventId};
use serde::Deserialize;

use crate::store::{self, Store};

use super::{
    APIError, created, get_user, ok, page_request, paginated, parse_path_date,
};

#[derive(Debug, Deserialize)]
pub struct EventQuery {
    fecha_inicio: Option<String>,
    fecha_fin: Option<String>,
    tipo_evento: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

impl EventQuery {
    fn filters(&self) -> Result<EventFilters, APIError> {
        let date = |raw: &Option<String>| {
            raw.as_deref()
                .filter(|raw| !raw.trim().is_empty())
                .map(parse_path_date)
                .transpose()
        };
        Ok(EventFilters {
            fecha_inicio: date(&self.fecha_inicio)?,
            fecha_fin: date(&self.fecha_fin)?,
            tipo_evento: non_blank(self.tipo_evento.clone()),
        })
    }
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty))]
#[get("/calendar/events")]
pub async fn list_events(
    request: HttpRequest,
    query: web::Query<EventQuery>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let user = get_user(&request, &store)?;
    let filters = query.filters()?;
    Ok(paginated(store::calendar::list_events(
        &store,
        &user.id,
        &filters,
        page_request(query.page, query.limit),
    )))
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty))]
#[get("/calendar/events/{event_id}")]
pub async fn get_event(
    request: HttpRequest,
    path: web::Path<EventId>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let user = get_user(&request, &store)?;
    Ok(ok(store::calendar::read_event(&store, &user.id, &path)?))
}

#[tracing::instrument(skip(request, store, event), fields(user_id=tracing::field::Empty), ret)]
#[post("/calendar/events")]
pub async fn create_event(
    request: HttpRequest,
    event: web::Json<CalendarEvent>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let user = get_user(&request, &store)?;
    Ok(created(store::calendar::create_event(
        &store,
        &user.id,
        event.into_inner(),
    )?))
}

#[tracing::instrument(skip(request, store, event), fields(user_id=tracing::field::Empty), ret)]
#[put("/calendar/events/{event_id}")]
pub async fn update_event(
    request: HttpRequest,
    path: web::Path<EventId>,
    event: web::Json<CalendarEvent>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let user = get_user(&request, &store)?;
    Ok(ok(store::calendar::update_event(
        &store,
        &user.id,
        &path,
        event.into_inner(),
    )?))
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty), ret)]
#[delete("/calendar/events/{event_id}")]
pub async fn delete_event(
    request: HttpRequest,
    path: web::Path<EventId>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let user = get_user(&request, &store)?;
    store::calendar::delete_event(&store, &user.id, &path)?;
    Ok(ok(()))
}
