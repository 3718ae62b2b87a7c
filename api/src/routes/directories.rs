use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use payloads::requests::{DirectoryFilters, non_blank};
use payloads::{Directory, DirectoryId};
use serde::Deserialize;

use crate::store::{self, Store};

use super::{APIError, created, ok, page_request, paginated, require_admin};

#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    search: Option<String>,
    categoria: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

#[tracing::instrument(skip(store))]
#[get("/directories")]
pub async fn list_directories(
    query: web::Query<DirectoryQuery>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let DirectoryQuery {
        search,
        categoria,
        page,
        limit,
    } = query.into_inner();
    let filters = DirectoryFilters {
        search: non_blank(search),
        categoria: non_blank(categoria),
    };
    Ok(paginated(store::directories::list_directories(
        &store,
        &filters,
        page_request(page, limit),
    )))
}

#[tracing::instrument(skip(store))]
#[get("/directories/categories")]
pub async fn directory_categories(
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    Ok(ok(store::directories::directory_categories(&store)))
}

#[tracing::instrument(skip(store))]
#[get("/directories/{directory_id}")]
pub async fn get_directory(
    path: web::Path<DirectoryId>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    Ok(ok(store::directories::read_directory(&store, &path)?))
}

#[tracing::instrument(skip(request, store, directory), fields(user_id=tracing::field::Empty), ret)]
#[post("/directories")]
pub async fn create_directory(
    request: HttpRequest,
    directory: web::Json<Directory>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &store)?;
    Ok(created(store::directories::create_directory(&store, directory.into_inner())?))
}

#[tracing::instrument(skip(request, store, directory), fields(user_id=tracing::field::Empty), ret)]
#[put("/directories/{directory_id}")]
pub async fn update_directory(
    request: HttpRequest,
    path: web::Path<DirectoryId>,
    directory: web::Json<Directory>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &store)?;
    Ok(ok(store::directories::update_directory(&store, &path, directory.into_inner())?))
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty), ret)]
#[delete("/directories/{directory_id}")]
pub async fn delete_directory(
    request: HttpRequest,
    path: web::Path<DirectoryId>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &store)?;
    store::directories::delete_directory(&store, &path)?;
    Ok(ok(()))
}
