use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use payloads::requests::{BookFilters, non_blank};
use payloads::{Book, BookId};
use serde::Deserialize;

use crate::store::{self, Store};

use super::{APIError, created, ok, page_request, paginated, require_admin};

#[derive(Debug, Deserialize)]
pub struct BookQuery {
    search: Option<String>,
    categoria: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

#[tracing::instrument(skip(store))]
#[get("/books")]
pub async fn list_books(
    query: web::Query<BookQuery>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let BookQuery {
        search,
        categoria,
        page,
        limit,
    } = query.into_inner();
    let filters = BookFilters {
        search: non_blank(search),
        categoria: non_blank(categoria),
    };
    Ok(paginated(store::books::list_books(
        &store,
        &filters,
        page_request(page, limit),
    )))
}

#[tracing::instrument(skip(store))]
#[get("/books/categories")]
pub async fn book_categories(
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    Ok(ok(store::books::book_categories(&store)))
}

#[tracing::instrument(skip(store))]
#[get("/books/{book_id}")]
pub async fn get_book(
    path: web::Path<BookId>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    Ok(ok(store::books::read_book(&store, &path)?))
}

#[tracing::instrument(skip(request, store, book), fields(user_id=tracing::field::Empty), ret)]
#[post("/books")]
pub async fn create_book(
    request: HttpRequest,
    book: web::Json<Book>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &store)?;
    Ok(created(store::books::create_book(&store, book.into_inner())?))
}

#[tracing::instrument(skip(request, store, book), fields(user_id=tracing::field::Empty), ret)]
#[put("/books/{book_id}")]
pub async fn update_book(
    request: HttpRequest,
    path: web::Path<BookId>,
    book: web::Json<Book>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &store)?;
    Ok(ok(store::books::update_book(&store, &path, book.into_inner())?))
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty), ret)]
#[delete("/books/{book_id}")]
pub async fn delete_book(
    request: HttpRequest,
    path: web::Path<BookId>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &store)?;
    store::books::delete_book(&store, &path)?;
    Ok(ok(()))
}
