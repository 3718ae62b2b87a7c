use actix_web::{HttpResponse, get, web};

use crate::store::{self, Store};

use super::{APIError, ok};

/// Public informational content about the FAFORE program.
#[tracing::instrument(skip(store))]
#[get("/fafore")]
pub async fn list_sections(
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    Ok(ok(store::fafore::list_sections(&store)))
}
