use actix_web::{HttpRequest, HttpResponse, get, web};

use crate::store::{self, Store};

use super::{APIError, ok, require_admin};

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty))]
#[get("/admin/stats")]
pub async fn admin_stats(
    request: HttpRequest,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    require_admin(&request, &store)?;
    Ok(ok(store::admin_stats(&store)))
}
