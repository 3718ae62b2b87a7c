use actix_web::{HttpRequest, HttpResponse, get, post, web};
use payloads::{Role, Session};

use crate::password::{
    AuthError, Credentials, NewUserDetails, create_user, validate_credentials,
};
use crate::store::{self, Store};
use crate::time::TimeSource;

use super::{APIError, bearer_token, created, get_user, ok};

fn session_for(store: &Store, user: store::User) -> Result<Session, APIError> {
    let token = store::users::issue_token(store, &user.id)?;
    Ok(Session {
        token,
        user: user.into(),
    })
}

#[tracing::instrument(
    skip(new_user_details, store, time_source),
    fields(user_id=tracing::field::Empty),
    ret,
)]
#[post("/auth/register")]
pub async fn register(
    new_user_details: web::Json<NewUserDetails>,
    store: web::Data<Store>,
    time_source: web::Data<TimeSource>,
) -> Result<HttpResponse, APIError> {
    let user =
        create_user(new_user_details.0, Role::User, &store, &time_source).await?;
    tracing::Span::current().record("user_id", tracing::field::display(&user.id));
    Ok(created(session_for(&store, user)?))
}

#[tracing::instrument(
    skip(credentials, store),
    fields(email=tracing::field::Empty, user_id=tracing::field::Empty),
    ret,
)]
#[post("/auth/login")]
pub async fn login(
    credentials: web::Json<Credentials>,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    tracing::Span::current()
        .record("email", tracing::field::display(&credentials.email));
    match validate_credentials(credentials.0, &store).await {
        Ok(user) => {
            tracing::Span::current()
                .record("user_id", tracing::field::display(&user.id));
            Ok(ok(session_for(&store, user)?))
        }
        Err(e) => {
            let e = match e {
                AuthError::InvalidCredentials(_) => {
                    APIError::AuthError(anyhow::anyhow!("Invalid email or password"))
                }
                AuthError::UnexpectedError(_) => {
                    APIError::UnexpectedError(e.into())
                }
            };
            Err(e)
        }
    }
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty))]
#[post("/auth/logout")]
pub async fn logout(
    request: HttpRequest,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let _ = get_user(&request, &store)?;
    store::users::revoke_token(&store, bearer_token(&request)?);
    Ok(ok(()))
}

#[tracing::instrument(skip(request, store), fields(user_id=tracing::field::Empty))]
#[get("/auth/me")]
pub async fn me(
    request: HttpRequest,
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let user = get_user(&request, &store)?;
    Ok(ok(payloads::responses::User::from(user)))
}
