use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier,
    Version,
};
use payloads::Role;
use payloads::requests::PASSWORD_MIN_LEN;
use secrecy::{ExposeSecret, SecretBox};

use crate::store::{self, Store, StoreError};
use crate::telemetry::spawn_blocking_with_tracing;
use crate::time::TimeSource;

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

#[derive(serde::Deserialize)]
pub struct Credentials {
    pub email: String,
    password: SecretBox<String>,
}

#[tracing::instrument(name = "Validate credentials", skip(credentials, store))]
pub async fn validate_credentials(
    credentials: Credentials,
    store: &Store,
) -> Result<store::User, AuthError> {
    let mut user = None;
    // fallback password hash to prevent timing differences
    let mut expected_password_hash = SecretBox::new(Box::new(
        "$argon2id$v=19$m=15000,t=2,p=1$\
        gZiV/M1gPc22ElAH/Jh1Hw$\
        CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno"
            .to_string(),
    ));

    if let Some(stored_user) = store::users::user_by_email(store, &credentials.email)
    {
        expected_password_hash =
            SecretBox::new(Box::new(stored_user.password_hash.clone()));
        user = Some(stored_user);
    }

    spawn_blocking_with_tracing(move || {
        verify_password_hash(expected_password_hash, credentials.password)
    })
    .await
    .context("Failed to spawn blocking task.")??;

    user.ok_or_else(|| anyhow::anyhow!("Unknown email."))
        .map_err(AuthError::InvalidCredentials)
}

#[tracing::instrument(
    name = "Verify password hash",
    skip(expected_password_hash, password_candidate)
)]
fn verify_password_hash(
    expected_password_hash: SecretBox<String>,
    password_candidate: SecretBox<String>,
) -> Result<(), AuthError> {
    let expected_password_hash =
        PasswordHash::new(expected_password_hash.expose_secret())
            .context("Failed to parse hash in PHC string format.")?;

    Argon2::default()
        .verify_password(
            password_candidate.expose_secret().as_bytes(),
            &expected_password_hash,
        )
        .context("Invalid password.")
        .map_err(AuthError::InvalidCredentials)
}

#[derive(serde::Deserialize)]
pub struct NewUserDetails {
    pub nombre: String,
    pub email: String,
    password: SecretBox<String>,
}

impl NewUserDetails {
    pub fn new(nombre: &str, email: &str, password: &str) -> Self {
        Self {
            nombre: nombre.to_string(),
            email: email.to_string(),
            password: SecretBox::new(Box::new(password.to_string())),
        }
    }
}

#[tracing::instrument(
    name = "Create user",
    skip(new_user_details, store, time_source),
    fields(email=tracing::field::Empty, user_id=tracing::field::Empty)
)]
pub async fn create_user(
    new_user_details: NewUserDetails,
    rol: Role,
    store: &Store,
    time_source: &TimeSource,
) -> Result<store::User, StoreError> {
    if new_user_details.password.expose_secret().len() < PASSWORD_MIN_LEN {
        return Err(StoreError::Invalid(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    let NewUserDetails {
        nombre,
        email,
        password,
    } = new_user_details;
    let password_hash =
        spawn_blocking_with_tracing(move || compute_password_hash(password))
            .await
            .map_err(anyhow::Error::from)?
            .context("Failed to hash password")?;
    let user = store::users::create_user(
        store,
        &nombre,
        &email,
        password_hash.expose_secret(),
        rol,
        time_source,
    )?;
    tracing::Span::current()
        .record("email", tracing::field::display(&user.email))
        .record("user_id", tracing::field::display(&user.id));
    Ok(user)
}

fn compute_password_hash(
    password: SecretBox<String>,
) -> Result<SecretBox<String>, anyhow::Error> {
    let salt = SaltString::generate(&mut rand_core::OsRng);
    let params = Params::new(15000, 2, 1, None)
        .map_err(|e| anyhow::anyhow!("Invalid argon2 parameters: {e}"))?;
    let password_hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?
        .to_string();
    Ok(SecretBox::new(Box::new(password_hash)))
}
