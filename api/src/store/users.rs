use payloads::{Role, UserId};
use uuid::Uuid;

use super::*;
use crate::time::TimeSource;

/// Create a new user as would happen during signup.
pub fn create_user(
    store: &Store,
    nombre: &str,
    email: &str,
    password_hash: &str,
    rol: Role,
    time_source: &TimeSource,
) -> Result<User, StoreError> {
    required(nombre, "nombre")?;
    let email = email.trim();
    if !email.contains('@') {
        return Err(StoreError::Invalid("A valid email is required".into()));
    }
    required(email, "email")?;

    let mut tables = store.tables();
    if tables
        .users
        .values()
        .any(|user| user.email.eq_ignore_ascii_case(email))
    {
        return Err(StoreError::EmailTaken);
    }
    let user = User {
        id: UserId(Uuid::new_v4()),
        nombre: nombre.trim().to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        rol,
        created_at: time_source.now(),
    };
    tables.users.insert(user.id, user.clone());
    Ok(user)
}

pub fn read_user(store: &Store, id: &UserId) -> Result<User, StoreError> {
    store
        .tables()
        .users
        .get(id)
        .cloned()
        .ok_or(StoreError::UserNotFound)
}

pub fn user_by_email(store: &Store, email: &str) -> Option<User> {
    let email = email.trim();
    store
        .tables()
        .users
        .values()
        .find(|user| user.email.eq_ignore_ascii_case(email))
        .cloned()
}

/// Issue an opaque bearer token for the user.
pub fn issue_token(store: &Store, user_id: &UserId) -> Result<String, StoreError> {
    let mut tables = store.tables();
    if !tables.users.contains_key(user_id) {
        return Err(StoreError::UserNotFound);
    }
    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    tables.tokens.insert(token.clone(), *user_id);
    Ok(token)
}

/// The user a bearer token belongs to.
pub fn user_for_token(store: &Store, token: &str) -> Result<User, StoreError> {
    let tables = store.tables();
    let user_id = tables.tokens.get(token).ok_or(StoreError::TokenNotFound)?;
    tables
        .users
        .get(user_id)
        .cloned()
        .ok_or(StoreError::UserNotFound)
}

pub fn revoke_token(store: &Store, token: &str) {
    store.tables().tokens.remove(token);
}
