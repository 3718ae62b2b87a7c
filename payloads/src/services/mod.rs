//! One module per backend resource. Each method maps a single domain
//! operation onto one HTTP call and unwraps the response envelope; errors
//! are passed through untouched.

mod admin;
mod auth;
mod books;
mod calendar;
mod diary;
mod directories;
mod fafore;
mod moms_week;

use crate::api_client::{ClientError, Reply};
use crate::responses::{Envelope, Page};

/// Unwrap the `data` of an envelope where a conflict isn't expected.
fn data<T>(reply: Reply<Envelope<T>>) -> Result<T, ClientError> {
    Ok(reply.into_result()?.data)
}

fn page<T>(reply: Reply<Envelope<Vec<T>>>) -> Result<Page<T>, ClientError> {
    Ok(Page::from_envelope(reply.into_result()?))
}
