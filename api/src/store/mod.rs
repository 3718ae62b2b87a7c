//! In-memory repository for the Conectando Corazones API
//!
//! ## Design Decisions
//!
//! ### One lock, many tables
//! - All tables live behind a single mutex. Every store function takes the
//!   lock once, so multi-table checks (uniqueness, ownership) are atomic
//!   without transactions.
//! - The lock is never held across an `.await`; store functions are
//!   synchronous.
//!
//! ### Uniqueness constraints
//! - **Diary entries**: one per user per `fecha`. A violation returns
//!   `StoreError::DuplicateDiaryEntry` carrying the id of the existing entry,
//!   which the routes report as a 409 with `existing_id`.
//! - **Weekly summaries**: one per user per week, keyed by the Monday of the
//!   week (`semana_inicio` is normalized before the check).
//! - **Users**: emails are unique, compared case-insensitively.
//!
//! ### Time Source Dependency
//! - Functions that stamp records or need "today" accept a `TimeSource`
//!   instead of reading the clock, so time can be mocked during tests.
//!
//! ### Ordering
//! - Lists are returned in a stable display order: books by title,
//!   directories by name, events by date then start time, diary entries and
//!   summaries newest first, FAFORE sections by `orden`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use jiff::Timestamp;
use jiff::civil::Date;
use payloads::requests::PageRequest;
use payloads::responses::{self, Pagination};
use payloads::{
    BookId, DiaryEntryId, DirectoryId, EventId, FaforeSectionId, Role, UserId,
    WeeklySummaryId,
};

pub mod books;
pub mod calendar;
pub mod diary;
pub mod directories;
pub mod fafore;
pub mod moms_week;
pub mod users;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("User not found")]
    UserNotFound,
    #[error("Token not found")]
    TokenNotFound,
    #[error("Email is already registered")]
    EmailTaken,
    #[error("Book not found")]
    BookNotFound,
    #[error("Directory entry not found")]
    DirectoryNotFound,
    #[error("Event not found")]
    EventNotFound,
    #[error("Diary entry not found")]
    DiaryEntryNotFound,
    #[error("Weekly summary not found")]
    WeeklySummaryNotFound,
    #[error("An entry already exists for {0}")]
    DuplicateDiaryEntry(Date, DiaryEntryId),
    #[error("A summary already exists for the week of {0}")]
    DuplicateWeeklySummary(Date, WeeklySummaryId),
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// A complete user row that stays in the backend.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub nombre: String,
    pub email: String,
    pub password_hash: String,
    pub rol: Role,
    pub created_at: Timestamp,
}

impl From<User> for responses::User {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nombre: user.nombre,
            email: user.email,
            rol: user.rol,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub users: HashMap<UserId, User>,
    /// bearer token -> owner
    pub tokens: HashMap<String, UserId>,
    pub books: HashMap<BookId, responses::Book>,
    pub directories: HashMap<DirectoryId, responses::Directory>,
    pub events: HashMap<EventId, responses::CalendarEvent>,
    pub diary: HashMap<DiaryEntryId, responses::DiaryEntry>,
    pub summaries: HashMap<WeeklySummaryId, responses::WeeklySummary>,
    pub fafore: HashMap<FaforeSectionId, responses::FaforeSection>,
}

/// Handle to the repository. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct Store {
    tables: Arc<Mutex<Tables>>,
}

impl Store {
    pub(crate) fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

/// Slice one page out of an already filtered and sorted list.
pub fn paginate<T>(items: Vec<T>, page: PageRequest) -> (Vec<T>, Pagination) {
    let page = page.normalized();
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset())
        .take(page.limit as usize)
        .collect();
    (items, Pagination::new(page.page, page.limit, total))
}

/// Trimmed, non-empty text or a validation error naming the field.
pub(crate) fn required(value: &str, field: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Invalid(format!("{field} is required")));
    }
    if value.len() > payloads::requests::NAME_MAX_LEN && field != "contenido" {
        return Err(StoreError::Invalid(format!("{field} is too long")));
    }
    Ok(())
}

/// Case-insensitive substring match used by the search filters.
pub(crate) fn matches_search(search: Option<&str>, fields: &[&str]) -> bool {
    let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return true;
    };
    let needle = search.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Sorted, de-duplicated category names.
pub(crate) fn categories<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut categories: Vec<String> = names.map(str::to_string).collect();
    categories.sort();
    categories.dedup();
    categories
}

#[tracing::instrument(skip(store))]
pub fn admin_stats(store: &Store) -> responses::AdminStats {
    let tables = store.tables();
    responses::AdminStats {
        total_usuarios: tables.users.len() as u64,
        total_libros: tables.books.len() as u64,
        total_directorios: tables.directories.len() as u64,
        total_eventos: tables.events.len() as u64,
        total_entradas_diario: tables.diary.len() as u64,
        total_resumenes_semanales: tables.summaries.len() as u64,
    }
}
