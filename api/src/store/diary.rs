use jiff::civil::Date;
use payloads::requests::DiaryFilters;
use uuid::Uuid;

use super::*;
use crate::time::TimeSource;

fn validate(entry: &payloads::DiaryEntry) -> Result<(), StoreError> {
    required(&entry.contenido, "contenido")
}

/// Id of the user's entry on `fecha`, skipping `except`.
fn occupant(
    tables: &Tables,
    user_id: &UserId,
    fecha: Date,
    except: Option<&DiaryEntryId>,
) -> Option<DiaryEntryId> {
    tables
        .diary
        .values()
        .find(|entry| {
            entry.user_id == *user_id
                && entry.entry.fecha == fecha
                && Some(&entry.id) != except
        })
        .map(|entry| entry.id)
}

#[tracing::instrument(skip(store, entry, time_source), fields(fecha = %entry.fecha))]
pub fn create_entry(
    store: &Store,
    user_id: &UserId,
    entry: payloads::DiaryEntry,
    time_source: &TimeSource,
) -> Result<responses::DiaryEntry, StoreError> {
    validate(&entry)?;
    let mut tables = store.tables();
    if let Some(existing) = occupant(&tables, user_id, entry.fecha, None) {
        return Err(StoreError::DuplicateDiaryEntry(entry.fecha, existing));
    }
    let now = time_source.now();
    let entry = responses::DiaryEntry {
        id: DiaryEntryId(Uuid::new_v4()),
        user_id: *user_id,
        created_at: now,
        updated_at: now,
        entry,
    };
    tables.diary.insert(entry.id, entry.clone());
    Ok(entry)
}

pub fn read_entry(
    store: &Store,
    user_id: &UserId,
    id: &DiaryEntryId,
) -> Result<responses::DiaryEntry, StoreError> {
    store
        .tables()
        .diary
        .get(id)
        .filter(|entry| entry.user_id == *user_id)
        .cloned()
        .ok_or(StoreError::DiaryEntryNotFound)
}

pub fn entry_by_date(
    store: &Store,
    user_id: &UserId,
    fecha: Date,
) -> Result<responses::DiaryEntry, StoreError> {
    store
        .tables()
        .diary
        .values()
        .find(|entry| entry.user_id == *user_id && entry.entry.fecha == fecha)
        .cloned()
        .ok_or(StoreError::DiaryEntryNotFound)
}

/// Replace an entry's details. Moving it onto a date that already has an
/// entry is a conflict like a duplicate create.
#[tracing::instrument(skip(store, entry, time_source))]
pub fn update_entry(
    store: &Store,
    user_id: &UserId,
    id: &DiaryEntryId,
    entry: payloads::DiaryEntry,
    time_source: &TimeSource,
) -> Result<responses::DiaryEntry, StoreError> {
    validate(&entry)?;
    let mut tables = store.tables();
    if let Some(existing) = occupant(&tables, user_id, entry.fecha, Some(id)) {
        return Err(StoreError::DuplicateDiaryEntry(entry.fecha, existing));
    }
    let stored = tables
        .diary
        .get_mut(id)
        .filter(|stored| stored.user_id == *user_id)
        .ok_or(StoreError::DiaryEntryNotFound)?;
    stored.entry = entry;
    stored.updated_at = time_source.now();
    Ok(stored.clone())
}

pub fn delete_entry(
    store: &Store,
    user_id: &UserId,
    id: &DiaryEntryId,
) -> Result<(), StoreError> {
    let mut tables = store.tables();
    match tables.diary.get(id) {
        Some(entry) if entry.user_id == *user_id => {
            tables.diary.remove(id);
            Ok(())
        }
        _ => Err(StoreError::DiaryEntryNotFound),
    }
}

/// The user's entries for the filtered month/year, newest first.
pub fn list_entries(
    store: &Store,
    user_id: &UserId,
    filters: &DiaryFilters,
    page: PageRequest,
) -> (Vec<responses::DiaryEntry>, Pagination) {
    let mut entries: Vec<responses::DiaryEntry> = store
        .tables()
        .diary
        .values()
        .filter(|entry| entry.user_id == *user_id && filters.matches(entry.fecha))
        .cloned()
        .collect();
    entries.sort_by(|a, b| b.fecha.cmp(&a.fecha));
    paginate(entries, page)
}

/// The user's entries between two dates inclusive, oldest first.
pub(crate) fn entries_between(
    tables: &Tables,
    user_id: &UserId,
    start: Date,
    end: Date,
) -> Vec<responses::DiaryEntry> {
    let mut entries: Vec<responses::DiaryEntry> = tables
        .diary
        .values()
        .filter(|entry| {
            entry.user_id == *user_id && entry.fecha >= start && entry.fecha <= end
        })
        .cloned()
        .collect();
    entries.sort_by_key(|entry| entry.fecha);
    entries
}
