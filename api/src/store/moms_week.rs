use jiff::civil::Date;
use payloads::dates;
use uuid::Uuid;

use super::*;
use super::diary::entries_between;

fn week_of(fecha: Date) -> Result<(Date, Date), StoreError> {
    dates::week_bounds(fecha).map_err(|e| StoreError::Invalid(e.to_string()))
}

fn validate(summary: &payloads::WeeklySummary) -> Result<(), StoreError> {
    required(&summary.resumen, "resumen")
}

/// Most frequent emotion, ties going to the one seen first.
fn predominant_emotion(entries: &[responses::DiaryEntry]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for emocion in entries.iter().filter_map(|entry| entry.emocion.as_deref()) {
        match counts.iter_mut().find(|(seen, _)| *seen == emocion) {
            Some((_, count)) => *count += 1,
            None => counts.push((emocion, 1)),
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (emocion, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((emocion, count));
        }
    }
    best.map(|(emocion, _)| emocion.to_string())
}

/// Entries and summary of the Monday..Sunday week containing `fecha`.
#[tracing::instrument(skip(store))]
pub fn week_overview(
    store: &Store,
    user_id: &UserId,
    fecha: Date,
) -> Result<responses::WeekOverview, StoreError> {
    let (start, end) = week_of(fecha)?;
    let tables = store.tables();
    let entradas = entries_between(&tables, user_id, start, end);
    let resumen = tables
        .summaries
        .values()
        .find(|s| s.user_id == *user_id && s.semana_inicio == start)
        .cloned();
    Ok(responses::WeekOverview {
        semana_inicio: start,
        semana_fin: end,
        emocion_predominante: predominant_emotion(&entradas),
        entradas,
        resumen,
    })
}

/// Store a summary for the week containing `semana_inicio`. The start date is
/// normalized to that week's Monday.
#[tracing::instrument(skip(store, summary), fields(semana_inicio = %summary.semana_inicio))]
pub fn create_summary(
    store: &Store,
    user_id: &UserId,
    mut summary: payloads::WeeklySummary,
) -> Result<responses::WeeklySummary, StoreError> {
    validate(&summary)?;
    let (start, end) = week_of(summary.semana_inicio)?;
    summary.semana_inicio = start;

    let mut tables = store.tables();
    if let Some(existing) = tables
        .summaries
        .values()
        .find(|s| s.user_id == *user_id && s.semana_inicio == start)
    {
        return Err(StoreError::DuplicateWeeklySummary(start, existing.id));
    }
    let summary = responses::WeeklySummary {
        id: WeeklySummaryId(Uuid::new_v4()),
        user_id: *user_id,
        semana_fin: end,
        summary,
    };
    tables.summaries.insert(summary.id, summary.clone());
    Ok(summary)
}

pub fn update_summary(
    store: &Store,
    user_id: &UserId,
    id: &WeeklySummaryId,
    mut summary: payloads::WeeklySummary,
) -> Result<responses::WeeklySummary, StoreError> {
    validate(&summary)?;
    let (start, end) = week_of(summary.semana_inicio)?;
    summary.semana_inicio = start;

    let mut tables = store.tables();
    if let Some(existing) = tables.summaries.values().find(|s| {
        s.user_id == *user_id && s.semana_inicio == start && s.id != *id
    }) {
        return Err(StoreError::DuplicateWeeklySummary(start, existing.id));
    }
    let stored = tables
        .summaries
        .get_mut(id)
        .filter(|stored| stored.user_id == *user_id)
        .ok_or(StoreError::WeeklySummaryNotFound)?;
    stored.summary = summary;
    stored.semana_fin = end;
    Ok(stored.clone())
}

/// The user's summaries, most recent week first.
pub fn list_summaries(
    store: &Store,
    user_id: &UserId,
    page: PageRequest,
) -> (Vec<responses::WeeklySummary>, Pagination) {
    let mut summaries: Vec<responses::WeeklySummary> = store
        .tables()
        .summaries
        .values()
        .filter(|s| s.user_id == *user_id)
        .cloned()
        .collect();
    summaries.sort_by(|a, b| b.semana_inicio.cmp(&a.semana_inicio));
    paginate(summaries, page)
}
