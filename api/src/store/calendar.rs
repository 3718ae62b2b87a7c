use payloads::requests::EventFilters;
use uuid::Uuid;

use super::*;

fn validate(event: &payloads::CalendarEvent) -> Result<(), StoreError> {
    required(&event.titulo, "titulo")?;
    required(&event.tipo_evento, "tipo_evento")?;
    if let (Some(inicio), Some(fin)) = (event.hora_inicio, event.hora_fin)
        && fin < inicio
    {
        return Err(StoreError::Invalid(
            "hora_fin must not be before hora_inicio".into(),
        ));
    }
    Ok(())
}

pub fn create_event(
    store: &Store,
    user_id: &UserId,
    event: payloads::CalendarEvent,
) -> Result<responses::CalendarEvent, StoreError> {
    validate(&event)?;
    let event = responses::CalendarEvent {
        id: EventId(Uuid::new_v4()),
        user_id: *user_id,
        event,
    };
    store.tables().events.insert(event.id, event.clone());
    Ok(event)
}

/// Events are private; someone else's event reads as missing.
pub fn read_event(
    store: &Store,
    user_id: &UserId,
    id: &EventId,
) -> Result<responses::CalendarEvent, StoreError> {
    store
        .tables()
        .events
        .get(id)
        .filter(|event| event.user_id == *user_id)
        .cloned()
        .ok_or(StoreError::EventNotFound)
}

pub fn update_event(
    store: &Store,
    user_id: &UserId,
    id: &EventId,
    event: payloads::CalendarEvent,
) -> Result<responses::CalendarEvent, StoreError> {
    validate(&event)?;
    let mut tables = store.tables();
    let existing = tables
        .events
        .get_mut(id)
        .filter(|existing| existing.user_id == *user_id)
        .ok_or(StoreError::EventNotFound)?;
    existing.event = event;
    Ok(existing.clone())
}

pub fn delete_event(
    store: &Store,
    user_id: &UserId,
    id: &EventId,
) -> Result<(), StoreError> {
    let mut tables = store.tables();
    match tables.events.get(id) {
        Some(event) if event.user_id == *user_id => {
            tables.events.remove(id);
            Ok(())
        }
        _ => Err(StoreError::EventNotFound),
    }
}

/// The user's events in the date range, ordered by date then start time.
pub fn list_events(
    store: &Store,
    user_id: &UserId,
    filters: &EventFilters,
    page: PageRequest,
) -> (Vec<responses::CalendarEvent>, Pagination) {
    let mut events: Vec<responses::CalendarEvent> = store
        .tables()
        .events
        .values()
        .filter(|e| e.user_id == *user_id)
        .filter(|e| filters.contains(e.event.fecha_evento))
        .filter(|e| {
            filters
                .tipo_evento
                .as_deref()
                .is_none_or(|tipo| e.event.tipo_evento == tipo)
        })
        .cloned()
        .collect();
    events.sort_by_key(|e| (e.event.fecha_evento, e.event.hora_inicio));
    paginate(events, page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn events_are_scoped_to_their_owner() {
        let store = Store::default();
        let ana = UserId(Uuid::new_v4());
        let bea = UserId(Uuid::new_v4());
        let event = create_event(
            &store,
            &ana,
            payloads::CalendarEvent::new("Cita", date(2024, 6, 10), "diferente"),
        )
        .unwrap();

        let (events, pagination) = list_events(
            &store,
            &ana,
            &EventFilters::default(),
            PageRequest::default(),
        );
        assert_eq!(events, vec![event.clone()]);
        assert_eq!(pagination.total, 1);

        let (events, _) = list_events(
            &store,
            &bea,
            &EventFilters::default(),
            PageRequest::default(),
        );
        assert!(events.is_empty());
        assert!(matches!(
            delete_event(&store, &bea, &event.id),
            Err(StoreError::EventNotFound)
        ));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let store = Store::default();
        let mut event =
            payloads::CalendarEvent::new("Cita", date(2024, 6, 10), "medica");
        event.hora_inicio = Some(jiff::civil::time(10, 0, 0, 0));
        event.hora_fin = Some(jiff::civil::time(9, 0, 0, 0));
        assert!(matches!(
            create_event(&store, &UserId(Uuid::new_v4()), event),
            Err(StoreError::Invalid(_))
        ));
    }
}
