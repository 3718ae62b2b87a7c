use jiff::civil::Date;
use payloads::dates::month_bounds;
use payloads::requests::{EventFiltersPatch, Patch};
use payloads::responses;

use crate::error::HookError;
use crate::list::CalendarStore;

impl CalendarStore {
    /// Narrow the date filter to one month, keeping the type filter.
    pub async fn show_month(&self, year: i16, month: i8) -> Result<(), HookError> {
        let (first, last) = month_bounds(year, month)?;
        self.set_filters(EventFiltersPatch {
            fecha_inicio: Patch::Set(first),
            fecha_fin: Patch::Set(last),
            tipo_evento: Patch::Keep,
        })
        .await
    }

    /// Drop the date range, keeping the type filter.
    pub async fn clear_date_range(&self) -> Result<(), HookError> {
        self.set_filters(EventFiltersPatch {
            fecha_inicio: Patch::Clear,
            fecha_fin: Patch::Clear,
            tipo_evento: Patch::Keep,
        })
        .await
    }

    /// Loaded events on `date`, ordered by start time. All-day events
    /// come first.
    pub fn events_on(&self, date: Date) -> Vec<responses::CalendarEvent> {
        let mut events: Vec<_> = self
            .items()
            .into_iter()
            .filter(|event| event.event.fecha_evento == date)
            .collect();
        events.sort_by_key(|event| event.event.hora_inicio);
        events
    }
}
