use crate::api_client::{APIClient, Auth, ClientError};
use crate::requests::{EventFilters, ListQuery, PageRequest};
use crate::responses::{self, Page};
use crate::{CalendarEvent, EventId};

use super::{data, page};

impl APIClient {
    /// Events of the signed-in user matching the filters.
    pub async fn list_events(
        &self,
        filters: &EventFilters,
        page_request: &PageRequest,
    ) -> Result<Page<responses::CalendarEvent>, ClientError> {
        let query = ListQuery {
            filters,
            page: page_request,
        };
        page(
            self.get_with_query("calendar/events", &query, Auth::Required)
                .await?,
        )
    }

    pub async fn get_event(
        &self,
        event_id: &EventId,
    ) -> Result<responses::CalendarEvent, ClientError> {
        let path = format!("calendar/events/{event_id}");
        data(self.get(&path, Auth::Required).await?)
    }

    pub async fn create_event(
        &self,
        event: &CalendarEvent,
    ) -> Result<responses::CalendarEvent, ClientError> {
        data(self.post("calendar/events", event, Auth::Required).await?)
    }

    pub async fn update_event(
        &self,
        event_id: &EventId,
        event: &CalendarEvent,
    ) -> Result<responses::CalendarEvent, ClientError> {
        let path = format!("calendar/events/{event_id}");
        data(self.put(&path, event, Auth::Required).await?)
    }

    pub async fn delete_event(
        &self,
        event_id: &EventId,
    ) -> Result<(), ClientError> {
        let path = format!("calendar/events/{event_id}");
        data(self.delete(&path, Auth::Required).await?)
    }
}
