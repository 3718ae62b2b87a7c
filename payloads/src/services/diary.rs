use jiff::civil::Date;

use crate::api_client::{APIClient, Auth, ClientError, Reply};
use crate::requests::{DiaryFilters, ListQuery, PageRequest};
use crate::responses::{self, Envelope, Page};
use crate::{DiaryEntry, DiaryEntryId, UserId, dates};

use super::{data, page};

impl APIClient {
    pub async fn list_entries(
        &self,
        user_id: &UserId,
        filters: &DiaryFilters,
        page_request: &PageRequest,
    ) -> Result<Page<responses::DiaryEntry>, ClientError> {
        let query = ListQuery {
            filters,
            page: page_request,
        };
        let path = format!("diary/{user_id}/entries");
        page(self.get_with_query(&path, &query, Auth::Required).await?)
    }

    /// The entry for one calendar date, if it exists.
    pub async fn entry_by_date(
        &self,
        user_id: &UserId,
        fecha: Date,
    ) -> Result<Option<responses::DiaryEntry>, ClientError> {
        let path = format!(
            "diary/{user_id}/entries/date/{}",
            dates::format_date(fecha)
        );
        match self.get(&path, Auth::Required).await {
            Ok(reply) => data(reply).map(Some),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create an entry. A second entry for the same date is reported as
    /// [`Reply::Conflict`] carrying the existing entry's id when known.
    pub async fn create_entry(
        &self,
        user_id: &UserId,
        entry: &DiaryEntry,
    ) -> Result<Reply<responses::DiaryEntry>, ClientError> {
        let path = format!("diary/{user_id}/entries");
        let reply = self
            .post::<Envelope<responses::DiaryEntry>, _>(
                &path,
                entry,
                Auth::Required,
            )
            .await?;
        Ok(reply.map(|envelope| envelope.data))
    }

    pub async fn update_entry(
        &self,
        user_id: &UserId,
        entry_id: &DiaryEntryId,
        entry: &DiaryEntry,
    ) -> Result<responses::DiaryEntry, ClientError> {
        let path = format!("diary/{user_id}/entries/{entry_id}");
        data(self.put(&path, entry, Auth::Required).await?)
    }

    pub async fn delete_entry(
        &self,
        user_id: &UserId,
        entry_id: &DiaryEntryId,
    ) -> Result<(), ClientError> {
        let path = format!("diary/{user_id}/entries/{entry_id}");
        data(self.delete(&path, Auth::Required).await?)
    }
}
