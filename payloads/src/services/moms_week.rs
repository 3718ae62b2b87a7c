use jiff::civil::Date;

use crate::api_client::{APIClient, Auth, ClientError, Reply};
use crate::requests::PageRequest;
use crate::responses::{self, Envelope, Page};
use crate::{UserId, WeeklySummary, WeeklySummaryId, dates};

use super::{data, page};

impl APIClient {
    /// Entries and summary for the week containing the backend's today.
    pub async fn current_week(
        &self,
        user_id: &UserId,
    ) -> Result<responses::WeekOverview, ClientError> {
        let path = format!("moms-week/{user_id}/current-week");
        data(self.get(&path, Auth::Required).await?)
    }

    /// Entries and summary for the week containing `fecha`.
    pub async fn week_of(
        &self,
        user_id: &UserId,
        fecha: Date,
    ) -> Result<responses::WeekOverview, ClientError> {
        let path = format!(
            "moms-week/{user_id}/week/{}",
            dates::format_date(fecha)
        );
        data(self.get(&path, Auth::Required).await?)
    }

    pub async fn list_summaries(
        &self,
        user_id: &UserId,
        page_request: &PageRequest,
    ) -> Result<Page<responses::WeeklySummary>, ClientError> {
        let path = format!("moms-week/{user_id}/summaries");
        page(
            self.get_with_query(&path, page_request, Auth::Required)
                .await?,
        )
    }

    /// Create a summary. A second summary for the same week is reported as
    /// [`Reply::Conflict`].
    pub async fn create_summary(
        &self,
        user_id: &UserId,
        summary: &WeeklySummary,
    ) -> Result<Reply<responses::WeeklySummary>, ClientError> {
        let path = format!("moms-week/{user_id}/summaries");
        let reply = self
            .post::<Envelope<responses::WeeklySummary>, _>(
                &path,
                summary,
                Auth::Required,
            )
            .await?;
        Ok(reply.map(|envelope| envelope.data))
    }

    pub async fn update_summary(
        &self,
        user_id: &UserId,
        summary_id: &WeeklySummaryId,
        summary: &WeeklySummary,
    ) -> Result<responses::WeeklySummary, ClientError> {
        let path = format!("moms-week/{user_id}/summaries/{summary_id}");
        data(self.put(&path, summary, Auth::Required).await?)
    }
}
