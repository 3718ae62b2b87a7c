use crate::api_client::{APIClient, Auth, ClientError};
use crate::responses::AdminStats;

use super::data;

impl APIClient {
    /// Admin only.
    pub async fn admin_stats(&self) -> Result<AdminStats, ClientError> {
        data(self.get("admin/stats", Auth::Required).await?)
    }
}
