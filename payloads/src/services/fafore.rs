use crate::api_client::{APIClient, Auth, ClientError};
use crate::responses::FaforeSection;

use super::data;

impl APIClient {
    /// Informational FAFORE content, ordered for display.
    pub async fn fafore_sections(
        &self,
    ) -> Result<Vec<FaforeSection>, ClientError> {
        data(self.get("fafore", Auth::None).await?)
    }
}
