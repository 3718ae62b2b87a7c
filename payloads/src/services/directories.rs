use crate::api_client::{APIClient, Auth, ClientError};
use crate::requests::{DirectoryFilters, ListQuery, PageRequest};
use crate::responses::{self, Page};
use crate::{Directory, DirectoryId};

use super::{data, page};

impl APIClient {
    pub async fn list_directories(
        &self,
        filters: &DirectoryFilters,
        page_request: &PageRequest,
    ) -> Result<Page<responses::Directory>, ClientError> {
        let query = ListQuery {
            filters,
            page: page_request,
        };
        page(self.get_with_query("directories", &query, Auth::None).await?)
    }

    pub async fn get_directory(
        &self,
        directory_id: &DirectoryId,
    ) -> Result<responses::Directory, ClientError> {
        data(
            self.get(&format!("directories/{directory_id}"), Auth::None)
                .await?,
        )
    }

    pub async fn directory_categories(
        &self,
    ) -> Result<Vec<String>, ClientError> {
        data(self.get("directories/categories", Auth::None).await?)
    }

    /// Admin only.
    pub async fn create_directory(
        &self,
        directory: &Directory,
    ) -> Result<responses::Directory, ClientError> {
        data(self.post("directories", directory, Auth::Required).await?)
    }

    /// Admin only.
    pub async fn update_directory(
        &self,
        directory_id: &DirectoryId,
        directory: &Directory,
    ) -> Result<responses::Directory, ClientError> {
        let path = format!("directories/{directory_id}");
        data(self.put(&path, directory, Auth::Required).await?)
    }

    /// Admin only.
    pub async fn delete_directory(
        &self,
        directory_id: &DirectoryId,
    ) -> Result<(), ClientError> {
        let path = format!("directories/{directory_id}");
        data(self.delete(&path, Auth::Required).await?)
    }
}
