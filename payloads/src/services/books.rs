use crate::api_client::{APIClient, Auth, ClientError};
use crate::requests::{BookFilters, ListQuery, PageRequest};
use crate::responses::{self, Page};
use crate::{Book, BookId};

use super::{data, page};

impl APIClient {
    pub async fn list_books(
        &self,
        filters: &BookFilters,
        page_request: &PageRequest,
    ) -> Result<Page<responses::Book>, ClientError> {
        let query = ListQuery {
            filters,
            page: page_request,
        };
        page(self.get_with_query("books", &query, Auth::None).await?)
    }

    pub async fn get_book(
        &self,
        book_id: &BookId,
    ) -> Result<responses::Book, ClientError> {
        data(self.get(&format!("books/{book_id}"), Auth::None).await?)
    }

    pub async fn book_categories(&self) -> Result<Vec<String>, ClientError> {
        data(self.get("books/categories", Auth::None).await?)
    }

    /// Admin only.
    pub async fn create_book(
        &self,
        book: &Book,
    ) -> Result<responses::Book, ClientError> {
        data(self.post("books", book, Auth::Required).await?)
    }

    /// Admin only.
    pub async fn update_book(
        &self,
        book_id: &BookId,
        book: &Book,
    ) -> Result<responses::Book, ClientError> {
        data(
            self.put(&format!("books/{book_id}"), book, Auth::Required)
                .await?,
        )
    }

    /// Admin only.
    pub async fn delete_book(&self, book_id: &BookId) -> Result<(), ClientError> {
        data(
            self.delete(&format!("books/{book_id}"), Auth::Required)
                .await?,
        )
    }
}
