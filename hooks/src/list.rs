//! Paginated, filterable list stores.
//!
//! A [`ListStore`] is generic over a [`ListService`], the seam between
//! store logic and the API client. The service adapters at the bottom of
//! this module bind it to books, directories and calendar events.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use payloads::requests::{
    BookFilters, BookFiltersPatch, DirectoryFilters, DirectoryFiltersPatch,
    EventFilters, EventFiltersPatch, PageRequest,
};
use payloads::responses::{self, Page};
use payloads::{APIClient, BookId, ClientError, DirectoryId, EventId};

use crate::error::HookError;
use crate::state::ResourceState;

/// Filter sets are shallow-merged: each patch field keeps, sets or clears
/// the current value.
pub trait Filters: Clone + Default + Send + Sync + 'static {
    type Patch: Default + Send + Sync + 'static;

    fn merge(&mut self, patch: Self::Patch);
}

impl Filters for BookFilters {
    type Patch = BookFiltersPatch;

    fn merge(&mut self, patch: BookFiltersPatch) {
        BookFilters::merge(self, patch)
    }
}

impl Filters for DirectoryFilters {
    type Patch = DirectoryFiltersPatch;

    fn merge(&mut self, patch: DirectoryFiltersPatch) {
        DirectoryFilters::merge(self, patch)
    }
}

impl Filters for EventFilters {
    type Patch = EventFiltersPatch;

    fn merge(&mut self, patch: EventFiltersPatch) {
        EventFilters::merge(self, patch)
    }
}

#[async_trait]
pub trait ListService: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;
    type Filters: Filters;
    /// Payload for create and update.
    type Details: Send + Sync;
    type Id: Send + Sync;

    async fn list(
        &self,
        filters: &Self::Filters,
        page: &PageRequest,
    ) -> Result<Page<Self::Item>, ClientError>;

    async fn create(
        &self,
        details: &Self::Details,
    ) -> Result<Self::Item, ClientError>;

    async fn update(
        &self,
        id: &Self::Id,
        details: &Self::Details,
    ) -> Result<Self::Item, ClientError>;

    async fn delete(&self, id: &Self::Id) -> Result<(), ClientError>;
}

type ListState<S> =
    ResourceState<<S as ListService>::Item, <S as ListService>::Filters>;

pub struct ListStore<S: ListService> {
    service: S,
    state: Mutex<ListState<S>>,
}

impl<S: ListService> ListStore<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(ResourceState::default()),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn state(&self) -> ListState<S> {
        self.state.lock().unwrap().clone()
    }

    pub fn items(&self) -> Vec<S::Item> {
        self.state.lock().unwrap().items.clone()
    }

    /// Fetch the current page with the current filters. A failure empties
    /// the items and records the message.
    pub async fn load(&self) -> Result<(), HookError> {
        let (filters, page) = {
            let mut state = self.state.lock().unwrap();
            state.loading = true;
            state.error = None;
            let page = PageRequest::new(
                state.pagination.page,
                state.pagination.limit,
            );
            (state.filters.clone(), page)
        };

        let result = self.service.list(&filters, &page).await;

        let mut state = self.state.lock().unwrap();
        state.loading = false;
        match result {
            Ok(Page { items, pagination }) => {
                state.items = items;
                state.pagination = pagination;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load list: {e}");
                state.items.clear();
                state.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Merge `patch` into the filters, go back to page 1 and load once.
    pub async fn set_filters(
        &self,
        patch: <S::Filters as Filters>::Patch,
    ) -> Result<(), HookError> {
        {
            let mut state = self.state.lock().unwrap();
            state.filters.merge(patch);
            state.pagination.page = 1;
        }
        self.load().await
    }

    pub async fn reset_filters(&self) -> Result<(), HookError> {
        {
            let mut state = self.state.lock().unwrap();
            state.filters = S::Filters::default();
            state.pagination.page = 1;
        }
        self.load().await
    }

    pub async fn go_to_page(&self, page: u32) -> Result<(), HookError> {
        self.state.lock().unwrap().pagination.page = page.max(1);
        self.load().await
    }

    pub async fn set_page_size(&self, limit: u32) -> Result<(), HookError> {
        {
            let mut state = self.state.lock().unwrap();
            state.pagination.limit = limit;
            state.pagination.page = 1;
        }
        self.load().await
    }

    pub async fn create(
        &self,
        details: &S::Details,
    ) -> Result<S::Item, HookError> {
        let result = self.service.create(details).await;
        self.after_write(result).await
    }

    pub async fn update(
        &self,
        id: &S::Id,
        details: &S::Details,
    ) -> Result<S::Item, HookError> {
        let result = self.service.update(id, details).await;
        self.after_write(result).await
    }

    pub async fn delete(&self, id: &S::Id) -> Result<(), HookError> {
        let result = self.service.delete(id).await;
        self.after_write(result).await
    }

    /// A successful write is followed by a reload. The write's own result
    /// is returned even if that reload fails; the reload records its error
    /// in the state.
    async fn after_write<T>(
        &self,
        result: Result<T, ClientError>,
    ) -> Result<T, HookError> {
        match result {
            Ok(value) => {
                let _ = self.load().await;
                Ok(value)
            }
            Err(e) => {
                self.state.lock().unwrap().error = Some(e.to_string());
                Err(e.into())
            }
        }
    }
}

pub struct Books(pub Arc<APIClient>);
pub struct Directories(pub Arc<APIClient>);
pub struct CalendarEvents(pub Arc<APIClient>);

pub type BookStore = ListStore<Books>;
pub type DirectoryStore = ListStore<Directories>;
pub type CalendarStore = ListStore<CalendarEvents>;

#[async_trait]
impl ListService for Books {
    type Item = responses::Book;
    type Filters = BookFilters;
    type Details = payloads::Book;
    type Id = BookId;

    async fn list(
        &self,
        filters: &BookFilters,
        page: &PageRequest,
    ) -> Result<Page<responses::Book>, ClientError> {
        self.0.list_books(filters, page).await
    }

    async fn create(
        &self,
        book: &payloads::Book,
    ) -> Result<responses::Book, ClientError> {
        self.0.create_book(book).await
    }

    async fn update(
        &self,
        id: &BookId,
        book: &payloads::Book,
    ) -> Result<responses::Book, ClientError> {
        self.0.update_book(id, book).await
    }

    async fn delete(&self, id: &BookId) -> Result<(), ClientError> {
        self.0.delete_book(id).await
    }
}

#[async_trait]
impl ListService for Directories {
    type Item = responses::Directory;
    type Filters = DirectoryFilters;
    type Details = payloads::Directory;
    type Id = DirectoryId;

    async fn list(
        &self,
        filters: &DirectoryFilters,
        page: &PageRequest,
    ) -> Result<Page<responses::Directory>, ClientError> {
        self.0.list_directories(filters, page).await
    }

    async fn create(
        &self,
        directory: &payloads::Directory,
    ) -> Result<responses::Directory, ClientError> {
        self.0.create_directory(directory).await
    }

    async fn update(
        &self,
        id: &DirectoryId,
        directory: &payloads::Directory,
    ) -> Result<responses::Directory, ClientError> {
        self.0.update_directory(id, directory).await
    }

    async fn delete(&self, id: &DirectoryId) -> Result<(), ClientError> {
        self.0.delete_directory(id).await
    }
}

#[async_trait]
impl ListService for CalendarEvents {
    type Item = responses::CalendarEvent;
    type Filters = EventFilters;
    type Details = payloads::CalendarEvent;
    type Id = EventId;

    async fn list(
        &self,
        filters: &EventFilters,
        page: &PageRequest,
    ) -> Result<Page<responses::CalendarEvent>, ClientError> {
        self.0.list_events(filters, page).await
    }

    async fn create(
        &self,
        event: &payloads::CalendarEvent,
    ) -> Result<responses::CalendarEvent, ClientError> {
        self.0.create_event(event).await
    }

    async fn update(
        &self,
        id: &EventId,
        event: &payloads::CalendarEvent,
    ) -> Result<responses::CalendarEvent, ClientError> {
        self.0.update_event(id, event).await
    }

    async fn delete(&self, id: &EventId) -> Result<(), ClientError> {
        self.0.delete_event(id).await
    }
}
