//! Single-value resources that are fetched, shown, and refetched on
//! demand: admin stats, FAFORE content, category lists.

use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;
use payloads::responses::{AdminStats, FaforeSection};
use payloads::{APIClient, ClientError};

use crate::error::HookError;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState<T> {
    #[default]
    NotFetched,
    Fetched(T),
}

impl<T> FetchState<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::NotFetched => None,
            Self::Fetched(data) => Some(data),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceSnapshot<T> {
    pub data: FetchState<T>,
    pub is_loading: bool,
    /// Error from the last fetch. Data from an earlier fetch is kept.
    pub error: Option<String>,
}

impl<T> ResourceSnapshot<T> {
    /// Nothing fetched yet and the first fetch is still running.
    pub fn is_initial_loading(&self) -> bool {
        self.is_loading && !self.data.is_fetched() && self.error.is_none()
    }
}

type Fetcher<T> =
    Arc<dyn Fn() -> BoxFuture<'static, Result<T, ClientError>> + Send + Sync>;

pub struct Resource<T> {
    fetch: Fetcher<T>,
    state: Mutex<ResourceSnapshot<T>>,
}

impl<T: Clone + Send + 'static> Resource<T> {
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        Self {
            fetch: Arc::new(move || fetch().boxed()),
            state: Mutex::new(ResourceSnapshot {
                data: FetchState::NotFetched,
                is_loading: false,
                error: None,
            }),
        }
    }

    pub fn snapshot(&self) -> ResourceSnapshot<T> {
        self.state.lock().unwrap().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.lock().unwrap().data.as_ref().cloned()
    }

    pub async fn refetch(&self) -> Result<(), HookError> {
        {
            let mut state = self.state.lock().unwrap();
            state.is_loading = true;
            state.error = None;
        }
        let result = (self.fetch)().await;
        let mut state = self.state.lock().unwrap();
        state.is_loading = false;
        match result {
            Ok(data) => {
                state.data = FetchState::Fetched(data);
                Ok(())
            }
            Err(e) => {
                state.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }
}

/// Admin only.
pub fn admin_stats(client: Arc<APIClient>) -> Resource<AdminStats> {
    Resource::new(move || {
        let client = client.clone();
        async move { client.admin_stats().await }
    })
}

pub fn fafore_sections(client: Arc<APIClient>) -> Resource<Vec<FaforeSection>> {
    Resource::new(move || {
        let client = client.clone();
        async move { client.fafore_sections().await }
    })
}

pub fn book_categories(client: Arc<APIClient>) -> Resource<Vec<String>> {
    Resource::new(move || {
        let client = client.clone();
        async move { client.book_categories().await }
    })
}

pub fn directory_categories(client: Arc<APIClient>) -> Resource<Vec<String>> {
    Resource::new(move || {
        let client = client.clone();
        async move { client.directory_categories().await }
    })
}
