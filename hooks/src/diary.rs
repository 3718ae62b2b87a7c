//! The signed-in user's diary.
//!
//! Month fetches go through an [`InflightGuard`], so flipping quickly
//! between months results in one request for the month the user stopped
//! on. Saves use create-or-update reconciliation: one entry per date.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jiff::civil::Date;
use payloads::requests::{DiaryFilters, PageRequest};
use payloads::responses::{self, Page};
use payloads::{APIClient, ClientError, DiaryEntry, DiaryEntryId, Reply, UserId};
use uuid::Uuid;

use crate::error::HookError;
use crate::guard::{Admission, InflightGuard};
use crate::reconcile::{self, Reconcile, SavePhase};

/// Entries are listed a month at a time; no month has more than 31.
const MONTH_PAGE: PageRequest = PageRequest { page: 1, limit: 31 };

#[async_trait]
pub trait DiaryApi: Send + Sync + 'static {
    fn session_user(&self) -> Option<UserId>;

    async fn list_entries(
        &self,
        user_id: &UserId,
        filters: &DiaryFilters,
        page: &PageRequest,
    ) -> Result<Page<responses::DiaryEntry>, ClientError>;

    async fn create_entry(
        &self,
        user_id: &UserId,
        entry: &DiaryEntry,
    ) -> Result<Reply<responses::DiaryEntry>, ClientError>;

    async fn update_entry(
        &self,
        user_id: &UserId,
        entry_id: &DiaryEntryId,
        entry: &DiaryEntry,
    ) -> Result<responses::DiaryEntry, ClientError>;

    async fn delete_entry(
        &self,
        user_id: &UserId,
        entry_id: &DiaryEntryId,
    ) -> Result<(), ClientError>;
}

#[async_trait]
impl DiaryApi for APIClient {
    fn session_user(&self) -> Option<UserId> {
        self.session.user_id()
    }

    async fn list_entries(
        &self,
        user_id: &UserId,
        filters: &DiaryFilters,
        page: &PageRequest,
    ) -> Result<Page<responses::DiaryEntry>, ClientError> {
        APIClient::list_entries(self, user_id, filters, page).await
    }

    async fn create_entry(
        &self,
        user_id: &UserId,
        entry: &DiaryEntry,
    ) -> Result<Reply<responses::DiaryEntry>, ClientError> {
        APIClient::create_entry(self, user_id, entry).await
    }

    async fn update_entry(
        &self,
        user_id: &UserId,
        entry_id: &DiaryEntryId,
        entry: &DiaryEntry,
    ) -> Result<responses::DiaryEntry, ClientError> {
        APIClient::update_entry(self, user_id, entry_id, entry).await
    }

    async fn delete_entry(
        &self,
        user_id: &UserId,
        entry_id: &DiaryEntryId,
    ) -> Result<(), ClientError> {
        APIClient::delete_entry(self, user_id, entry_id).await
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiaryState {
    pub entries: Vec<responses::DiaryEntry>,
    pub loading: bool,
    pub error: Option<String>,
    /// The month requested most recently.
    pub filters: DiaryFilters,
    pub save_phase: SavePhase,
}

pub struct DiaryStore<A: DiaryApi = APIClient> {
    api: Arc<A>,
    state: Arc<Mutex<DiaryState>>,
    guard: InflightGuard,
}

impl<A: DiaryApi> DiaryStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self::with_guard(api, InflightGuard::default())
    }

    pub fn with_guard(api: Arc<A>, guard: InflightGuard) -> Self {
        Self {
            api,
            state: Arc::default(),
            guard,
        }
    }

    pub fn state(&self) -> DiaryState {
        self.state.lock().unwrap().clone()
    }

    /// The loaded entry for `fecha`, if any.
    pub fn entry_for(&self, fecha: Date) -> Option<responses::DiaryEntry> {
        self.state
            .lock()
            .unwrap()
            .entries
            .iter()
            .find(|entry| entry.fecha == fecha)
            .cloned()
    }

    fn user(&self) -> Result<UserId, HookError> {
        self.api.session_user().ok_or_else(|| {
            self.state.lock().unwrap().error =
                Some(HookError::NotAuthenticated.to_string());
            HookError::NotAuthenticated
        })
    }

    pub async fn show_month(
        &self,
        year: i16,
        month: i8,
    ) -> Result<Admission<()>, HookError> {
        self.load(DiaryFilters {
            month: Some(month),
            year: Some(year),
        })
        .await
    }

    /// Fetch the entries matching `filters`. Deferred if another fetch is
    /// running; only the newest request's result is applied.
    pub async fn load(
        &self,
        filters: DiaryFilters,
    ) -> Result<Admission<()>, HookError> {
        let user = self.user()?;
        {
            let mut state = self.state.lock().unwrap();
            state.filters = filters.clone();
            state.loading = true;
            state.error = None;
        }

        let api = self.api.clone();
        let state = self.state.clone();
        let admission = self
            .guard
            .run(move |ticket| async move {
                let result = api.list_entries(&user, &filters, &MONTH_PAGE).await;
                if !ticket.is_latest() {
                    tracing::debug!("discarding superseded diary fetch");
                    return Ok(());
                }
                let mut state = state.lock().unwrap();
                state.loading = false;
                match result {
                    Ok(page) => {
                        state.entries = page.items;
                        Ok(())
                    }
                    Err(e) => {
                        state.entries.clear();
                        state.error = Some(e.to_string());
                        Err(HookError::from(e))
                    }
                }
            })
            .await;

        match admission {
            Admission::Completed(result) => result.map(Admission::Completed),
            Admission::Deferred => Ok(Admission::Deferred),
        }
    }

    /// Reload the month shown most recently.
    pub async fn reload(&self) -> Result<Admission<()>, HookError> {
        let filters = self.state.lock().unwrap().filters.clone();
        self.load(filters).await
    }

    /// Save the entry for `entry.fecha`, creating it or updating the one
    /// already stored for that date.
    pub async fn save_entry(
        &self,
        entry: DiaryEntry,
    ) -> Result<responses::DiaryEntry, HookError> {
        let user = self.user()?;
        let op = SaveEntry {
            api: self.api.as_ref(),
            user,
            entry,
        };
        let state = self.state.clone();
        let saved = reconcile::save(&op, |phase| {
            let mut state = state.lock().unwrap();
            if let SavePhase::Failed(message) = &phase {
                state.error = Some(message.clone());
            }
            state.save_phase = phase;
        })
        .await?;

        let _ = self.reload().await;
        self.state.lock().unwrap().save_phase = SavePhase::Idle;
        Ok(saved)
    }

    pub async fn delete_entry(&self, entry_id: DiaryEntryId) -> Result<(), HookError> {
        let user = self.user()?;
        if let Err(e) = self.api.delete_entry(&user, &entry_id).await {
            self.state.lock().unwrap().error = Some(e.to_string());
            return Err(e.into());
        }
        let _ = self.reload().await;
        Ok(())
    }

    /// Clear a failed save so the form can be retried.
    pub fn acknowledge(&self) {
        let mut state = self.state.lock().unwrap();
        state.save_phase = SavePhase::Idle;
        state.error = None;
    }
}

struct SaveEntry<'a, A> {
    api: &'a A,
    user: UserId,
    entry: DiaryEntry,
}

#[async_trait]
impl<A: DiaryApi> Reconcile for SaveEntry<'_, A> {
    type Record = responses::DiaryEntry;

    fn slot(&self) -> Date {
        self.entry.fecha
    }

    async fn create(&self) -> Result<Reply<responses::DiaryEntry>, ClientError> {
        self.api.create_entry(&self.user, &self.entry).await
    }

    async fn update(&self, id: Uuid) -> Result<responses::DiaryEntry, ClientError> {
        self.api
            .update_entry(&self.user, &DiaryEntryId(id), &self.entry)
            .await
    }

    async fn locate(&self) -> Result<Option<Uuid>, ClientError> {
        let filters = DiaryFilters::month_of(self.entry.fecha);
        let page = self.api.list_entries(&self.user, &filters, &MONTH_PAGE).await?;
        Ok(page
            .items
            .into_iter()
            .find(|existing| existing.fecha == self.entry.fecha)
            .map(|existing| existing.id.0))
    }
}
