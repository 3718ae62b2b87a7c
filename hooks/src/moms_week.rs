//! The "mom's week" view: one week of diary entries with its summary, plus
//! the list of past summaries.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jiff::civil::Date;
use payloads::dates::week_bounds;
use payloads::requests::{MAX_PAGE_LIMIT, PageRequest};
use payloads::responses::{self, Page};
use payloads::{APIClient, ClientError, Reply, UserId, WeeklySummary, WeeklySummaryId};
use uuid::Uuid;

use crate::error::HookError;
use crate::guard::{Admission, InflightGuard};
use crate::reconcile::{self, Reconcile, SavePhase};

#[async_trait]
pub trait MomsWeekApi: Send + Sync + 'static {
    fn session_user(&self) -> Option<UserId>;

    async fn current_week(
        &self,
        user_id: &UserId,
    ) -> Result<responses::WeekOverview, ClientError>;

    async fn week_of(
        &self,
        user_id: &UserId,
        fecha: Date,
    ) -> Result<responses::WeekOverview, ClientError>;

    async fn list_summaries(
        &self,
        user_id: &UserId,
        page: &PageRequest,
    ) -> Result<Page<responses::WeeklySummary>, ClientError>;

    async fn create_summary(
        &self,
        user_id: &UserId,
        summary: &WeeklySummary,
    ) -> Result<Reply<responses::WeeklySummary>, ClientError>;

    async fn update_summary(
        &self,
        user_id: &UserId,
        summary_id: &WeeklySummaryId,
        summary: &WeeklySummary,
    ) -> Result<responses::WeeklySummary, ClientError>;
}

#[async_trait]
impl MomsWeekApi for APIClient {
    fn session_user(&self) -> Option<UserId> {
        self.session.user_id()
    }

    async fn current_week(
        &self,
        user_id: &UserId,
    ) -> Result<responses::WeekOverview, ClientError> {
        APIClient::current_week(self, user_id).await
    }

    async fn week_of(
        &self,
        user_id: &UserId,
        fecha: Date,
    ) -> Result<responses::WeekOverview, ClientError> {
        APIClient::week_of(self, user_id, fecha).await
    }

    async fn list_summaries(
        &self,
        user_id: &UserId,
        page: &PageRequest,
    ) -> Result<Page<responses::WeeklySummary>, ClientError> {
        APIClient::list_summaries(self, user_id, page).await
    }

    async fn create_summary(
        &self,
        user_id: &UserId,
        summary: &WeeklySummary,
    ) -> Result<Reply<responses::WeeklySummary>, ClientError> {
        APIClient::create_summary(self, user_id, summary).await
    }

    async fn update_summary(
        &self,
        user_id: &UserId,
        summary_id: &WeeklySummaryId,
        summary: &WeeklySummary,
    ) -> Result<responses::WeeklySummary, ClientError> {
        APIClient::update_summary(self, user_id, summary_id, summary).await
    }
}

/// Which week the view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeekSelection {
    /// The week containing the backend's today.
    #[default]
    Current,
    Containing(Date),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MomsWeekState {
    pub week: Option<responses::WeekOverview>,
    pub selection: WeekSelection,
    pub summaries: Vec<responses::WeeklySummary>,
    pub loading: bool,
    pub error: Option<String>,
    pub save_phase: SavePhase,
}

pub struct MomsWeekStore<A: MomsWeekApi = APIClient> {
    api: Arc<A>,
    state: Arc<Mutex<MomsWeekState>>,
    guard: InflightGuard,
}

impl<A: MomsWeekApi> MomsWeekStore<A> {
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

    pub fn state(&self) -> MomsWeekState {
        self.state.lock().unwrap().clone()
    }

    fn user(&self) -> Result<UserId, HookError> {
        self.api.session_user().ok_or_else(|| {
            self.state.lock().unwrap().error =
                Some(HookError::NotAuthenticated.to_string());
            HookError::NotAuthenticated
        })
    }

    pub async fn show_current_week(&self) -> Result<Admission<()>, HookError> {
        self.show(WeekSelection::Current).await
    }

    pub async fn show_week_of(&self, fecha: Date) -> Result<Admission<()>, HookError> {
        self.show(WeekSelection::Containing(fecha)).await
    }

    /// Step `weeks` weeks forward (or back, when negative) from the week
    /// shown. Nothing loaded yet means the current week is loaded instead.
    pub async fn step(&self, weeks: i64) -> Result<Admission<()>, HookError> {
        let anchor = {
            let state = self.state.lock().unwrap();
            match (&state.week, state.selection) {
                (Some(week), _) => Some(week.semana_inicio),
                (None, WeekSelection::Containing(fecha)) => Some(fecha),
                (None, WeekSelection::Current) => None,
            }
        };
        let Some(anchor) = anchor else {
            return self.show_current_week().await;
        };
        let target = anchor
            .checked_add(jiff::Span::new().weeks(weeks))
            .map_err(payloads::dates::DateError::from)?;
        self.show_week_of(target).await
    }

    /// Fetch the overview for `selection`. Deferred if another fetch is
    /// running; only the newest request's result is applied.
    pub async fn show(
        &self,
        selection: WeekSelection,
    ) -> Result<Admission<()>, HookError> {
        let user = self.user()?;
        {
            let mut state = self.state.lock().unwrap();
            state.selection = selection;
            state.loading = true;
            state.error = None;
        }

        let api = self.api.clone();
        let state = self.state.clone();
        let admission = self
            .guard
            .run(move |ticket| async move {
                let result = match selection {
                    WeekSelection::Current => api.current_week(&user).await,
                    WeekSelection::Containing(fecha) => {
                        api.week_of(&user, fecha).await
                    }
                };
                if !ticket.is_latest() {
                    tracing::debug!("discarding superseded week fetch");
                    return Ok(());
                }
                let mut state = state.lock().unwrap();
                state.loading = false;
                match result {
                    Ok(week) => {
                        state.week = Some(week);
                        Ok(())
                    }
                    Err(e) => {
                        state.week = None;
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

    pub async fn reload_week(&self) -> Result<Admission<()>, HookError> {
        let selection = self.state.lock().unwrap().selection;
        self.show(selection).await
    }

    /// Fetch the most recent summaries, newest first.
    pub async fn load_summaries(&self) -> Result<(), HookError> {
        let user = self.user()?;
        let result = self
            .api
            .list_summaries(&user, &PageRequest::default())
            .await;
        let mut state = self.state.lock().unwrap();
        match result {
            Ok(page) => {
                state.summaries = page.items;
                Ok(())
            }
            Err(e) => {
                state.summaries.clear();
                state.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Save the summary for the week containing `summary.semana_inicio`,
    /// creating it or updating the one already stored for that week.
    pub async fn save_summary(
        &self,
        summary: WeeklySummary,
    ) -> Result<responses::WeeklySummary, HookError> {
        let user = self.user()?;
        let (monday, _) = week_bounds(summary.semana_inicio)?;
        let op = SaveSummary {
            api: self.api.as_ref(),
            user,
            monday,
            summary,
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

        let _ = self.reload_week().await;
        let _ = self.load_summaries().await;
        self.state.lock().unwrap().save_phase = SavePhase::Idle;
        Ok(saved)
    }
}

struct SaveSummary<'a, A> {
    api: &'a A,
    user: UserId,
    monday: Date,
    summary: WeeklySummary,
}

#[async_trait]
impl<A: MomsWeekApi> Reconcile for SaveSummary<'_, A> {
    type Record = responses::WeeklySummary;

    fn slot(&self) -> Date {
        self.monday
    }

    async fn create(
        &self,
    ) -> Result<Reply<responses::WeeklySummary>, ClientError> {
        self.api.create_summary(&self.user, &self.summary).await
    }

    async fn update(
        &self,
        id: Uuid,
    ) -> Result<responses::WeeklySummary, ClientError> {
        self.api
            .update_summary(&self.user, &WeeklySummaryId(id), &self.summary)
            .await
    }

    async fn locate(&self) -> Result<Option<Uuid>, ClientError> {
        let page = self
            .api
            .list_summaries(&self.user, &PageRequest::new(1, MAX_PAGE_LIMIT))
            .await?;
        Ok(page
            .items
            .into_iter()
            .find(|existing| existing.semana_inicio == self.monday)
            .map(|existing| existing.id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use payloads::Conflict;
    use payloads::responses::Pagination;

    /// Backend whose "today" is Wednesday 2025-01-01.
    #[derive(Default)]
    struct FakeWeek {
        user: Option<UserId>,
        summaries: Mutex<Vec<responses::WeeklySummary>>,
        week_calls: Mutex<Vec<Option<Date>>>,
        report_existing_id: bool,
    }

    impl FakeWeek {
        fn signed_in(report_existing_id: bool) -> Self {
            Self {
                user: Some(UserId(Uuid::new_v4())),
                report_existing_id,
                ..Default::default()
            }
        }

        fn overview(&self, fecha: Date) -> responses::WeekOverview {
            let (semana_inicio, semana_fin) = week_bounds(fecha).unwrap();
            responses::WeekOverview {
                semana_inicio,
                semana_fin,
                entradas: Vec::new(),
                resumen: self
                    .summaries
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|summary| summary.semana_inicio == semana_inicio)
                    .cloned(),
                emocion_predominante: None,
            }
        }
    }

    #[async_trait]
    impl MomsWeekApi for FakeWeek {
        fn session_user(&self) -> Option<UserId> {
            self.user
        }

        async fn current_week(
            &self,
            _: &UserId,
        ) -> Result<responses::WeekOverview, ClientError> {
            self.week_calls.lock().unwrap().push(None);
            Ok(self.overview(date(2025, 1, 1)))
        }

        async fn week_of(
            &self,
            _: &UserId,
            fecha: Date,
        ) -> Result<responses::WeekOverview, ClientError> {
            self.week_calls.lock().unwrap().push(Some(fecha));
            Ok(self.overview(fecha))
        }

        async fn list_summaries(
            &self,
            _: &UserId,
            _: &PageRequest,
        ) -> Result<Page<responses::WeeklySummary>, ClientError> {
            let items = self.summaries.lock().unwrap().clone();
            let total = items.len() as u64;
            Ok(Page {
                items,
                pagination: Pagination::new(1, MAX_PAGE_LIMIT, total),
            })
        }

        async fn create_summary(
            &self,
            _: &UserId,
            summary: &WeeklySummary,
        ) -> Result<Reply<responses::WeeklySummary>, ClientError> {
            let (monday, sunday) = week_bounds(summary.semana_inicio).unwrap();
            let mut summaries = self.summaries.lock().unwrap();
            if let Some(existing) =
                summaries.iter().find(|s| s.semana_inicio == monday)
            {
                return Ok(Reply::Conflict(Conflict {
                    message: "A summary already exists for this week".into(),
                    existing_id: self
                        .report_existing_id
                        .then_some(existing.id.0),
                }));
            }
            let stored = responses::WeeklySummary {
                id: WeeklySummaryId(Uuid::new_v4()),
                user_id: self.user.unwrap(),
                semana_fin: sunday,
                summary: WeeklySummary {
                    semana_inicio: monday,
                    ..summary.clone()
                },
            };
            summaries.push(stored.clone());
            Ok(Reply::Ok(stored))
        }

        async fn update_summary(
            &self,
            _: &UserId,
            summary_id: &WeeklySummaryId,
            summary: &WeeklySummary,
        ) -> Result<responses::WeeklySummary, ClientError> {
            let mut summaries = self.summaries.lock().unwrap();
            let existing = summaries
                .iter_mut()
                .find(|s| s.id == *summary_id)
                .ok_or_else(|| ClientError::NotFound("Weekly summary not found".into()))?;
            existing.summary.resumen = summary.resumen.clone();
            Ok(existing.clone())
        }
    }

    fn summary(fecha: Date, resumen: &str) -> WeeklySummary {
        WeeklySummary {
            semana_inicio: fecha,
            resumen: resumen.into(),
            logros: Vec::new(),
            desafios: Vec::new(),
            emocion_predominante: None,
        }
    }

    #[tokio::test]
    async fn current_week_is_loaded() -> anyhow::Result<()> {
        let store = MomsWeekStore::new(Arc::new(FakeWeek::signed_in(true)));
        store.show_current_week().await?;
        let week = store.state().week.unwrap();
        assert_eq!(week.semana_inicio, date(2024, 12, 30));
        assert_eq!(week.semana_fin, date(2025, 1, 5));
        Ok(())
    }

    #[tokio::test]
    async fn stepping_moves_by_whole_weeks() -> anyhow::Result<()> {
        let api = Arc::new(FakeWeek::signed_in(true));
        let store = MomsWeekStore::new(api.clone());
        store.show_current_week().await?;
        store.step(-1).await?;
        assert_eq!(
            store.state().week.unwrap().semana_inicio,
            date(2024, 12, 23)
        );
        assert_eq!(
            *api.week_calls.lock().unwrap(),
            vec![None, Some(date(2024, 12, 23))]
        );
        Ok(())
    }

    #[tokio::test]
    async fn saving_twice_in_a_week_keeps_one_summary() -> anyhow::Result<()> {
        for report_existing_id in [true, false] {
            let api = Arc::new(FakeWeek::signed_in(report_existing_id));
            let store = MomsWeekStore::new(api.clone());
            store.show_week_of(date(2024, 6, 12)).await?;

            store.save_summary(summary(date(2024, 6, 10), "Cansada")).await?;
            let saved = store
                .save_summary(summary(date(2024, 6, 14), "Mejor"))
                .await?;

            assert_eq!(saved.semana_inicio, date(2024, 6, 10));
            assert_eq!(api.summaries.lock().unwrap().len(), 1);
            let state = store.state();
            assert_eq!(state.summaries.len(), 1);
            assert_eq!(state.week.unwrap().resumen.unwrap().resumen, "Mejor");
            assert_eq!(state.save_phase, SavePhase::Idle);
        }
        Ok(())
    }

    #[tokio::test]
    async fn signed_out_user_is_rejected() {
        let store = MomsWeekStore::new(Arc::new(FakeWeek::default()));
        assert!(matches!(
            store.show_current_week().await,
            Err(HookError::NotAuthenticated)
        ));
        assert!(matches!(
            store.load_summaries().await,
            Err(HookError::NotAuthenticated)
        ));
    }
}
