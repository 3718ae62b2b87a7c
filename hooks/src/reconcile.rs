//! Create-or-update for records that are unique per user and date.
//!
//! A save always tries to create first. When the backend answers with a
//! conflict the save switches to updating the record that occupies the
//! slot: the id comes from the conflict response when present, otherwise
//! from one fresh listing of the surrounding period. Either way the caller
//! sees a single successful save.

use async_trait::async_trait;
use jiff::civil::Date;
use payloads::{ClientError, Reply};
use uuid::Uuid;

use crate::error::HookError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveBranch {
    Create,
    Update,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SavePhase {
    #[default]
    Idle,
    Saving(SaveBranch),
    /// The create was refused because the slot is taken.
    Conflict,
    Success,
    Failed(String),
}

impl SavePhase {
    pub fn is_saving(&self) -> bool {
        matches!(self, Self::Saving(_) | Self::Conflict)
    }
}

/// One pending save.
#[async_trait]
pub trait Reconcile: Send + Sync {
    type Record: Send;

    /// The unique slot the record occupies.
    fn slot(&self) -> Date;

    async fn create(&self) -> Result<Reply<Self::Record>, ClientError>;

    async fn update(&self, id: Uuid) -> Result<Self::Record, ClientError>;

    /// The id of the record currently occupying the slot.
    async fn locate(&self) -> Result<Option<Uuid>, ClientError>;
}

/// Drive one save to completion, reporting each phase to `on_phase`.
/// Ends in [`SavePhase::Success`] or [`SavePhase::Failed`].
pub async fn save<R: Reconcile>(
    op: &R,
    mut on_phase: impl FnMut(SavePhase) + Send,
) -> Result<R::Record, HookError> {
    let result = attempt(op, &mut on_phase).await;
    match &result {
        Ok(_) => on_phase(SavePhase::Success),
        Err(e) => on_phase(SavePhase::Failed(e.to_string())),
    }
    result
}

async fn attempt<R: Reconcile>(
    op: &R,
    on_phase: &mut (impl FnMut(SavePhase) + Send),
) -> Result<R::Record, HookError> {
    on_phase(SavePhase::Saving(SaveBranch::Create));
    let conflict = match op.create().await? {
        Reply::Ok(record) => return Ok(record),
        Reply::Conflict(conflict) => conflict,
    };
    on_phase(SavePhase::Conflict);
    tracing::debug!(slot = %op.slot(), "{}", conflict.message);

    let id = match conflict.existing_id {
        Some(id) => id,
        None => op.locate().await?.ok_or(HookError::EntryNotLocated {
            fecha: op.slot(),
        })?,
    };

    on_phase(SavePhase::Saving(SaveBranch::Update));
    Ok(op.update(id).await?)
}
