use jiff::civil::Date;
use payloads::ClientError;
use payloads::dates::DateError;

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    InvalidDate(#[from] DateError),
    #[error("Not authenticated. Please log in.")]
    NotAuthenticated,
    /// A save hit the uniqueness constraint, the backend didn't report the
    /// existing record and a fresh listing didn't contain it either.
    #[error("Could not locate the existing entry for {fecha}")]
    EntryNotLocated { fecha: Date },
}

impl HookError {
    /// Whether the session was rejected and has already been cleared.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Client(ClientError::SessionExpired(_)))
    }
}
