use std::sync::{Arc, Mutex};

use payloads::requests::{LoginCredentials, RegisterAccount};
use payloads::responses::User;
use payloads::{APIClient, ClientError};

use crate::error::HookError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Signed-in user state, backed by the client's session.
pub struct AuthStore {
    client: Arc<APIClient>,
    state: Mutex<AuthState>,
}

impl AuthStore {
    /// Starts from whatever session is persisted. Call [`Self::restore`]
    /// to check it is still valid.
    pub fn new(client: Arc<APIClient>) -> Self {
        let user = client.session.user();
        Self {
            client,
            state: Mutex::new(AuthState {
                user,
                ..Default::default()
            }),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.lock().unwrap().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.lock().unwrap().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|user| user.rol.is_admin())
    }

    fn start(&self) {
        let mut state = self.state.lock().unwrap();
        state.loading = true;
        state.error = None;
    }

    fn finish(&self, result: Result<Option<User>, &ClientError>) {
        let mut state = self.state.lock().unwrap();
        state.loading = false;
        match result {
            Ok(user) => state.user = user,
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    /// Check the persisted session against the backend. A rejected token
    /// signs the user out; an unreachable backend keeps the stored user.
    pub async fn restore(&self) -> Result<Option<User>, HookError> {
        if !self.client.is_authenticated() {
            self.finish(Ok(None));
            return Ok(None);
        }
        self.start();
        match self.client.current_user().await {
            Ok(user) => {
                self.finish(Ok(Some(user.clone())));
                Ok(Some(user))
            }
            Err(ClientError::SessionExpired(_)) => {
                tracing::info!("stored session was rejected");
                self.finish(Ok(None));
                Ok(None)
            }
            Err(e) => {
                self.finish(Err(&e));
                Err(e.into())
            }
        }
    }

    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<User, HookError> {
        self.start();
        match self.client.login(credentials).await {
            Ok(session) => {
                self.finish(Ok(Some(session.user.clone())));
                Ok(session.user)
            }
            Err(e) => {
                self.finish(Err(&e));
                Err(e.into())
            }
        }
    }

    pub async fn register(
        &self,
        details: &RegisterAccount,
    ) -> Result<User, HookError> {
        self.start();
        match self.client.register(details).await {
            Ok(session) => {
                self.finish(Ok(Some(session.user.clone())));
                Ok(session.user)
            }
            Err(e) => {
                self.finish(Err(&e));
                Err(e.into())
            }
        }
    }

    /// Always ends signed out, even if the backend call fails.
    pub async fn logout(&self) -> Result<(), HookError> {
        self.start();
        let result = self.client.logout().await;
        let mut state = self.state.lock().unwrap();
        state.loading = false;
        state.user = None;
        if let Err(e) = &result {
            state.error = Some(e.to_string());
        }
        Ok(result?)
    }

    /// Pass errors from other stores through here. An expired session
    /// signs the user out locally; returns whether it did.
    pub fn note_error(&self, error: &HookError) -> bool {
        if !error.is_session_expired() {
            return false;
        }
        tracing::info!("session expired, signing out");
        let mut state = self.state.lock().unwrap();
        state.user = None;
        state.error = None;
        true
    }
}
