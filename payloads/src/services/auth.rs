use crate::api_client::{APIClient, Auth, ClientError};
use crate::responses::User;
use crate::session::Session;
use crate::{requests, responses};

use super::data;

impl APIClient {
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let _status: String =
            data(self.get("health_check", Auth::None).await?)?;
        Ok(())
    }

    /// Create an account and persist the returned session.
    pub async fn register(
        &self,
        details: &requests::RegisterAccount,
    ) -> Result<Session, ClientError> {
        let reply = self.post("auth/register", details, Auth::None).await?;
        let session: Session = data(reply)?;
        self.session.set(&session)?;
        Ok(session)
    }

    /// Log in and persist the returned session.
    pub async fn login(
        &self,
        credentials: &requests::LoginCredentials,
    ) -> Result<Session, ClientError> {
        let reply = self.post("auth/login", credentials, Auth::None).await?;
        let session: Session = data(reply)?;
        self.session.set(&session)?;
        Ok(session)
    }

    /// Revoke the token on the backend and clear the local session. The
    /// local session is cleared even if the backend call fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self
            .post::<responses::Envelope<()>, _>(
                "auth/logout",
                &(),
                Auth::Required,
            )
            .await;
        self.session.clear()?;
        match result {
            Ok(_) | Err(ClientError::SessionExpired(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// The user the current token belongs to.
    pub async fn current_user(&self) -> Result<User, ClientError> {
        data(self.get("auth/me", Auth::Required).await?)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}
