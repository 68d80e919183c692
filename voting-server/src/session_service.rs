use crate::{
    authorization_gateway::AuthorizationGateway, broadcast_hub::BroadcastHub,
    errors::service_error::ServiceError, models::voting_session::VotingSession,
    session_store::SessionStore,
};
use log::info;
use std::sync::Arc;

/// Use cases behind the `/sessions` endpoints. Mutations are authorized first,
/// applied to the store, then published once the store has released the
/// session.
pub struct SessionService {
    gateway: Arc<AuthorizationGateway>,
    store: Arc<SessionStore>,
    hub: Arc<BroadcastHub>,
}

impl SessionService {
    pub fn new(
        gateway: Arc<AuthorizationGateway>,
        store: Arc<SessionStore>,
        hub: Arc<BroadcastHub>,
    ) -> Self {
        SessionService {
            gateway,
            store,
            hub,
        }
    }

    pub async fn create_session(
        &self,
        credential: Option<&str>,
        name: String,
    ) -> Result<VotingSession, ServiceError> {
        let username = self.gateway.authorize(credential).await?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::MalformedInput(String::from(
                "Session name can't be empty",
            )));
        }

        let session = self
            .store
            .create(name.to_string())
            .await
            .map_err(ServiceError::StorageFailure)?;

        info!("{username} created session {}", session.id);
        self.hub.publish(&session);
        Ok(session)
    }

    pub async fn cast_vote(
        &self,
        credential: Option<&str>,
        id: &str,
        choice: bool,
    ) -> Result<VotingSession, ServiceError> {
        let username = self.gateway.authorize(credential).await?;
        let session = self.store.cast_vote(id, &username, choice).await?;

        info!("{username} cast a vote on session {id}");
        self.hub.publish(&session);
        Ok(session)
    }

    pub async fn get_session(&self, id: &str) -> Result<VotingSession, ServiceError> {
        Ok(self.store.get(id).await?)
    }

    pub fn list_sessions(&self) -> Vec<VotingSession> {
        self.store.list()
    }
}
