//! Canonical in-memory registry of voting sessions.
//!
//! The mapping sits behind a std mutex that is only held for synchronous map
//! work and holds the last committed snapshot of every session. Each session
//! additionally has its own async gate serializing the vote path (check,
//! persist, commit), so a vote on one session never waits on the durable write
//! of another and readers never wait on either. A mutation only reaches the
//! mapping after the durable store accepted it.

use crate::{
    errors::{store_error::StoreError, vote_error::VoteError},
    models::voting_session::VotingSession,
};
use guid_create::GUID;
use key_value_store::KeyValueStore;
use log::{error, info, trace};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::sync::Mutex as VoteGate;

pub mod key_value_store;
pub mod redis_store;
mod vote_ledger;

struct Entry {
    committed: VotingSession,
    gate: Arc<VoteGate<()>>,
}

#[derive(Default)]
struct Registry {
    sessions: HashMap<String, Entry>,
    order: Vec<String>,
    /// Ids handed out by `create` whose durable write has not finished yet.
    reserved: HashSet<String>,
}

pub struct SessionStore {
    registry: Mutex<Registry>,
    durable: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(durable: Arc<dyn KeyValueStore>) -> Self {
        SessionStore {
            registry: Mutex::new(Registry::default()),
            durable,
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates an empty session under a freshly generated id.
    pub async fn create(&self, name: String) -> Result<VotingSession, StoreError> {
        let session = VotingSession::new(self.reserve_id(), name);

        if let Err(error) = self.persist(&session).await {
            self.registry().reserved.remove(&session.id);
            return Err(error);
        }

        {
            let mut registry = self.registry();
            registry.reserved.remove(&session.id);
            registry.order.push(session.id.clone());
            registry.sessions.insert(
                session.id.clone(),
                Entry {
                    committed: session.clone(),
                    gate: Arc::new(VoteGate::new(())),
                },
            );
        }

        info!("Created session {} ({})", session.id, session.name);
        Ok(session)
    }

    /// Point lookup through the durable store.
    pub async fn get(&self, id: &str) -> Result<VotingSession, StoreError> {
        let Some(value) = self.durable.get(id).await? else {
            return Err(StoreError::NotFound(id.to_string()));
        };

        serde_json::from_str(&value).map_err(|source| StoreError::Malformed {
            id: id.to_string(),
            source,
        })
    }

    /// Committed snapshot of every session in creation order.
    pub fn list(&self) -> Vec<VotingSession> {
        let registry = self.registry();
        registry
            .order
            .iter()
            .filter_map(|id| registry.sessions.get(id))
            .map(|entry| entry.committed.clone())
            .collect()
    }

    pub async fn cast_vote(
        &self,
        id: &str,
        voter: &str,
        choice: bool,
    ) -> Result<VotingSession, VoteError> {
        let gate = self
            .registry()
            .sessions
            .get(id)
            .map(|entry| entry.gate.clone())
            .ok_or_else(|| VoteError::SessionNotFound(id.to_string()))?;
        let _turn = gate.lock().await;

        let candidate = {
            let registry = self.registry();
            let entry = registry
                .sessions
                .get(id)
                .ok_or_else(|| VoteError::SessionNotFound(id.to_string()))?;
            vote_ledger::stage_vote(&entry.committed, voter, choice)?
        };

        self.persist(&candidate).await?;

        if let Some(entry) = self.registry().sessions.get_mut(id) {
            entry.committed = candidate.clone();
        }

        trace!("{voter} voted {choice} on {id}");
        Ok(candidate)
    }

    async fn persist(&self, session: &VotingSession) -> Result<(), StoreError> {
        let value = session.to_json().map_err(StoreError::Serialize)?;
        self.durable.set(&session.id, value).await.inspect_err(|error| {
            error!("Could not persist session {}: {error}", session.id);
        })
    }

    fn reserve_id(&self) -> String {
        let mut registry = self.registry();
        loop {
            let id = session_id();
            if !registry.sessions.contains_key(&id) && !registry.reserved.contains(&id) {
                registry.reserved.insert(id.clone());
                return id;
            }
        }
    }
}

/// Random GUID stamped as an RFC 4122 version 4 UUID, lowercase.
fn session_id() -> String {
    let random = GUID::rand();
    let mut tail = random.data4();
    tail[0] = (tail[0] & 0x3f) | 0x80;

    GUID::build_from_components(
        random.data1(),
        random.data2(),
        (random.data3() & 0x0fff) | 0x4000,
        &tail,
    )
    .to_string()
    .to_lowercase()
}
