//! Live-update fan-out.
//!
//! Every subscriber owns a bounded queue drained by its own writer task, so a
//! publish only hands frames to queues and never waits on a socket. A queue
//! that is closed (the writer stopped after a failed write or a disconnect) or
//! full is dropped from the set during the publish that notices it.

use crate::models::voting_session::VotingSession;
use log::{error, info, trace, warn};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::mpsc::{self, error::TrySendError};

pub type SubscriberId = u64;

pub struct Subscription {
    id: SubscriberId,
    frames: mpsc::Receiver<Arc<str>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Waits for the next pushed frame. `None` once the hub dropped this
    /// subscriber.
    pub async fn next_frame(&mut self) -> Option<Arc<str>> {
        self.frames.recv().await
    }

    pub fn try_next_frame(&mut self) -> Option<Arc<str>> {
        self.frames.try_recv().ok()
    }
}

pub struct BroadcastHub {
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<Arc<str>>>>,
    next_id: AtomicU64,
    queue_capacity: usize,
}

impl BroadcastHub {
    pub fn new(queue_capacity: usize) -> Self {
        BroadcastHub {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            queue_capacity: queue_capacity.max(1),
        }
    }

    fn subscribers(&self) -> MutexGuard<'_, HashMap<SubscriberId, mpsc::Sender<Arc<str>>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a subscriber. Only changes published after this call are
    /// delivered.
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        self.subscribers().insert(id, tx);

        trace!("Subscriber {id} registered");
        Subscription { id, frames: rx }
    }

    /// Serializes `session` once and queues it for every subscriber. Returns
    /// how many subscribers accepted the frame.
    pub fn publish(&self, session: &VotingSession) -> usize {
        let frame: Arc<str> = match session.to_json() {
            Ok(json) => json.into(),
            Err(error) => {
                error!("Could not serialize session {}: {error}", session.id);
                return 0;
            }
        };

        let mut subscribers = self.subscribers();
        subscribers.retain(|id, queue| match queue.try_send(frame.clone()) {
            Ok(()) => true,
            Err(TrySendError::Closed(_)) => {
                info!("Subscriber {id} disconnected, removing it");
                false
            }
            Err(TrySendError::Full(_)) => {
                warn!("Subscriber {id} is not keeping up, removing it");
                false
            }
        });

        trace!(
            "Published session {} to {} subscribers",
            session.id,
            subscribers.len()
        );
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers().len()
    }
}
