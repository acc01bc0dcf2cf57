use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

/// In-process fan-out hub: one public group plus lazily created per-user
/// private groups.
///
/// Messages are pre-serialized JSON strings; a slow consumer only lags its
/// own receiver.
#[derive(Clone)]
pub struct Hub {
    public: broadcast::Sender<String>,
    users: Arc<RwLock<HashMap<Uuid, broadcast::Sender<String>>>>,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl Hub {
    pub fn new() -> Self {
        let (public, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            public,
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn subscribe_public(&self) -> broadcast::Receiver<String> {
        self.public.subscribe()
    }

    pub fn subscribe_user(&self, user_id: Uuid) -> broadcast::Receiver<String> {
        let mut users = self.users.write().unwrap();
        users
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Returns the number of sessions the message reached.
    pub fn publish_public(&self, message: String) -> usize {
        self.public.send(message).unwrap_or(0)
    }

    /// Returns the number of sessions the message reached.
    pub fn publish_user(&self, user_id: Uuid, message: String) -> usize {
        let users = self.users.read().unwrap();
        match users.get(&user_id) {
            Some(tx) => tx.send(message).unwrap_or(0),
            None => 0,
        }
    }

    /// Drop a user's group once its last receiver is gone.
    pub fn prune(&self, user_id: Uuid) {
        let mut users = self.users.write().unwrap();
        if let Some(tx) = users.get(&user_id) {
            if tx.receiver_count() == 0 {
                users.remove(&user_id);
            }
        }
    }
}
