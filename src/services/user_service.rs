use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    errors::AppResult,
    models::domain::User,
    repositories::{KeyValueStore, USER_KEY},
};

/// The locally remembered signed-in user. There is no password check; the
/// identifier only labels the session.
pub struct UserService {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Option<User>>,
}

impl UserService {
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let current = match store.get(USER_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw)
                .map_err(|e| log::error!("Failed to parse stored user: {}", e))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                log::error!("Failed to read stored user: {}", e);
                None
            }
        };

        Self {
            store,
            current: RwLock::new(current),
        }
    }

    pub async fn sign_in(&self, identifier: &str) -> AppResult<User> {
        let user = User::new(identifier)?;
        *self.current.write().await = Some(user.clone());

        let saved = match serde_json::to_string(&user) {
            Ok(raw) => self.store.set(USER_KEY, &raw).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = saved {
            log::error!("Failed to save user: {}", e);
        }

        log::info!("Signed in {}", user.identifier);
        Ok(user)
    }

    pub async fn current(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    pub async fn sign_out(&self) {
        *self.current.write().await = None;
        if let Err(e) = self.store.remove(USER_KEY).await {
            log::error!("Failed to remove user: {}", e);
        }
    }
}
