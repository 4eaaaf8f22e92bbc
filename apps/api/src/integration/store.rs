//! Single-slot session store. Opening a session discards whichever one was open.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::integration::session::{KeywordEditSession, SessionError};

#[derive(Clone, Default)]
pub struct SessionStore {
    slot: Arc<Mutex<Option<KeywordEditSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `session`, replacing any open one. Returns the new session's id.
    pub async fn open(&self, session: KeywordEditSession) -> Uuid {
        let id = session.id();
        let mut slot = self.slot.lock().await;
        if let Some(previous) = slot.replace(session) {
            info!(previous = %previous.id(), "Discarding open keyword session");
        }
        id
    }

    /// Runs `f` against the open session if it has the given id.
    ///
    /// The lock is held only for the duration of `f`, which must not await.
    pub async fn with_session<T, F>(&self, id: Uuid, f: F) -> Result<T, SessionError>
    where
        F: FnOnce(&mut KeywordEditSession) -> Result<T, SessionError>,
    {
        let mut slot = self.slot.lock().await;
        match slot.as_mut() {
            Some(session) if session.id() == id => f(session),
            _ => Err(SessionError::NotFound(id)),
        }
    }

    /// Runs `f` against the open session and, if it succeeds, clears the slot under the
    /// same lock. A failed `f` leaves the session open.
    pub async fn consume<T, F>(&self, id: Uuid, f: F) -> Result<T, SessionError>
    where
        F: FnOnce(&KeywordEditSession) -> Result<T, SessionError>,
    {
        let mut slot = self.slot.lock().await;
        let value = match slot.as_ref() {
            Some(session) if session.id() == id => f(session)?,
            _ => return Err(SessionError::NotFound(id)),
        };
        *slot = None;
        Ok(value)
    }

    /// Drops the session with the given id.
    pub async fn close(&self, id: Uuid) -> Result<(), SessionError> {
        let mut slot = self.slot.lock().await;
        match slot.as_ref() {
            Some(session) if session.id() == id => {
                *slot = None;
                Ok(())
            }
            _ => Err(SessionError::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> KeywordEditSession {
        KeywordEditSession::open("EXPERIENCE\nAcme - 2020\n• Built the billing system\n", "Rust")
            .unwrap()
    }

    #[tokio::test]
    async fn test_opening_replaces_previous_session() {
        let store = SessionStore::new();
        let first = store.open(session()).await;
        let second = store.open(session()).await;
        assert_ne!(first, second);

        let err = store.with_session(first, |s| Ok(s.id())).await.unwrap_err();
        assert_eq!(err, SessionError::NotFound(first));
        assert_eq!(store.with_session(second, |s| Ok(s.id())).await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_close_removes_session() {
        let store = SessionStore::new();
        let id = store.open(session()).await;
        store.close(id).await.unwrap();
        assert!(store.close(id).await.is_err());
        assert!(store.with_session(id, |_| Ok(())).await.is_err());
    }

    #[tokio::test]
    async fn test_mutations_persist_between_calls() {
        let store = SessionStore::new();
        let id = store.open(session()).await;
        store.with_session(id, |s| s.select_item(0)).await.unwrap();
        let step = store.with_session(id, |s| Ok(s.view().step)).await.unwrap();
        assert_eq!(step, crate::integration::session::EditStep::SelectAction);
    }

    #[tokio::test]
    async fn test_consume_clears_slot_only_on_success() {
        let store = SessionStore::new();
        let id = store.open(session()).await;

        let err = store
            .consume(id, |_| Err::<(), _>(SessionError::ApplyDisabled))
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::ApplyDisabled);
        assert!(store.with_session(id, |_| Ok(())).await.is_ok());

        let value = store.consume(id, |s| Ok(s.id())).await.unwrap();
        assert_eq!(value, id);
        assert_eq!(
            store.with_session(id, |_| Ok(())).await.unwrap_err(),
            SessionError::NotFound(id)
        );
    }
}
