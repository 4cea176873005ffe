use async_trait::async_trait;

use crate::error::PersistenceError;
use crate::event::{Event, EventId};
use crate::feedback::{Feedback, Notice};
use crate::traits::{EventGateway, LocalStore};


/// A gateway that only uses the local store.
///
/// This is what is used when no remote store is available, and what a [`RemoteGateway`](super::RemoteGateway) falls back to.
#[derive(Debug)]
pub struct LocalGateway<S: LocalStore> {
    store: S,
    key: String,
}

impl<S: LocalStore> LocalGateway<S> {
    /// Create a gateway that stores the collection under the configured [`STORAGE_KEY`](crate::config::STORAGE_KEY)
    pub fn new(store: S) -> Self {
        Self::new_with_key(store, crate::config::storage_key())
    }

    pub fn new_with_key(store: S, key: String) -> Self {
        Self { store, key }
    }

    pub fn store(&self) -> &S { &self.store }
    pub fn key(&self) -> &str { &self.key }

    /// Read and parse the stored collection. Invalid entries are dropped
    pub fn read(&self) -> Result<Vec<Event>, PersistenceError> {
        let blob = self.store.get(&self.key)
            .map_err(PersistenceError::LocalStoreFailed)?;
        match blob {
            None => Ok(Vec::new()),
            Some(blob) => Ok(crate::event::parse_collection(&blob)?),
        }
    }

    /// Replace the stored collection
    pub fn write(&mut self, events: &[Event]) -> Result<(), PersistenceError> {
        let blob = crate::event::serialize_collection(events)
            .map_err(|err| PersistenceError::LocalStoreFailed(err.into()))?;
        self.store.set(&self.key, &blob)
            .map_err(PersistenceError::LocalStoreFailed)
    }

    /// Read the stored collection. In case of failure, the user is notified and an empty collection is returned
    pub fn read_or_notify(&self, feedback: &mut Feedback) -> Vec<Event> {
        match self.read() {
            Ok(events) => {
                feedback.debug(&format!("Loaded {} events from the local store", events.len()));
                events
            },
            Err(err) => {
                feedback.warn(&format!("Unable to load timeline events from the local store: {}", err));
                feedback.notify(Notice::LoadFailed);
                Vec::new()
            },
        }
    }

    /// Write the collection. In case of failure, the user is notified
    pub fn write_or_notify(&mut self, events: &[Event], feedback: &mut Feedback) {
        if let Err(err) = self.write(events) {
            feedback.warn(&format!("Unable to save timeline events to the local store: {}", err));
            feedback.notify(Notice::SaveFailed);
        }
    }
}

#[async_trait]
impl<S: LocalStore> EventGateway for LocalGateway<S> {
    async fn load(&mut self, feedback: &mut Feedback) -> Vec<Event> {
        self.read_or_notify(feedback)
    }

    async fn save(&mut self, events: &[Event], feedback: &mut Feedback) {
        self.write_or_notify(events, feedback)
    }

    async fn delete_remote(&mut self, id: &EventId, feedback: &mut Feedback) {
        feedback.debug(&format!("No remote store to delete {} from", id));
    }
}
