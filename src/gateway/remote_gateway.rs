use async_trait::async_trait;

use crate::document::Document;
use crate::error::PersistenceError;
use crate::event::{Event, EventId};
use crate::feedback::{Feedback, Notice};
use crate::traits::{EventGateway, LocalStore, RemoteStore};

use super::LocalGateway;


/// A gateway that persists to a remote store, and falls back to a local store whenever the remote store fails.
///
/// Successful remote saves are also mirrored to the local store, as a backup.
#[derive(Debug)]
pub struct RemoteGateway<R: RemoteStore, S: LocalStore> {
    remote: R,
    local: LocalGateway<S>,
    collection: String,
}

impl<R: RemoteStore, S: LocalStore> RemoteGateway<R, S> {
    /// Create a gateway that uses the configured [`COLLECTION_NAME`](crate::config::COLLECTION_NAME)
    pub fn new(remote: R, local: LocalGateway<S>) -> Self {
        Self::new_with_collection(remote, local, crate::config::collection_name())
    }

    pub fn new_with_collection(remote: R, local: LocalGateway<S>, collection: String) -> Self {
        Self { remote, local, collection }
    }

    pub fn remote(&self) -> &R { &self.remote }
    pub fn local(&self) -> &LocalGateway<S> { &self.local }
    pub fn collection(&self) -> &str { &self.collection }
}

#[async_trait]
impl<R: RemoteStore, S: LocalStore> EventGateway for RemoteGateway<R, S> {
    async fn load(&mut self, feedback: &mut Feedback) -> Vec<Event> {
        match self.remote.query_ordered_by_date(&self.collection).await {
            Ok(documents) => {
                let mut events = Vec::with_capacity(documents.len());
                for doc in documents {
                    match doc.to_event() {
                        Some(event) => events.push(event),
                        None => feedback.warn(&format!("Remote document {} has no valid date or title, ignoring it", doc.id())),
                    }
                }
                feedback.info(&format!("Loaded {} events from the remote store", events.len()));
                events
            },
            Err(err) => {
                let err = PersistenceError::RemoteOperationFailed(err);
                feedback.warn(&format!("Unable to load from the remote store, falling back to the local store: {}", err));
                // The remote failure was the real problem, so a local failure here is only logged
                match self.local.read() {
                    Ok(events) => events,
                    Err(local_err) => {
                        feedback.warn(&format!("The local store also failed: {}", local_err));
                        Vec::new()
                    },
                }
            },
        }
    }

    async fn save(&mut self, events: &[Event], feedback: &mut Feedback) {
        let documents = events.iter()
            .map(Document::from_event)
            .collect();

        match self.remote.commit_batch(&self.collection, documents).await {
            Ok(()) => {
                feedback.info(&format!("Saved {} events to the remote store", events.len()));
                if let Err(err) = self.local.write(events) {
                    feedback.warn(&format!("Local store backup failed: {}", err));
                }
            },
            Err(err) => {
                let err = PersistenceError::RemoteOperationFailed(err);
                feedback.warn(&format!("Unable to save to the remote store, saving to the local store: {}", err));
                if let Err(local_err) = self.local.write(events) {
                    feedback.warn(&format!("The local store also failed: {}", local_err));
                    feedback.notify(Notice::SaveFailed);
                }
            },
        }
    }

    async fn delete_remote(&mut self, id: &EventId, feedback: &mut Feedback) {
        match self.remote.delete(&self.collection, id).await {
            Ok(()) => feedback.info(&format!("Event {} deleted from the remote store", id)),
            Err(err) => {
                let err = PersistenceError::RemoteOperationFailed(err);
                feedback.warn(&format!("Unable to delete {} from the remote store: {}", id, err));
            },
        }
    }
}
