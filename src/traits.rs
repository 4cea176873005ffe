use async_trait::async_trait;

use crate::document::Document;
use crate::error::BoxError;
use crate::event::{Event, EventId};
use crate::feedback::Feedback;

/// A document database that is reached over the network
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Returns every document of a collection, ordered by their `date` field (ascending)
    async fn query_ordered_by_date(&self, collection: &str) -> Result<Vec<Document>, BoxError>;
    /// Upsert every document (by its ID) in a single atomic write
    async fn commit_batch(&mut self, collection: &str, documents: Vec<Document>) -> Result<(), BoxError>;
    /// Delete a single document
    async fn delete(&mut self, collection: &str, id: &EventId) -> Result<(), BoxError>;
}

/// An on-device key-value store, used when the remote store is unreachable, and as a backup otherwise
pub trait LocalStore: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if there is none yet
    fn get(&self, key: &str) -> Result<Option<String>, BoxError>;
    /// Replace the blob stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), BoxError>;
}

/// Decides where a timeline is loaded from and saved to.
///
/// Nothing here ever fails: errors are logged, and the ones the user should know about are raised as notices in `feedback`
#[async_trait]
pub trait EventGateway: Send {
    /// Returns the stored collection (or an empty one if nothing could be read)
    async fn load(&mut self, feedback: &mut Feedback) -> Vec<Event>;
    /// Persist the whole collection
    async fn save(&mut self, events: &[Event], feedback: &mut Feedback);
    /// Delete an event from the remote store, if there is one
    async fn delete_remote(&mut self, id: &EventId, feedback: &mut Feedback);
}
