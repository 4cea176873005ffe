//! Stores that can be told to fail, so that fallbacks can be tested
//!
//! [`MockRemoteStore`] keeps its documents in memory and records every call it receives, [`MockLocalStore`] wraps a [`MemoryStore`].
//! Both obey a shared [`MockBehaviour`]. [`MockView`] records what a timeline asks its view to do.
#![cfg(any(test, feature = "mocks"))]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::document::Document;
use crate::error::BoxError;
use crate::event::{Event, EventId};
use crate::feedback::Notice;
use crate::storage::MemoryStore;
use crate::traits::{LocalStore, RemoteStore};
use crate::view::TimelineView;

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    // From the RemoteStore trait
    pub query_behaviour: (u32, u32),
    pub commit_behaviour: (u32, u32),
    pub delete_behaviour: (u32, u32),

    // From the LocalStore trait
    pub get_behaviour: (u32, u32),
    pub set_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            query_behaviour: (0, n_fails),
            commit_behaviour: (0, n_fails),
            delete_behaviour: (0, n_fails),
            get_behaviour: (0, n_fails),
            set_behaviour: (0, n_fails),
        }
    }

    /// Every action will fail, forever
    pub fn always_fail() -> Self {
        Self::fail_now(u32::MAX)
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_query(&mut self) -> Result<(), BoxError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.query_behaviour, "query")
    }
    pub fn can_commit(&mut self) -> Result<(), BoxError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.commit_behaviour, "commit")
    }
    pub fn can_delete(&mut self) -> Result<(), BoxError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_behaviour, "delete")
    }
    pub fn can_get(&mut self) -> Result<(), BoxError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_behaviour, "get")
    }
    pub fn can_set(&mut self) -> Result<(), BoxError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.set_behaviour, "set")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), BoxError> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}



/// A call received by a [`MockRemoteStore`]
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteCall {
    Query { collection: String },
    /// IDs of the committed documents, in order
    Commit { collection: String, ids: Vec<EventId> },
    Delete { collection: String, id: EventId },
}

/// A remote store that lives in memory.
///
/// Clones share the same documents, calls and behaviour, so that a test can keep a handle on a store given to a gateway
#[derive(Clone, Debug, Default)]
pub struct MockRemoteStore {
    /// (collection, document) pairs, in insertion order
    documents: Arc<Mutex<Vec<(String, Document)>>>,
    calls: Arc<Mutex<Vec<RemoteCall>>>,
    behaviour: Arc<Mutex<MockBehaviour>>,
}

impl MockRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour: Arc::new(Mutex::new(behaviour)),
            ..Self::default()
        }
    }

    /// Insert a document directly, as if another client had written it
    pub fn insert(&self, collection: &str, document: Document) {
        upsert(&mut lock(&self.documents), collection, document);
    }

    /// The documents of a collection, in insertion order
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        lock(&self.documents).iter()
            .filter(|(c, _)| c == collection)
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<RemoteCall> {
        lock(&self.calls).clone()
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        *lock(&self.behaviour) = behaviour;
    }
}

fn upsert(documents: &mut Vec<(String, Document)>, collection: &str, document: Document) {
    let existing = documents.iter_mut()
        .find(|(c, doc)| c == collection && doc.id() == document.id());
    match existing {
        Some((_, doc)) => *doc = document,
        None => documents.push((collection.to_string(), document)),
    }
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    async fn query_ordered_by_date(&self, collection: &str) -> Result<Vec<Document>, BoxError> {
        lock(&self.calls).push(RemoteCall::Query { collection: collection.to_string() });
        lock(&self.behaviour).can_query()?;

        let mut documents = self.documents(collection);
        // Dates are ISO strings, so that their lexical order is the chronological order
        documents.sort_by(|a, b| a.date_field().cmp(&b.date_field()));
        Ok(documents)
    }

    async fn commit_batch(&mut self, collection: &str, documents: Vec<Document>) -> Result<(), BoxError> {
        let ids = documents.iter().map(|doc| doc.id().clone()).collect();
        lock(&self.calls).push(RemoteCall::Commit { collection: collection.to_string(), ids });
        lock(&self.behaviour).can_commit()?;

        let mut stored = lock(&self.documents);
        for doc in documents {
            upsert(&mut stored, collection, doc);
        }
        Ok(())
    }

    async fn delete(&mut self, collection: &str, id: &EventId) -> Result<(), BoxError> {
        lock(&self.calls).push(RemoteCall::Delete { collection: collection.to_string(), id: id.clone() });
        lock(&self.behaviour).can_delete()?;

        lock(&self.documents).retain(|(c, doc)| !(c == collection && doc.id() == id));
        Ok(())
    }
}



/// A [`MemoryStore`] that obeys a [`MockBehaviour`]
#[derive(Clone, Debug, Default)]
pub struct MockLocalStore {
    inner: MemoryStore,
    behaviour: Arc<Mutex<MockBehaviour>>,
}

impl MockLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            inner: MemoryStore::new(),
            behaviour: Arc::new(Mutex::new(behaviour)),
        }
    }

    /// Returns what is stored under a key, regardless of the mocked behaviour
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.peek(key)
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        *lock(&self.behaviour) = behaviour;
    }
}

impl LocalStore for MockLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, BoxError> {
        lock(&self.behaviour).can_get()?;
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BoxError> {
        lock(&self.behaviour).can_set()?;
        self.inner.set(key, value)
    }
}



/// A call received by a [`MockView`]
#[derive(Clone, Debug, PartialEq)]
pub enum ViewCall {
    MaxDate(NaiveDate),
    FormEnabled,
    /// IDs of the rendered events, and the browsed year
    Render { ids: Vec<EventId>, year: i32 },
    Message(Notice),
}

/// A view that records every call it receives.
///
/// Clones share the same records
#[derive(Clone, Debug)]
pub struct MockView {
    has_form: bool,
    calls: Arc<Mutex<Vec<ViewCall>>>,
}

impl MockView {
    pub fn new() -> Self {
        Self { has_form: true, calls: Arc::new(Mutex::new(Vec::new())) }
    }

    /// A view that has no form, so that timelines refuse to initialize
    pub fn without_form() -> Self {
        Self { has_form: false, ..Self::new() }
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        lock(&self.calls).clone()
    }

    /// The messages shown so far
    pub fn messages(&self) -> Vec<Notice> {
        lock(&self.calls).iter()
            .filter_map(|call| match call {
                ViewCall::Message(notice) => Some(notice.clone()),
                _ => None,
            })
            .collect()
    }

    /// The latest render, if any
    pub fn last_render(&self) -> Option<(Vec<EventId>, i32)> {
        lock(&self.calls).iter()
            .rev()
            .find_map(|call| match call {
                ViewCall::Render { ids, year } => Some((ids.clone(), *year)),
                _ => None,
            })
    }
}

impl Default for MockView {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineView for MockView {
    fn has_form(&self) -> bool {
        self.has_form
    }

    fn set_max_date(&mut self, date: NaiveDate) {
        lock(&self.calls).push(ViewCall::MaxDate(date));
    }

    fn enable_form(&mut self) {
        lock(&self.calls).push(ViewCall::FormEnabled);
    }

    fn render(&mut self, events: &[Event], year: i32) {
        let ids = events.iter().map(|e| e.id().clone()).collect();
        lock(&self.calls).push(ViewCall::Render { ids, year });
    }

    fn show_message(&mut self, notice: &Notice) {
        lock(&self.calls).push(ViewCall::Message(notice.clone()));
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        assert!(ok.can_query().is_ok());
        assert!(ok.can_query().is_ok());
        assert!(ok.can_commit().is_ok());
        assert!(ok.can_set().is_ok());

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_query().is_err());
        assert!(now.can_commit().is_err());
        assert!(now.can_commit().is_err());
        assert!(now.can_query().is_err());
        assert!(now.can_query().is_ok());
        assert!(now.can_query().is_ok());
        assert!(now.can_commit().is_ok());

        let mut custom = MockBehaviour{
            query_behaviour: (0,1),
            set_behaviour: (1,3),
            ..MockBehaviour::default()
        };
        assert!(custom.can_query().is_err());
        assert!(custom.can_query().is_ok());
        assert!(custom.can_query().is_ok());
        assert!(custom.can_set().is_ok());
        assert!(custom.can_set().is_err());
        assert!(custom.can_set().is_err());
        assert!(custom.can_set().is_err());
        assert!(custom.can_set().is_ok());

        custom.set_behaviour = (0, 1);
        custom.suspend();
        assert!(custom.can_set().is_ok());
        custom.resume();
        assert!(custom.can_set().is_err());
    }

    #[tokio::test]
    async fn mock_remote_store_upserts_and_sorts() {
        use serde_json::{json, Map};

        let doc = |id: &str, date: &str| {
            let mut fields = Map::new();
            fields.insert("date".to_string(), json!(date));
            Document::new(EventId::from(id), fields)
        };

        let mut store = MockRemoteStore::new();
        store.commit_batch("c", vec![doc("b", "2021-01-01"), doc("a", "2020-01-01")]).await.unwrap();
        store.commit_batch("c", vec![doc("b", "2019-01-01")]).await.unwrap();
        store.insert("other", doc("z", "2000-01-01"));

        let ids: Vec<String> = store.query_ordered_by_date("c").await.unwrap()
            .iter().map(|d| d.id().to_string()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        store.delete("c", &EventId::from("b")).await.unwrap();
        assert_eq!(store.documents("c").len(), 1);
        assert_eq!(store.calls().len(), 4);
    }
}
