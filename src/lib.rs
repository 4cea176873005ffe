//! This crate persists a timeline of dated events ("memories").
//!
//! Events are kept in a remote document database (see the [`firestore`] module) when one is available, and in a local key-value store (see the [`storage`] module) otherwise.
//!
//! A [`Gateway`](gateway::Gateway) picks the right store for every operation, and falls back to the local store whenever the remote store fails. Successful remote saves are also mirrored locally, as a backup. \
//! A [`Timeline`] owns the in-memory collection, persists it through its gateway after every change, and asks a [`TimelineView`](view::TimelineView) to display it.

pub mod traits;
pub mod error;
pub mod config;
pub mod feedback;

mod event;
pub use event::{Event, EventDraft, EventId};
pub use event::{parse_collection, serialize_collection, DATE_FORMAT};
pub mod document;

pub mod gateway;
pub use gateway::Gateway;
pub mod timeline;
pub use timeline::Timeline;
pub mod view;

pub mod firestore;
pub mod storage;
pub mod mock;

pub mod utils;

/// A gateway between a Firestore database and a local folder, which is what most apps want
pub type FirestoreGateway = Gateway<firestore::FirestoreClient, storage::FileStore>;
