//! This module decides where a timeline is persisted
//!
//! A [`Gateway`] is either a [`LocalGateway`] (when no remote store is available) or a [`RemoteGateway`], that falls back to its own `LocalGateway` in case of failure.

mod local_gateway;
mod remote_gateway;

pub use local_gateway::LocalGateway;
pub use remote_gateway::RemoteGateway;

use async_trait::async_trait;

use crate::error::PersistenceError;
use crate::event::{Event, EventId};
use crate::feedback::Feedback;
use crate::traits::{EventGateway, LocalStore, RemoteStore};


/// The gateway that matches the available stores
#[derive(Debug)]
pub enum Gateway<R: RemoteStore, S: LocalStore> {
    Local(LocalGateway<S>),
    Remote(RemoteGateway<R, S>),
}

impl<R: RemoteStore, S: LocalStore> Gateway<R, S> {
    /// Use `remote` when there is one, and only `local` otherwise
    pub fn select(remote: Option<R>, local: S) -> Self {
        let local = LocalGateway::new(local);
        match remote {
            Some(remote) => Gateway::Remote(RemoteGateway::new(remote, local)),
            None => {
                log::debug!("{}, using the local store only", PersistenceError::RemoteUnavailable);
                Gateway::Local(local)
            },
        }
    }

    pub fn is_remote(&self) -> bool {
        match self {
            Gateway::Remote(_) => true,
            Gateway::Local(_) => false,
        }
    }
}

#[async_trait]
impl<R: RemoteStore, S: LocalStore> EventGateway for Gateway<R, S> {
    async fn load(&mut self, feedback: &mut Feedback) -> Vec<Event> {
        match self {
            Gateway::Local(g) => g.load(feedback).await,
            Gateway::Remote(g) => g.load(feedback).await,
        }
    }

    async fn save(&mut self, events: &[Event], feedback: &mut Feedback) {
        match self {
            Gateway::Local(g) => g.save(events, feedback).await,
            Gateway::Remote(g) => g.save(events, feedback).await,
        }
    }

    async fn delete_remote(&mut self, id: &EventId, feedback: &mut Feedback) {
        match self {
            Gateway::Local(g) => g.delete_remote(id, feedback).await,
            Gateway::Remote(g) => g.delete_remote(id, feedback).await,
        }
    }
}
