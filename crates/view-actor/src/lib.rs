//! Tokio implementation of views: each view is a task that owns its data and
//! drains an unbounded request queue.
//!
//! Reads and state requests are always served before an update round is
//! opened. Writes only accumulate until [`View::start_update`] opens a round,
//! which applies every write already queued and then notifies the monitor.
//!
//! # Example
//! ```rust
//! use tokio::sync::oneshot;
//! use proven_view_actor::{ActorView, ChannelMonitor, MonitorEvent, View, ViewKind};
//!
//! struct Stack;
//!
//! impl ViewKind for Stack {
//!     type Data = Vec<u32>;
//!     type ReadArgs = oneshot::Sender<Vec<u32>>;
//!     type WriteArgs = u32;
//!
//!     fn read(&self, data: &Self::Data, reply: Self::ReadArgs) {
//!         let _ = reply.send(data.clone());
//!     }
//!
//!     fn write(&self, mut data: Self::Data, value: Self::WriteArgs) -> Self::Data {
//!         data.insert(0, value);
//!         data
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (monitor, mut events) = ChannelMonitor::new();
//!     let view = ActorView::spawn(Stack, monitor, Vec::new());
//!
//!     view.write(1).unwrap();
//!     view.write(2).unwrap();
//!     view.start_update("first").unwrap();
//!
//!     while let Some(event) = events.recv().await {
//!         if event == MonitorEvent::UpdateFinished("first") {
//!             break;
//!         }
//!     }
//!
//!     let (reply, data) = oneshot::channel();
//!     view.read(reply).unwrap();
//!     assert_eq!(data.await.unwrap(), vec![2, 1]);
//! }
//! ```
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod config;
mod error;
mod mailbox;
mod monitor;
mod request;
mod snapshot;
mod worker;

pub use config::ViewConfig;
pub use error::Error;
pub use monitor::{ChannelMonitor, MonitorEvent};
pub use request::PendingRequest;
pub use snapshot::{PendingRequests, Snapshot};
pub use proven_view::{Monitor, View, ViewId, ViewKind};

use mailbox::Mailbox;
use request::{Control, Query, Request};
use worker::ViewWorker;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{Instrument, debug, info_span};

/// Handle to a view running as a tokio task.
///
/// Handles are cheap to clone. Requests sent through one handle are
/// considered in send order.
pub struct ActorView<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    id: ViewId,
    config: ViewConfig,
    sender: mpsc::UnboundedSender<Request<K, M>>,
}

impl<K, M> ActorView<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    /// Spawns a view with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn spawn(kind: K, monitor: M, data: K::Data) -> Self {
        Self::spawn_with_config(kind, monitor, data, ViewConfig::default())
    }

    /// Spawns a view with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn spawn_with_config(kind: K, monitor: M, data: K::Data, config: ViewConfig) -> Self {
        Self::spawn_shared(Arc::new(kind), monitor, data, config)
    }

    /// Spawns a view whose behaviour is shared with other views.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn spawn_shared(kind: Arc<K>, monitor: M, data: K::Data, config: ViewConfig) -> Self {
        let id = ViewId::new();
        let (sender, receiver) = mpsc::unbounded_channel();

        let worker = ViewWorker::new(id, kind, monitor, Mailbox::new(receiver), config.clone());
        tokio::spawn(worker.run(data).instrument(info_span!("view", %id)));

        Self { id, config, sender }
    }

    /// The configuration this view was spawned with.
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Returns `true` once the view task has terminated.
    pub fn is_stopped(&self) -> bool {
        self.sender.is_closed()
    }

    /// Waits until the view task has terminated.
    pub async fn stopped(&self) {
        self.sender.closed().await;
    }

    /// Requests the view's state and every request it has queued but not
    /// yet consumed.
    ///
    /// The wait is bounded by [`ViewConfig::duplicate_timeout`] when set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stopped`] if the view has already terminated,
    /// [`Error::SourceStopped`] if it terminates before answering, and
    /// [`Error::Timeout`] if the configured timeout elapses first.
    pub async fn snapshot(&self) -> Result<Snapshot<K, M>, Error> {
        let (destination, response) = oneshot::channel();
        self.send(Request::Query(Query::GetState(destination)))?;

        let response = match self.config.duplicate_timeout {
            Some(duration) => timeout(duration, response)
                .await
                .map_err(|_| Error::Timeout {
                    millis: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
                })?,
            None => response.await,
        };

        response.map_err(|_| Error::SourceStopped)
    }

    fn send(&self, request: Request<K, M>) -> Result<(), Error> {
        self.sender.send(request).map_err(|_| Error::Stopped)
    }
}

#[async_trait]
impl<K, M> View for ActorView<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    type Kind = K;
    type Monitor = M;
    type Error = Error;

    fn id(&self) -> ViewId {
        self.id
    }

    fn stop(&self) -> Result<(), Self::Error> {
        self.send(Request::Control(Control::Stop))
    }

    fn read(&self, args: K::ReadArgs) -> Result<(), Self::Error> {
        self.send(Request::Query(Query::Read(args)))
    }

    fn write(&self, args: K::WriteArgs) -> Result<(), Self::Error> {
        self.send(Request::Write(args))
    }

    fn start_update(&self, tag: M::Tag) -> Result<(), Self::Error> {
        self.send(Request::Control(Control::StartUpdate(tag)))
    }

    async fn duplicate(&self) -> Result<Self, Self::Error> {
        let snapshot = self.snapshot().await?;
        let replayed = snapshot.pending_writes();
        let data = snapshot.replay();

        let duplicate =
            Self::spawn_shared(snapshot.kind, snapshot.monitor, data, self.config.clone());

        debug!(
            source = %self.id,
            duplicate = %duplicate.id,
            replayed,
            "view duplicated"
        );

        Ok(duplicate)
    }
}

impl<K, M> Clone for ActorView<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            config: self.config.clone(),
            sender: self.sender.clone(),
        }
    }
}

impl<K, M> fmt::Debug for ActorView<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorView")
            .field("id", &self.id)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
