//! Abstract interface for concurrent state-holding views.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod id;

pub use id::ViewId;

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;

/// Marker trait for `View` errors
pub trait ViewError: Debug + Error + Send + Sync + 'static {}

/// The pluggable behaviour of a view: how its data is read and how it is
/// replaced by a write.
///
/// Both methods are expected to be total. A panic inside either one is
/// fatal to the view that called it.
pub trait ViewKind: Send + Sync + 'static {
    /// The data owned by a view of this kind.
    type Data: Clone + Send + 'static;

    /// Arguments carried by a read request.
    ///
    /// Reads produce no return value, so this usually names where the
    /// result should be delivered (e.g. a oneshot sender).
    type ReadArgs: Send + 'static;

    /// Arguments carried by a write request.
    ///
    /// Write arguments are cloned into snapshots so they can be replayed
    /// on a duplicate.
    type WriteArgs: Clone + Debug + Send + 'static;

    /// Observes `data`. Cannot change it.
    fn read(&self, data: &Self::Data, args: Self::ReadArgs);

    /// Consumes `data` and returns its full replacement.
    fn write(&self, data: Self::Data, args: Self::WriteArgs) -> Self::Data;
}

/// The coordinator that owns a view and is notified of its progress.
///
/// Notifications are one-way and must not block: a view calls them from its
/// scheduling loop.
pub trait Monitor: Clone + Send + Sync + 'static {
    /// Opaque token labelling an update round. Echoed back unchanged in
    /// [`Monitor::update_finished`].
    type Tag: Clone + Debug + Send + 'static;

    /// Called once when the view is ready to accept requests.
    fn startup_finished(&self, view: ViewId);

    /// Called after each serviced read.
    fn read_finished(&self);

    /// Called when the update round labelled `tag` has drained its writes.
    fn update_finished(&self, tag: Self::Tag);
}

/// No-op monitor for views nobody needs to observe.
impl Monitor for () {
    type Tag = ();

    fn startup_finished(&self, _view: ViewId) {}

    fn read_finished(&self) {}

    fn update_finished(&self, _tag: Self::Tag) {}
}

/// A handle to a running view.
///
/// All operations except [`View::duplicate`] are fire-and-forget: they
/// enqueue a request and return without waiting for it to be processed.
#[async_trait]
pub trait View
where
    Self: Clone + Send + Sync + 'static,
{
    /// The behaviour of the view.
    type Kind: ViewKind;

    /// The monitor notified by the view.
    type Monitor: Monitor;

    /// The error type for view operations.
    type Error: ViewError;

    /// The identity of the view behind this handle.
    fn id(&self) -> ViewId;

    /// Requests termination. Requests still queued behind the stop are
    /// discarded.
    ///
    /// # Errors
    ///
    /// Fails if the view has already terminated.
    fn stop(&self) -> Result<(), Self::Error>;

    /// Enqueues a read. The result is delivered by [`ViewKind::read`].
    ///
    /// # Errors
    ///
    /// Fails if the view has already terminated.
    fn read(&self, args: <Self::Kind as ViewKind>::ReadArgs) -> Result<(), Self::Error>;

    /// Enqueues a write. It is applied during the next update round.
    ///
    /// # Errors
    ///
    /// Fails if the view has already terminated.
    fn write(&self, args: <Self::Kind as ViewKind>::WriteArgs) -> Result<(), Self::Error>;

    /// Opens an update round labelled `tag`.
    ///
    /// # Errors
    ///
    /// Fails if the view has already terminated.
    fn start_update(&self, tag: <Self::Monitor as Monitor>::Tag) -> Result<(), Self::Error>;

    /// Clones the running view into a new, independent view.
    ///
    /// The new view's data is the source's data with every write that was
    /// queued but not yet applied replayed on top, in arrival order. The
    /// source is left untouched.
    async fn duplicate(&self) -> Result<Self, Self::Error>;
}
