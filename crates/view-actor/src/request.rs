use crate::Snapshot;

use proven_view::{Monitor, ViewKind};
use tokio::sync::oneshot;

/// A message in a view's queue.
///
/// Requests are grouped by the tier the scheduler selects them in.
pub(crate) enum Request<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    /// Served first whenever the view is serving.
    Query(Query<K, M>),

    /// Considered only when no query is pending.
    Control(Control<M::Tag>),

    /// Applied only inside an update round.
    Write(K::WriteArgs),
}

pub(crate) enum Query<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    Read(K::ReadArgs),
    GetState(oneshot::Sender<Snapshot<K, M>>),
}

pub(crate) enum Control<T> {
    StartUpdate(T),
    Stop,
}

impl<K, M> Query<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    /// Copies this query into a snapshot entry.
    pub(crate) const fn to_pending<W, T>(&self) -> PendingRequest<W, T> {
        match self {
            Self::Read(_) => PendingRequest::Read,
            Self::GetState(_) => PendingRequest::GetState,
        }
    }
}

impl<T: Clone> Control<T> {
    pub(crate) fn to_pending<W>(&self) -> PendingRequest<W, T> {
        match self {
            Self::StartUpdate(tag) => PendingRequest::StartUpdate(tag.clone()),
            Self::Stop => PendingRequest::Stop,
        }
    }
}

/// A request that was queued but not yet consumed when a snapshot was
/// taken.
///
/// Only writes carry their arguments: they are the only entries replayed
/// when a snapshot seeds a duplicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingRequest<W, T> {
    /// A queued read.
    Read,

    /// A queued write and its arguments.
    Write(W),

    /// A queued request to open an update round.
    StartUpdate(T),

    /// A queued state request from another requester.
    GetState,

    /// A queued stop.
    Stop,
}

impl<W, T> PendingRequest<W, T> {
    /// Returns the write arguments if this entry is a write.
    pub const fn as_write(&self) -> Option<&W> {
        match self {
            Self::Write(args) => Some(args),
            _ => None,
        }
    }
}
