use crate::PendingRequest;

use std::fmt;
use std::sync::Arc;

use proven_view::{Monitor, ViewKind};

/// Pending requests as captured in a [`Snapshot`].
pub type PendingRequests<K, M> =
    Vec<PendingRequest<<K as ViewKind>::WriteArgs, <M as Monitor>::Tag>>;

/// A point-in-time copy of a view's state and of the requests it had queued
/// but not yet consumed.
///
/// Taking a snapshot has no effect on the source view. Enumerating the
/// queue is O(queue length).
pub struct Snapshot<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    pub(crate) monitor: M,
    pub(crate) kind: Arc<K>,
    pub(crate) data: K::Data,
    pub(crate) pending: PendingRequests<K, M>,
}

impl<K, M> Snapshot<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    /// The monitor of the source view.
    pub const fn monitor(&self) -> &M {
        &self.monitor
    }

    /// The behaviour shared with the source view.
    pub const fn kind(&self) -> &Arc<K> {
        &self.kind
    }

    /// The committed data of the source view, without pending writes.
    pub const fn data(&self) -> &K::Data {
        &self.data
    }

    /// The unconsumed requests, in arrival order.
    pub fn pending(&self) -> &[PendingRequest<K::WriteArgs, M::Tag>] {
        &self.pending
    }

    /// Number of pending writes [`Snapshot::replay`] would apply.
    pub fn pending_writes(&self) -> usize {
        self.pending
            .iter()
            .filter(|request| request.as_write().is_some())
            .count()
    }

    /// Folds every pending write over the captured data, in arrival order.
    ///
    /// Every other pending request is ignored.
    pub fn replay(&self) -> K::Data {
        self.pending
            .iter()
            .filter_map(PendingRequest::as_write)
            .fold(self.data.clone(), |data, args| {
                self.kind.write(data, args.clone())
            })
    }
}

impl<K, M> fmt::Debug for Snapshot<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stack;

    impl ViewKind for Stack {
        type Data = Vec<u32>;
        type ReadArgs = ();
        type WriteArgs = u32;

        fn read(&self, _data: &Self::Data, _args: Self::ReadArgs) {}

        fn write(&self, mut data: Self::Data, args: Self::WriteArgs) -> Self::Data {
            data.insert(0, args);
            data
        }
    }

    fn snapshot(data: Vec<u32>, pending: PendingRequests<Stack, ()>) -> Snapshot<Stack, ()> {
        Snapshot {
            monitor: (),
            kind: Arc::new(Stack),
            data,
            pending,
        }
    }

    #[test]
    fn test_replay_applies_writes_in_order() {
        let snapshot = snapshot(
            vec![1],
            vec![
                PendingRequest::Write(2),
                PendingRequest::Write(3),
                PendingRequest::Write(4),
            ],
        );

        assert_eq!(snapshot.replay(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_replay_ignores_non_writes() {
        let snapshot = snapshot(
            vec![],
            vec![
                PendingRequest::Read,
                PendingRequest::Write(7),
                PendingRequest::StartUpdate(()),
                PendingRequest::GetState,
                PendingRequest::Write(8),
                PendingRequest::Stop,
            ],
        );

        assert_eq!(snapshot.pending_writes(), 2);
        assert_eq!(snapshot.replay(), vec![8, 7]);
    }

    #[test]
    fn test_replay_leaves_snapshot_untouched() {
        let snapshot = snapshot(vec![1], vec![PendingRequest::Write(2)]);

        assert_eq!(snapshot.replay(), vec![2, 1]);
        assert_eq!(snapshot.data(), &vec![1]);
        assert_eq!(snapshot.pending().len(), 1);
    }

    #[test]
    fn test_replay_without_pending_writes() {
        let snapshot = snapshot(vec![3, 2], vec![PendingRequest::Read]);

        assert_eq!(snapshot.pending_writes(), 0);
        assert_eq!(snapshot.replay(), vec![3, 2]);
    }
}
