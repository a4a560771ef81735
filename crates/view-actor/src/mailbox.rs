use crate::PendingRequests;
use crate::request::{Control, PendingRequest, Query, Request};

use std::collections::VecDeque;

use proven_view::{Monitor, ViewKind};
use tokio::sync::mpsc;

/// The inbound side of a view: its channel plus every request already moved
/// off the channel but not yet consumed.
///
/// Buffered requests are sorted into one queue per scheduling tier, so the
/// `take_*` methods never scan past requests of another tier. Each request is
/// stamped with its arrival sequence when it leaves the channel, which is how
/// [`Mailbox::pending`] restores the interleaved arrival order.
pub(crate) struct Mailbox<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    receiver: mpsc::UnboundedReceiver<Request<K, M>>,
    queries: VecDeque<(u64, Query<K, M>)>,
    controls: VecDeque<(u64, Control<M::Tag>)>,
    writes: VecDeque<(u64, K::WriteArgs)>,
    next_sequence: u64,
}

impl<K, M> Mailbox<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    pub(crate) const fn new(receiver: mpsc::UnboundedReceiver<Request<K, M>>) -> Self {
        Self {
            receiver,
            queries: VecDeque::new(),
            controls: VecDeque::new(),
            writes: VecDeque::new(),
            next_sequence: 0,
        }
    }

    /// Moves every request that has already arrived into its tier queue.
    pub(crate) fn fill(&mut self) {
        while let Ok(request) = self.receiver.try_recv() {
            self.push(request);
        }
    }

    /// Waits for the next request and buffers it.
    ///
    /// Returns `false` once every handle has been dropped and nothing more
    /// can arrive.
    pub(crate) async fn wait(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(request) => {
                self.push(request);
                true
            }
            None => false,
        }
    }

    fn push(&mut self, request: Request<K, M>) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        match request {
            Request::Query(query) => self.queries.push_back((sequence, query)),
            Request::Control(control) => self.controls.push_back((sequence, control)),
            Request::Write(args) => self.writes.push_back((sequence, args)),
        }
    }

    pub(crate) fn take_query(&mut self) -> Option<Query<K, M>> {
        self.queries.pop_front().map(|(_, query)| query)
    }

    pub(crate) fn take_control(&mut self) -> Option<Control<M::Tag>> {
        self.controls.pop_front().map(|(_, control)| control)
    }

    pub(crate) fn take_write(&mut self) -> Option<K::WriteArgs> {
        self.writes.pop_front().map(|(_, args)| args)
    }

    /// Copies the buffered requests in arrival order. Does not consume them.
    pub(crate) fn pending(&self) -> PendingRequests<K, M> {
        let mut queries = self.queries.iter().peekable();
        let mut controls = self.controls.iter().peekable();
        let mut writes = self.writes.iter().peekable();

        let mut pending = Vec::with_capacity(self.len());

        loop {
            let query = queries.peek().map_or(u64::MAX, |(sequence, _)| *sequence);
            let control = controls.peek().map_or(u64::MAX, |(sequence, _)| *sequence);
            let write = writes.peek().map_or(u64::MAX, |(sequence, _)| *sequence);

            // The oldest head wins. An exhausted tier reads as `u64::MAX`, so
            // the loop ends only when the chosen tier is empty too.
            let next = if query <= control && query <= write {
                queries.next().map(|(_, query)| query.to_pending())
            } else if control <= write {
                controls.next().map(|(_, control)| control.to_pending())
            } else {
                writes
                    .next()
                    .map(|(_, args)| PendingRequest::Write(args.clone()))
            };

            match next {
                Some(request) => pending.push(request),
                None => break,
            }
        }

        pending
    }

    pub(crate) fn len(&self) -> usize {
        self.queries.len() + self.controls.len() + self.writes.len()
    }
}
