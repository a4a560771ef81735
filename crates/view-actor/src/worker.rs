use crate::mailbox::Mailbox;
use crate::request::{Control, Query};
use crate::{Snapshot, ViewConfig};

use std::sync::Arc;

use proven_view::{Monitor, ViewId, ViewKind};
use tokio::sync::oneshot;
use tracing::{debug, info, trace, warn};

enum State<T> {
    Serving,
    Updating(T),
}

enum Step<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    Query(Query<K, M>),
    Control(Control<M::Tag>),
}

/// The task side of a view. Owns the data and runs the scheduling loop.
pub(crate) struct ViewWorker<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    id: ViewId,
    kind: Arc<K>,
    monitor: M,
    mailbox: Mailbox<K, M>,
    config: ViewConfig,
}

impl<K, M> ViewWorker<K, M>
where
    K: ViewKind,
    M: Monitor,
{
    pub(crate) const fn new(
        id: ViewId,
        kind: Arc<K>,
        monitor: M,
        mailbox: Mailbox<K, M>,
        config: ViewConfig,
    ) -> Self {
        Self {
            id,
            kind,
            monitor,
            mailbox,
            config,
        }
    }

    /// Runs until a stop is consumed or every handle is dropped.
    pub(crate) async fn run(mut self, mut data: K::Data) {
        self.monitor.startup_finished(self.id);
        info!("view started");

        let mut state = State::Serving;

        loop {
            state = match state {
                State::Serving => match self.next_serving().await {
                    Some(Step::Query(Query::Read(args))) => {
                        self.read(&data, args);
                        State::Serving
                    }
                    Some(Step::Query(Query::GetState(destination))) => {
                        self.get_state(&data, destination);
                        State::Serving
                    }
                    Some(Step::Control(Control::StartUpdate(tag))) => {
                        debug!(?tag, "update round started");
                        State::Updating(tag)
                    }
                    Some(Step::Control(Control::Stop)) => break,
                    None => {
                        debug!("all handles dropped");
                        break;
                    }
                },
                State::Updating(tag) => {
                    data = self.update(data, tag);
                    State::Serving
                }
            };
        }

        self.mailbox.fill();
        info!(discarded = self.mailbox.len(), "view stopped");
    }

    /// Waits for the next request the serving state acts on.
    ///
    /// Queries win over controls whenever both are pending. Returns `None`
    /// once nothing more can arrive.
    async fn next_serving(&mut self) -> Option<Step<K, M>> {
        loop {
            self.mailbox.fill();

            if let Some(query) = self.mailbox.take_query() {
                return Some(Step::Query(query));
            }

            if let Some(control) = self.mailbox.take_control() {
                return Some(Step::Control(control));
            }

            // Writes alone never make progress while serving.
            if !self.mailbox.wait().await {
                return None;
            }
        }
    }

    fn read(&self, data: &K::Data, args: K::ReadArgs) {
        trace!("serving read");
        self.kind.read(data, args);
        self.monitor.read_finished();
    }

    fn get_state(&self, data: &K::Data, destination: oneshot::Sender<Snapshot<K, M>>) {
        let pending = self.mailbox.pending();

        if pending.len() > self.config.snapshot_warn_threshold {
            warn!(
                pending = pending.len(),
                threshold = self.config.snapshot_warn_threshold,
                "snapshot captured a large queue"
            );
        } else {
            debug!(pending = pending.len(), "snapshot captured");
        }

        let snapshot = Snapshot {
            monitor: self.monitor.clone(),
            kind: Arc::clone(&self.kind),
            data: data.clone(),
            pending,
        };

        if destination.send(snapshot).is_err() {
            debug!("snapshot requester went away");
        }
    }

    /// Applies every write available without waiting, then closes the round.
    fn update(&mut self, mut data: K::Data, tag: M::Tag) -> K::Data {
        let mut applied = 0usize;

        loop {
            self.mailbox.fill();

            let Some(args) = self.mailbox.take_write() else {
                break;
            };

            trace!(?args, "applying write");
            data = self.kind.write(data, args);
            applied += 1;
        }

        debug!(?tag, applied, "update round finished");
        self.monitor.update_finished(tag);

        data
    }
}
