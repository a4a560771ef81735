use std::fmt::Debug;

use proven_view::{Monitor, ViewId};
use tokio::sync::mpsc;
use tracing::trace;

/// A notification sent by a view to its monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent<T> {
    /// The view is ready to accept requests.
    StartupFinished(ViewId),

    /// A read was serviced.
    ReadFinished,

    /// The update round with this tag drained its writes.
    UpdateFinished(T),
}

/// Monitor that forwards every notification over an unbounded channel.
#[derive(Debug)]
pub struct ChannelMonitor<T> {
    sender: mpsc::UnboundedSender<MonitorEvent<T>>,
}

impl<T> ChannelMonitor<T> {
    /// Creates a monitor and the receiver its events are delivered to.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MonitorEvent<T>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn notify(&self, event: MonitorEvent<T>) {
        if self.sender.send(event).is_err() {
            trace!("monitor receiver dropped");
        }
    }
}

impl<T> Clone for ChannelMonitor<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T> Monitor for ChannelMonitor<T>
where
    T: Clone + Debug + Send + 'static,
{
    type Tag = T;

    fn startup_finished(&self, view: ViewId) {
        self.notify(MonitorEvent::StartupFinished(view));
    }

    fn read_finished(&self) {
        self.notify(MonitorEvent::ReadFinished);
    }

    fn update_finished(&self, tag: Self::Tag) {
        self.notify(MonitorEvent::UpdateFinished(tag));
    }
}
