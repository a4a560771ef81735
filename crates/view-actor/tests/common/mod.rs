#![allow(dead_code)]

use std::sync::{Arc, Barrier};
use std::time::Duration;

use proven_view_actor::{ActorView, ChannelMonitor, MonitorEvent, View, ViewKind};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

pub const WAIT: Duration = Duration::from_secs(5);

/// A write for [`Stack`].
#[derive(Clone, Debug)]
pub enum Op {
    /// Prepend a value.
    Push(i32),

    /// Meet the test at the barrier, wait for it a second time, then push
    /// nothing.
    Block(Arc<Barrier>),

    /// Meet the test at the barrier, wait for it a second time, then panic.
    Crash(Arc<Barrier>),
}

/// Prepends every pushed value, so the data reads newest first.
pub struct Stack;

impl ViewKind for Stack {
    type Data = Vec<i32>;
    type ReadArgs = oneshot::Sender<Vec<i32>>;
    type WriteArgs = Op;

    fn read(&self, data: &Self::Data, reply: Self::ReadArgs) {
        let _ = reply.send(data.clone());
    }

    fn write(&self, mut data: Self::Data, op: Self::WriteArgs) -> Self::Data {
        match op {
            Op::Push(value) => data.insert(0, value),
            Op::Block(barrier) => {
                barrier.wait();
                barrier.wait();
            }
            Op::Crash(barrier) => {
                barrier.wait();
                barrier.wait();
                panic!("write crashed");
            }
        }

        data
    }
}

pub type StackView = ActorView<Stack, ChannelMonitor<&'static str>>;
pub type Events = mpsc::UnboundedReceiver<MonitorEvent<&'static str>>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Spawns a view holding `data` and waits for its startup notification.
pub async fn spawn(data: Vec<i32>) -> (StackView, Events) {
    init_tracing();

    let (monitor, mut events) = ChannelMonitor::new();
    let view = ActorView::spawn(Stack, monitor, data);

    assert_eq!(
        next_event(&mut events).await,
        MonitorEvent::StartupFinished(view.id())
    );

    (view, events)
}

pub async fn next_event(events: &mut Events) -> MonitorEvent<&'static str> {
    timeout(WAIT, events.recv())
        .await
        .expect("timed out waiting for monitor event")
        .expect("monitor channel closed")
}

/// Reads the view's data and consumes the matching read notification.
pub async fn read(view: &StackView, events: &mut Events) -> Vec<i32> {
    let (reply, data) = oneshot::channel();
    view.read(reply).unwrap();

    let data = timeout(WAIT, data)
        .await
        .expect("timed out waiting for read")
        .expect("view dropped the read");

    assert_eq!(next_event(events).await, MonitorEvent::ReadFinished);

    data
}

/// Waits at `barrier` from a blocking thread.
pub async fn rendezvous(barrier: &Arc<Barrier>) {
    let barrier = Arc::clone(barrier);
    timeout(WAIT, tokio::task::spawn_blocking(move || barrier.wait()))
        .await
        .expect("timed out waiting at barrier")
        .unwrap();
}

pub fn push_all(view: &StackView, values: impl IntoIterator<Item = i32>) {
    for value in values {
        view.write(Op::Push(value)).unwrap();
    }
}

/// Opens a round and waits for it to finish.
pub async fn commit(view: &StackView, events: &mut Events, tag: &'static str) {
    view.start_update(tag).unwrap();
    assert_eq!(next_event(events).await, MonitorEvent::UpdateFinished(tag));
}
