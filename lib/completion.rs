//! Single-slot handoff between the transfer-complete interrupt and the
//! acquisition engine.
//!
//! The queue holds at most one token, so a completion can never be queued
//! twice: a cycle has to be consumed before the next one can be signalled.

use heapless::spsc::{Consumer, Producer, Queue};

/// Backing storage, capacity `2 - 1 = 1`.
pub type Completion = Queue<(), 2>;

/// Splits the storage into the interrupt side and the engine side.
pub fn split(completion: &mut Completion) -> (Notifier<'_>, Waiter<'_>) {
    let (producer, consumer) = completion.split();
    (Notifier { producer }, Waiter { consumer })
}

/// Producer half, owned by whatever observes the hardware completion.
pub struct Notifier<'a> {
    producer: Producer<'a, (), 2>,
}

impl<'a> Notifier<'a> {
    /// Posts the completion of the current cycle.
    ///
    /// Returns `false` if a completion is still pending, in which case
    /// nothing is queued.
    pub fn notify(&mut self) -> bool {
        let posted = self.producer.enqueue(()).is_ok();
        if !posted {
            warn!("completion already pending, dropped");
        }
        posted
    }
}

/// Consumer half, owned by the acquisition engine.
pub struct Waiter<'a> {
    consumer: Consumer<'a, (), 2>,
}

impl<'a> Waiter<'a> {
    /// Drops a stale completion. Called before a new transfer is armed.
    pub fn reset(&mut self) {
        while self.consumer.dequeue().is_some() {}
    }

    /// Consumes the completion if one was posted.
    pub fn take(&mut self) -> bool {
        self.consumer.dequeue().is_some()
    }
}
