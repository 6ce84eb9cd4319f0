//! Debounced values.
//!
//! A [`Debouncer`] forwards a value only once it has stopped changing for a
//! fixed delay. Every new input restarts the delay.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::warn;

/// Quiet period applied to search input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(700);

/// Whether the debouncer is waiting out the quiet period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Input arrived and the timer is running.
    Pending,
    /// The timer elapsed with no newer input.
    Settled,
}

/// Debounces values of type `T` on a background task.
///
/// The settled value is published on a `watch` channel. Observers are only
/// woken when the settled value actually changes.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    settled: watch::Receiver<T>,
    state: watch::Receiver<DebounceState>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Spawn a debouncer whose settled value starts at `initial`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (settled_tx, settled) = watch::channel(initial);
        let (state_tx, state) = watch::channel(DebounceState::Settled);

        let task = tokio::spawn(run(input_rx, settled_tx, state_tx, delay));

        Self {
            input,
            settled,
            state,
            task,
        }
    }

    /// Feed a new value, restarting the quiet period.
    pub fn push(&self, value: T) {
        if self.input.send(value).is_err() {
            warn!("Debouncer task has stopped, dropping input");
        }
    }

    /// The most recent settled value.
    pub fn settled(&self) -> T {
        self.settled.borrow().clone()
    }

    /// Receiver that observes settled values.
    ///
    /// The current value counts as already seen.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.settled.clone()
    }

    pub fn state(&self) -> DebounceState {
        *self.state.borrow()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T: PartialEq>(
    mut input: mpsc::UnboundedReceiver<T>,
    settled: watch::Sender<T>,
    state: watch::Sender<DebounceState>,
    delay: Duration,
) {
    let mut pending: Option<T> = None;
    let timer = sleep(delay);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            value = input.recv() => match value {
                Some(value) => {
                    pending = Some(value);
                    timer.as_mut().reset(Instant::now() + delay);
                    state.send_replace(DebounceState::Pending);
                }
                None => break,
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(value) = pending.take() {
                    settled.send_if_modified(|current| {
                        if *current == value {
                            false
                        } else {
                            *current = value;
                            true
                        }
                    });
                }
                state.send_replace(DebounceState::Settled);
            }
        }
    }
}
