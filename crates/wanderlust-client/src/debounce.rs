//! Quiet-window coalescing for text input.
//!
//! Values pushed into a [`Debouncer`] are held until no newer value has
//! arrived for the quiet window; only the latest one is emitted. Dropping the
//! debouncer stops the task and discards anything pending.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(300);

pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the coalescing task and returns the debouncer with the
    /// receiver that settled values are delivered to.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (output, output_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(quiet, input_rx, output));
        (Self { input, task }, output_rx)
    }

    /// Records a new value, restarting the quiet window. Returns false once
    /// the task has stopped.
    pub fn push(&self, value: T) -> bool {
        self.input.send(value).is_ok()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(
    quiet: Duration,
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::UnboundedSender<T>,
) {
    let mut pending: Option<T> = None;
    loop {
        if pending.is_none() {
            match input.recv().await {
                Some(value) => pending = Some(value),
                None => break,
            }
            continue;
        }

        tokio::select! {
            next = input.recv() => match next {
                Some(value) => pending = Some(value),
                None => break,
            },
            () = tokio::time::sleep(quiet) => {
                if let Some(value) = pending.take() {
                    if output.send(value).is_err() {
                        break;
                    }
                }
            }
        }
    }
}
