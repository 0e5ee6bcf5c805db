//! Debounced, de-duplicated value stream.
//!
//! Values pushed into a [`Debouncer`] are held until the input has been quiet
//! for the configured window. Only the last value of a burst survives, and it
//! is dropped if it equals the previous emission.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Receiver of settled values.
pub trait DebounceSink<T>: Send + 'static {
    /// A value survived the quiet window and differs from the last emission.
    fn emit(&mut self, value: T);

    /// A value survived the quiet window but repeated the last emission.
    fn suppressed(&mut self, _value: T) {}
}

/// Handle to a running debounce task.
///
/// Dropping the handle closes the input and aborts the task.
pub struct Debouncer<T> {
    sender: Option<mpsc::UnboundedSender<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: PartialEq + Clone + Send + 'static,
{
    /// Spawn the debounce loop on the current tokio runtime.
    pub fn spawn<S>(window: Duration, sink: S) -> Self
    where
        S: DebounceSink<T>,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_debounce_loop(receiver, window, sink));
        Self {
            sender: Some(sender),
            task: Some(task),
        }
    }

    /// Feed a raw value. Returns `false` once the debouncer is closed.
    pub fn push(&self, value: T) -> bool {
        match &self.sender {
            Some(sender) => sender.send(value).is_ok(),
            None => false,
        }
    }
}

impl<T> Debouncer<T> {
    pub fn is_closed(&self) -> bool {
        self.sender.is_none()
    }

    /// Stop the loop. Pending input is discarded. Safe to call repeatedly.
    pub fn close(&mut self) {
        self.sender = None;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_debounce_loop<T, S>(
    mut receiver: mpsc::UnboundedReceiver<T>,
    window: Duration,
    mut sink: S,
) where
    T: PartialEq + Clone + Send + 'static,
    S: DebounceSink<T>,
{
    let mut last_emitted: Option<T> = None;

    loop {
        // Wait for the first value of a burst
        let mut latest = match receiver.recv().await {
            Some(value) => value,
            None => return,
        };

        // Keep replacing it until the window passes without input
        loop {
            match tokio::time::timeout(window, receiver.recv()).await {
                Ok(Some(value)) => latest = value,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        if last_emitted.as_ref() == Some(&latest) {
            sink.suppressed(latest);
        } else {
            last_emitted = Some(latest.clone());
            sink.emit(latest);
        }
    }
}
