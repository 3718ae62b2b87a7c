//! Keeps at most one fetch per store in flight.
//!
//! A fetch requested while another is running is not sent right away. It
//! is parked as a delayed task and retried after `delay`, and a newer
//! request replaces any parked one, so a burst of calls collapses into a
//! single fetch carrying the last call's arguments. Every request gets a
//! [`Ticket`]. Only the holder of the newest ticket may apply its result,
//! which keeps a slow superseded response from overwriting fresher state.
//!
//! Requests that were already sent are never cancelled. Dropping the guard
//! aborts the parked task, if any.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::AbortHandle;

pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Default)]
struct GuardState {
    in_flight: bool,
    /// Generation of the newest request.
    latest: u64,
    pending: Option<AbortHandle>,
}

#[derive(Debug)]
pub struct InflightGuard {
    inner: Arc<Mutex<GuardState>>,
    delay: Duration,
}

/// What happened to a call to [`InflightGuard::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission<T> {
    /// The job ran immediately and this is its output.
    Completed(T),
    /// Another fetch was in flight; the job will run later unless a newer
    /// request replaces it first.
    Deferred,
}

impl<T> Admission<T> {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred)
    }
}

/// Identifies one request handed to the guard.
#[derive(Debug)]
pub struct Ticket {
    generation: u64,
    inner: Arc<Mutex<GuardState>>,
}

impl Ticket {
    /// Whether no newer request has been made since this one.
    pub fn is_latest(&self) -> bool {
        self.inner.lock().unwrap().latest == self.generation
    }
}

/// Clears the in-flight flag when the job finishes or is dropped.
struct InFlight(Arc<Mutex<GuardState>>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.lock().unwrap().in_flight = false;
    }
}

impl Default for InflightGuard {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_DELAY)
    }
}

impl InflightGuard {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: Arc::default(),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_in_flight(&self) -> bool {
        self.inner.lock().unwrap().in_flight
    }

    /// Run `job` now if nothing is in flight, otherwise park it.
    pub async fn run<F, Fut, T>(&self, job: F) -> Admission<T>
    where
        F: FnOnce(Ticket) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let ticket = {
            let mut state = self.inner.lock().unwrap();
            state.latest += 1;
            if let Some(pending) = state.pending.take() {
                tracing::debug!("replacing parked fetch");
                pending.abort();
            }
            let ticket = Ticket {
                generation: state.latest,
                inner: self.inner.clone(),
            };
            if state.in_flight {
                state.pending = Some(self.park(ticket, job));
                return Admission::Deferred;
            }
            state.in_flight = true;
            ticket
        };

        let _flight = InFlight(self.inner.clone());
        Admission::Completed(job(ticket).await)
    }

    fn park<F, Fut, T>(&self, ticket: Ticket, job: F) -> AbortHandle
    where
        F: FnOnce(Ticket) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = self.inner.clone();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(delay).await;
                let mut state = inner.lock().unwrap();
                if !state.in_flight {
                    state.in_flight = true;
                    // Once claimed the job can no longer be replaced.
                    state.pending = None;
                    break;
                }
            }
            let _flight = InFlight(inner);
            job(ticket).await;
        });
        task.abort_handle()
    }

    /// Abort the parked fetch, if any.
    pub fn cancel_pending(&self) {
        if let Some(pending) = self.inner.lock().unwrap().pending.take() {
            pending.abort();
        }
    }
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
