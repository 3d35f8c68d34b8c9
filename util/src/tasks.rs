//! Bounded background task queue for fire-and-forget side effects.
//!
//! Request handlers submit futures (QR rotation, outbound mail) and return
//! immediately. A fixed set of worker tasks drains the channel. Delivery is best
//! effort: when the queue is full the job is dropped with a warning, and there is
//! no ordering between two submitted jobs.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, Notify, mpsc};

pub type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

struct Labeled {
    label: &'static str,
    job: Job,
}

#[derive(Default)]
struct Pending {
    count: AtomicUsize,
    idle: Notify,
}

impl Pending {
    fn finish(&self) {
        if self.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }
}

/// Handle to the worker pool. Cheap to clone.
#[derive(Clone)]
pub struct TaskQueue {
    sender: mpsc::Sender<Labeled>,
    pending: Arc<Pending>,
}

impl TaskQueue {
    /// Spawns `workers` drain loops on the current tokio runtime.
    pub fn start(workers: usize, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<Labeled>(capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));
        let pending = Arc::new(Pending::default());

        for worker in 0..workers.max(1) {
            let receiver = receiver.clone();
            let pending = pending.clone();
            tokio::spawn(async move {
                loop {
                    let next = { receiver.lock().await.recv().await };
                    let Some(Labeled { label, job }) = next else {
                        break;
                    };

                    // Run on its own task so a panicking job cannot take the worker down.
                    if let Err(e) = tokio::spawn(job).await {
                        tracing::error!(worker, job = label, error = %e, "Background job panicked");
                    }
                    pending.finish();
                }
                tracing::debug!(worker, "Background worker stopped");
            });
        }

        Self { sender, pending }
    }

    /// Submits a job without waiting for it. Returns `false` when the job was dropped.
    pub fn submit<F>(&self, label: &'static str, job: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.pending.count.fetch_add(1, Ordering::AcqRel);
        match self.sender.try_send(Labeled {
            label,
            job: Box::pin(job),
        }) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(job = label, "Background queue full; dropping job");
                self.pending.finish();
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(job = label, "Background queue closed; dropping job");
                self.pending.finish();
                false
            }
        }
    }

    /// Number of jobs submitted but not yet finished.
    pub fn in_flight(&self) -> usize {
        self.pending.count.load(Ordering::Acquire)
    }

    /// Resolves once every submitted job has finished.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.pending.idle.notified();
            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }
}
