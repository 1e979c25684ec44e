//! Deferred-write queue
//!
//! A single worker task runs submitted jobs one at a time, in submission
//! order, so backend writes never race or reorder.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

enum Message {
    Run(Job),
    Flush(oneshot::Sender<()>),
}

/// Ordered single-consumer job queue
#[derive(Clone)]
pub struct WriteQueue {
    sender: mpsc::UnboundedSender<Message>,
    pending: Arc<AtomicUsize>,
}

impl WriteQueue {
    /// Start the worker. Must be called from within a Tokio runtime.
    pub fn spawn() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        tokio::spawn(run_worker(receiver, Arc::clone(&pending)));

        Self { sender, pending }
    }

    /// Enqueue a job without waiting for it
    pub fn submit<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.sender.send(Message::Run(Box::pin(job))).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            warn!("Write queue worker has stopped, dropping job");
        }
    }

    /// Wait until every job submitted before this call has finished
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(Message::Flush(tx)).is_err() {
            return;
        }
        let _ = rx.await;
    }

    /// Number of submitted jobs that have not finished yet
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

async fn run_worker(mut receiver: mpsc::UnboundedReceiver<Message>, pending: Arc<AtomicUsize>) {
    while let Some(message) = receiver.recv().await {
        match message {
            Message::Run(job) => {
                // Each job runs in its own task so a panic cannot kill the worker
                if let Err(e) = tokio::spawn(job).await {
                    error!("Deferred write job failed: {}", e);
                }
                pending.fetch_sub(1, Ordering::SeqCst);
            }
            Message::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Write queue closed");
}
