//! Background writer for session persistence.
//!
//! Every storage mutation the manager makes goes through one queue drained by
//! one task, so writes land in the order operations happened. A purge queued
//! by `logout` can therefore never overwrite a later login's writes.

use crate::auth::Authenticator;
use crate::error::{BrigadeError, Result};
use crate::storage::{SessionStorage, StorageKey};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

/// A single storage mutation: `Some` writes the value, `None` removes the key.
pub(crate) type Entry = (StorageKey, Option<String>);

const PURGE_RETRY_BACKOFF: Duration = Duration::from_millis(50);

enum Job {
    Apply {
        entries: Vec<Entry>,
        ack: Option<oneshot::Sender<Result<()>>>,
    },
    Purge,
    Revoke(String),
    Flush(oneshot::Sender<()>),
}

/// Acknowledgement of writes queued with [`SessionWriter::submit`].
pub(crate) struct PendingWrite(Option<oneshot::Receiver<Result<()>>>);

impl PendingWrite {
    pub(crate) async fn wait(self) -> Result<()> {
        let Some(done) = self.0 else {
            return Err(BrigadeError::persistence("session writer stopped"));
        };
        done.await
            .map_err(|_| BrigadeError::persistence("session writer stopped"))?
    }
}

pub(crate) struct SessionWriter {
    tx: mpsc::UnboundedSender<Job>,
}

impl SessionWriter {
    /// Starts the writer task on `handle`. The task ends when the writer is dropped.
    pub(crate) fn spawn(
        handle: &Handle,
        storage: Arc<dyn SessionStorage>,
        authenticator: Arc<dyn Authenticator>,
        purge_retries: u32,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(run(rx, storage, authenticator, purge_retries));
        Self { tx }
    }

    fn send(&self, job: Job) -> bool {
        let sent = self.tx.send(job).is_ok();
        if !sent {
            tracing::warn!("session writer is gone; dropping background work");
        }
        sent
    }

    /// Queues writes without waiting for them.
    pub(crate) fn enqueue(&self, entries: Vec<Entry>) {
        self.send(Job::Apply { entries, ack: None });
    }

    /// Queues writes; the returned handle resolves once they have been
    /// applied. Safe to call while the session state is locked.
    pub(crate) fn submit(&self, entries: Vec<Entry>) -> PendingWrite {
        let (ack, done) = oneshot::channel();
        let queued = self.send(Job::Apply {
            entries,
            ack: Some(ack),
        });
        PendingWrite(queued.then_some(done))
    }

    pub(crate) fn purge(&self) {
        self.send(Job::Purge);
    }

    pub(crate) fn revoke(&self, token: String) {
        self.send(Job::Revoke(token));
    }

    /// Waits for every job queued so far, including pending revocations.
    pub(crate) async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.send(Job::Flush(tx)) {
            let _ = rx.await;
        }
    }
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<Job>,
    storage: Arc<dyn SessionStorage>,
    authenticator: Arc<dyn Authenticator>,
    purge_retries: u32,
) {
    // Revocations are network calls; they run beside the queue so a slow
    // backend never holds up the next login's writes.
    let mut revocations = JoinSet::new();

    loop {
        tokio::select! {
            job = rx.recv() => {
                let Some(job) = job else { break };
                match job {
                    Job::Apply { entries, ack } => {
                        let result = apply_entries(storage.as_ref(), entries).await;
                        match ack {
                            Some(ack) => {
                                let _ = ack.send(result);
                            }
                            None => {
                                if let Err(e) = result {
                                    tracing::warn!(
                                        error = %e,
                                        "session write failed; change will not survive a restart"
                                    );
                                }
                            }
                        }
                    }
                    Job::Purge => purge(storage.as_ref(), purge_retries).await,
                    Job::Revoke(token) => {
                        let authenticator = Arc::clone(&authenticator);
                        revocations.spawn(async move {
                            match authenticator.revoke(&token).await {
                                Ok(()) => tracing::debug!("token revoked"),
                                Err(e) => tracing::warn!(
                                    error = %e,
                                    "token revocation failed; local session already cleared"
                                ),
                            }
                        });
                    }
                    Job::Flush(done) => {
                        while revocations.join_next().await.is_some() {}
                        let _ = done.send(());
                    }
                }
            }
            Some(_) = revocations.join_next(), if !revocations.is_empty() => {}
        }
    }

    while revocations.join_next().await.is_some() {}
    tracing::debug!("session writer stopped");
}

async fn apply_entries(storage: &dyn SessionStorage, entries: Vec<Entry>) -> Result<()> {
    let mut errors = Vec::new();
    for (key, value) in entries {
        let outcome = match value {
            Some(value) => storage.set(key, value).await,
            None => storage.remove(key).await,
        };
        if let Err(e) = outcome {
            tracing::debug!(%key, error = %e, "storage write failed");
            errors.push(e);
        }
    }
    BrigadeError::from_many(errors)
}

async fn purge(storage: &dyn SessionStorage, retries: u32) {
    let removals: Vec<Entry> = StorageKey::ALL.iter().map(|key| (*key, None)).collect();

    for attempt in 0..=retries {
        match apply_entries(storage, removals.clone()).await {
            Ok(()) => {
                tracing::debug!(attempt, "session storage purged");
                return;
            }
            Err(e) if attempt < retries => {
                tracing::debug!(attempt, error = %e, "purge failed, retrying");
                tokio::time::sleep(PURGE_RETRY_BACKOFF * (attempt + 1)).await;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "could not purge session storage; stale data may be restored"
                );
            }
        }
    }
}
