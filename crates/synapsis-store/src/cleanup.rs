//! Retention cleanup
//!
//! Two passes over the metadata:
//! - **expired**: records older than the retention window, artifact included
//! - **orphaned**: records whose artifact no longer exists
//!
//! [`Cleaner::spawn`] runs both on a background thread. The thread sleeps on a
//! channel with a timeout, so [`CleanerHandle::stop`] wakes it immediately.

use crate::error::StoreError;
use crate::record::{CleanerStatus, CleanupKind, CleanupReport};
use crate::store::{remove_artifact, MapStore};
use chrono::{DateTime, Duration as TimeDelta, Utc};
use crossbeam::channel::{self, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Periodic retention cleanup over a [`MapStore`]
#[derive(Debug, Clone)]
pub struct Cleaner {
    store: Arc<MapStore>,
    retention_days: u32,
    running: Arc<AtomicBool>,
}

impl Cleaner {
    /// Create cleaner for store
    #[must_use]
    pub fn new(store: Arc<MapStore>, retention_days: u32) -> Self {
        Self {
            store,
            retention_days,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Remove records older than the retention window
    ///
    /// # Errors
    /// [`StoreError`] if metadata cannot be read or written.
    pub fn purge_expired(&self) -> Result<CleanupReport, StoreError> {
        let cutoff = Utc::now() - TimeDelta::days(i64::from(self.retention_days));
        self.purge_expired_before(cutoff)
    }

    /// Remove records created before `cutoff`
    ///
    /// An artifact that cannot be removed is logged and its record kept for
    /// the next pass.
    ///
    /// # Errors
    /// [`StoreError`] if metadata cannot be read or written.
    pub fn purge_expired_before(&self, cutoff: DateTime<Utc>) -> Result<CleanupReport, StoreError> {
        let mut removed = Vec::new();
        self.store.update(|metadata| {
            metadata.retain(|id, record| {
                if record.created_at >= cutoff {
                    return true;
                }
                match remove_artifact(&record.path) {
                    Ok(()) => {
                        tracing::debug!(id = %id, "expired map removed");
                        removed.push(id.clone());
                        false
                    }
                    Err(e) => {
                        tracing::error!(id = %id, error = %e, "failed to remove expired map");
                        true
                    }
                }
            });
            !removed.is_empty()
        })?;

        if !removed.is_empty() {
            tracing::info!(
                removed = removed.len(),
                retention_days = self.retention_days,
                "expired maps purged"
            );
        }
        Ok(CleanupReport::new(CleanupKind::Expired, removed, Some(self.retention_days)))
    }

    /// Remove records whose artifact is missing
    ///
    /// # Errors
    /// [`StoreError`] if metadata cannot be read or written.
    pub fn purge_orphans(&self) -> Result<CleanupReport, StoreError> {
        let mut removed = Vec::new();
        self.store.update(|metadata| {
            metadata.retain(|id, record| {
                if record.path.exists() {
                    return true;
                }
                tracing::debug!(id = %id, "orphaned record removed");
                removed.push(id.clone());
                false
            });
            !removed.is_empty()
        })?;

        if !removed.is_empty() {
            tracing::info!(removed = removed.len(), "orphaned records purged");
        }
        Ok(CleanupReport::new(CleanupKind::Orphaned, removed, None))
    }

    /// Run both passes, expired first
    ///
    /// # Errors
    /// The first pass error; the orphan pass does not run after a failure.
    pub fn run_once(&self) -> Result<[CleanupReport; 2], StoreError> {
        Ok([self.purge_expired()?, self.purge_orphans()?])
    }

    /// Current state
    #[must_use]
    pub fn status(&self) -> CleanerStatus {
        CleanerStatus {
            running: self.running.load(Ordering::SeqCst),
            retention_days: self.retention_days,
            data_dir: self.store.data_dir().to_path_buf(),
        }
    }

    /// Run both passes every `interval` on a background thread
    ///
    /// The first run happens immediately. Pass failures are logged and do not
    /// stop the loop.
    ///
    /// # Errors
    /// - [`StoreError::CleanerRunning`] if this cleaner already has a thread
    /// - [`StoreError::Io`] if the thread cannot be spawned
    pub fn spawn(&self, interval: Duration) -> Result<CleanerHandle, StoreError> {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("cleaner already running");
            return Err(StoreError::CleanerRunning);
        }

        let (stop_tx, stop_rx) = channel::bounded::<()>(1);
        let cleaner = self.clone();
        let spawned = thread::Builder::new()
            .name("synapsis-cleaner".to_string())
            .spawn(move || {
                loop {
                    if let Err(e) = cleaner.run_once() {
                        tracing::error!(error = %e, "cleanup pass failed");
                    }
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                cleaner.running.store(false, Ordering::SeqCst);
            });

        let thread = match spawned {
            Ok(thread) => thread,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(StoreError::io_error(self.store.data_dir(), e));
            }
        };

        tracing::info!(interval_secs = interval.as_secs(), "cleaner started");
        Ok(CleanerHandle {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
            cleaner: self.clone(),
        })
    }
}

/// Handle to a running cleaner thread; stops it on drop
#[derive(Debug)]
pub struct CleanerHandle {
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
    cleaner: Cleaner,
}

impl CleanerHandle {
    /// Current state of the underlying cleaner
    #[must_use]
    pub fn status(&self) -> CleanerStatus {
        self.cleaner.status()
    }

    /// Signal the thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.try_send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("cleaner thread panicked");
                self.cleaner.running.store(false, Ordering::SeqCst);
            }
            tracing::info!("cleaner stopped");
        }
    }
}

impl Drop for CleanerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
