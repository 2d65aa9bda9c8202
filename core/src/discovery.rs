//! # Discovery Service
//!
//! Composes the record builder with a [`CibStore`].
//!
//! A pass builds a record for every usable interface and hands each one to
//! the store. [`DiscoveryService::watch`] repeats the pass whenever the
//! kernel reports a link change, so the stored records follow the host.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use ifcib_common::cib::record::CharacteristicsRecord;
use ifcib_common::cib::store::CibStore;
use ifcib_common::config::DEFAULT_WATCH_DEBOUNCE;
use ifcib_common::network::environment::NetworkEnvironment;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::builder::CibBuilder;
use crate::monitor::LinkChangeEvent;

#[derive(Debug)]
pub struct SavedRecord {
    pub record: CharacteristicsRecord,
    pub path: PathBuf,
}

/// Outcome of one discovery pass.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub saved: Vec<SavedRecord>,
    /// Records the store refused.
    pub failed: usize,
}

pub struct DiscoveryService<E, S> {
    builder: CibBuilder<E>,
    store: S,
    debounce: Duration,
}

impl<E: NetworkEnvironment, S: CibStore> DiscoveryService<E, S> {
    pub fn new(env: E, store: S) -> Self {
        Self {
            builder: CibBuilder::new(env),
            store,
            debounce: DEFAULT_WATCH_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn builder(&self) -> &CibBuilder<E> {
        &self.builder
    }

    /// Runs one pass. A record the store rejects is logged and counted; it
    /// does not stop the others.
    pub fn run_once(&self) -> DiscoveryReport {
        let mut report = DiscoveryReport::default();

        for record in self.builder.records() {
            match self.store.save(&record) {
                Ok(path) => {
                    info!(interface = %record.uid, path = %path.display(), "CIB node saved");
                    report.saved.push(SavedRecord { record, path });
                }
                Err(e) => {
                    warn!(interface = %record.uid, "failed to store CIB node: {e}");
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Runs a pass now and again after every burst of link changes, until
    /// `events` closes or `shutdown` resolves. Returns the number of passes.
    ///
    /// A pass may observe host state that is already stale again; the next
    /// event triggers another one.
    pub async fn watch<F>(&self, events: &mut UnboundedReceiver<LinkChangeEvent>, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        self.blocking_pass();
        let mut passes: usize = 1;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("watch shutting down");
                    break;
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("link event channel closed");
                        break;
                    };
                    let Some(coalesced) = self.settle(events, shutdown.as_mut()).await else {
                        debug!("watch shutting down during debounce");
                        break;
                    };
                    info!(kind = ?event.kind, coalesced, "link change, rediscovering");
                    self.blocking_pass();
                    passes += 1;
                }
            }
        }

        passes
    }

    /// Waits out the debounce window and swallows the events that arrived in
    /// it, returning how many were dropped, or `None` if `shutdown` fired first.
    async fn settle<F>(&self, events: &mut UnboundedReceiver<LinkChangeEvent>, shutdown: Pin<&mut F>) -> Option<usize>
    where
        F: Future<Output = ()>,
    {
        if !self.debounce.is_zero() {
            tokio::select! {
                _ = shutdown => return None,
                _ = tokio::time::sleep(self.debounce) => {}
            }
        }
        let mut dropped: usize = 0;
        while events.try_recv().is_ok() {
            dropped += 1;
        }
        Some(dropped)
    }

    /// [`Self::run_once`] from async context. On a multi-threaded runtime the
    /// worker is handed off so other tasks keep running during the OS queries.
    fn blocking_pass(&self) -> DiscoveryReport {
        match Handle::try_current().map(|handle| handle.runtime_flavor()) {
            Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(|| self.run_once()),
            _ => self.run_once(),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
