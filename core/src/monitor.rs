//! # Kernel Event Monitor
//!
//! Listens on the kernel's routing event channel for link changes and
//! forwards them to the owner as [`LinkChangeEvent`]s. Detection is kept
//! apart from rebuild policy: the owner decides what a change triggers.
//!
//! The receive loop runs on a dedicated thread that exclusively owns its
//! socket. [`LinkWatch::stop`] (or dropping the watch) cancels it; the socket
//! is released when the thread exits.

use std::io::{self, ErrorKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use ifcib_common::error::{Error, Result};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, trace};

pub mod header;
#[cfg(target_os = "linux")]
mod netlink;

use header::Message;

pub const RTM_NEWLINK: u16 = 16;
pub const RTM_DELLINK: u16 = 17;

/// How long the loop sleeps when nothing is pending. Bounds how quickly a
/// cancellation is noticed.
pub const IDLE_POLL: Duration = Duration::from_millis(50);
/// Large enough for the biggest datagram the kernel sends on this channel.
const RECV_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LinkChangeKind {
    Appeared,
    Disappeared,
}

impl LinkChangeKind {
    pub fn from_message_type(message_type: u16) -> Option<Self> {
        match message_type {
            RTM_NEWLINK => Some(LinkChangeKind::Appeared),
            RTM_DELLINK => Some(LinkChangeKind::Disappeared),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinkChangeEvent {
    pub kind: LinkChangeKind,
    /// Raw netlink message type the event was decoded from.
    pub message_type: u16,
    pub sequence: u32,
    pub sender: u32,
    pub timestamp: SystemTime,
}

impl LinkChangeEvent {
    fn from_message(message: &Message) -> Option<Self> {
        let header = &message.header;
        let kind = LinkChangeKind::from_message_type(header.message_type)?;
        Some(Self {
            kind,
            message_type: header.message_type,
            sequence: header.sequence_number,
            sender: header.port_number,
            timestamp: SystemTime::now(),
        })
    }
}

/// Something that yields raw kernel event datagrams.
pub trait KernelEventSource: Send + 'static {
    /// Replaces the contents of `buf` with the next pending datagram and
    /// returns its length, or `None` when nothing is pending right now.
    fn recv(&mut self, buf: &mut Vec<u8>) -> io::Result<Option<usize>>;
}

/// Link change events contained in one datagram, in order.
///
/// Only the header decides the event, so a message whose payload was cut
/// off still produces one.
pub fn decode_datagram(datagram: &[u8]) -> Vec<LinkChangeEvent> {
    header::messages(datagram)
        .filter_map(|message| {
            let event = LinkChangeEvent::from_message(&message);
            match &event {
                None => trace!(message_type = message.header.message_type, "ignoring non-link message"),
                Some(_) if message.truncated => {
                    debug!(length = message.header.length, "link message truncated by the receive buffer")
                }
                Some(_) => {}
            }
            event
        })
        .collect()
}

/// Receives from `source` until `running` is cleared, the receiving side of
/// `tx` is dropped, or the source fails.
pub fn run_event_loop<S: KernelEventSource>(
    mut source: S,
    running: &AtomicBool,
    tx: &UnboundedSender<LinkChangeEvent>,
) -> io::Result<()> {
    let mut buf: Vec<u8> = Vec::with_capacity(RECV_BUFFER_SIZE);

    while running.load(Ordering::Acquire) {
        let len: usize = match source.recv(&mut buf) {
            Ok(Some(len)) => len,
            Ok(None) => {
                thread::sleep(IDLE_POLL);
                continue;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        for event in decode_datagram(&buf[..len.min(buf.len())]) {
            if !running.load(Ordering::Acquire) {
                return Ok(());
            }
            debug!(kind = ?event.kind, sequence = event.sequence, "link change");
            if tx.send(event).is_err() {
                return Ok(());
            }
        }
    }
    Ok(())
}

/// Handle to a running monitor thread.
pub struct LinkWatch {
    /// Link changes, in the order they were received.
    pub events: UnboundedReceiver<LinkChangeEvent>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl LinkWatch {
    /// Starts watching the host's link changes.
    ///
    /// Returns [`Error::MonitorUnsupported`] when the kernel channel cannot be
    /// opened here; discovery on demand keeps working without it.
    pub fn spawn() -> Result<Self> {
        #[cfg(target_os = "linux")]
        {
            Self::with_source(netlink::NetlinkSource::open()?)
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(Error::MonitorUnsupported(
                "kernel link notifications are only available on Linux".into(),
            ))
        }
    }

    /// Runs the receive loop over an arbitrary source.
    pub fn with_source<S: KernelEventSource>(source: S) -> Result<Self> {
        let (tx, events) = mpsc::unbounded_channel();
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let handle = thread::Builder::new()
            .name("link-monitor".into())
            .spawn(move || {
                if let Err(e) = run_event_loop(source, &flag, &tx) {
                    error!("link monitor stopped: {e}");
                }
                flag.store(false, Ordering::Release);
            })
            .map_err(|e| Error::MonitorUnsupported(format!("spawning monitor thread: {e}")))?;

        Ok(Self {
            events,
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Cancels the loop and waits for the thread to release its socket.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for LinkWatch {
    fn drop(&mut self) {
        self.stop();
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
