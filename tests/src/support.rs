use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};

use ifcib_common::error::Result;
use ifcib_common::network::environment::{Gateway, NetworkEnvironment, Snapshot, StaticEnvironment};
use ifcib_common::network::interface::BoundAddress;
use ifcib_core::monitor::KernelEventSource;
use ifcib_core::monitor::header;

/// A host whose state the test can swap out between passes.
#[derive(Clone, Default)]
pub struct SwappableHost {
    inner: Arc<Mutex<StaticEnvironment>>,
}

impl SwappableHost {
    pub fn new(env: StaticEnvironment) -> Self {
        Self {
            inner: Arc::new(Mutex::new(env)),
        }
    }

    pub fn replace(&self, env: StaticEnvironment) {
        *self.inner.lock().unwrap() = env;
    }
}

impl NetworkEnvironment for SwappableHost {
    fn interface_names(&self) -> Result<Vec<String>> {
        self.inner.lock().unwrap().interface_names()
    }

    fn addresses(&self, name: &str) -> Result<Vec<BoundAddress>> {
        self.inner.lock().unwrap().addresses(name)
    }

    fn default_gateway(&self) -> Result<Option<Gateway>> {
        self.inner.lock().unwrap().default_gateway()
    }

    fn snapshot(&self) -> Result<Snapshot> {
        self.inner.lock().unwrap().snapshot()
    }
}

/// Kernel channel stand-in fed by the test through a [`KernelFeed`].
pub struct ChannelSource {
    rx: Receiver<Vec<u8>>,
}

pub struct KernelFeed {
    tx: Sender<Vec<u8>>,
}

pub fn kernel_channel() -> (KernelFeed, ChannelSource) {
    let (tx, rx) = mpsc::channel();
    (KernelFeed { tx }, ChannelSource { rx })
}

impl KernelFeed {
    pub fn send(&self, message_type: u16, sequence: u32) {
        let _ = self.tx.send(message(message_type, sequence));
    }
}

impl KernelEventSource for ChannelSource {
    fn recv(&mut self, buf: &mut Vec<u8>) -> io::Result<Option<usize>> {
        match self.rx.try_recv() {
            Ok(datagram) => {
                buf.clear();
                buf.extend_from_slice(&datagram);
                Ok(Some(buf.len()))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(io::Error::new(io::ErrorKind::BrokenPipe, "feed closed")),
        }
    }
}

/// One netlink message with a 16-byte link payload.
pub fn message(message_type: u16, sequence: u32) -> Vec<u8> {
    header::encode(message_type, sequence, 16)
}
