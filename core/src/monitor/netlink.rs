use std::io::{self, ErrorKind};

use ifcib_common::error::{Error, Result};
use netlink_sys::{Socket, SocketAddr, protocols::NETLINK_ROUTE};
use tracing::debug;

use super::KernelEventSource;

/// Multicast group bitmask for link notifications.
const RTMGRP_LINK: u32 = 0x0000_0001;

/// A non-blocking `NETLINK_ROUTE` socket subscribed to link events.
pub struct NetlinkSource {
    socket: Socket,
}

impl NetlinkSource {
    /// Opens the socket bound to this process's id. If that port id is
    /// already taken (another watch in the same process) the kernel picks one.
    pub fn open() -> Result<Self> {
        let mut socket = Socket::new(NETLINK_ROUTE).map_err(unsupported("opening netlink socket"))?;

        let pid: u32 = std::process::id();
        match socket.bind(&SocketAddr::new(pid, RTMGRP_LINK)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                debug!(pid, "netlink port id in use, letting the kernel assign one");
                socket
                    .bind(&SocketAddr::new(0, RTMGRP_LINK))
                    .map_err(unsupported("binding netlink socket"))?;
            }
            Err(e) => return Err(unsupported("binding netlink socket")(e)),
        }

        socket
            .set_non_blocking(true)
            .map_err(unsupported("setting netlink socket non-blocking"))?;

        Ok(Self { socket })
    }
}

impl KernelEventSource for NetlinkSource {
    fn recv(&mut self, buf: &mut Vec<u8>) -> io::Result<Option<usize>> {
        buf.clear();
        match self.socket.recv(buf, 0) {
            Ok(len) => Ok(Some(len)),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn unsupported(context: &'static str) -> impl Fn(io::Error) -> Error {
    move |e| Error::MonitorUnsupported(format!("{context}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_or_report_unsupported() {
        // Sandboxes may forbid netlink; either outcome is acceptable, a panic is not.
        match NetlinkSource::open() {
            Ok(mut source) => {
                let mut buf = Vec::with_capacity(8192);
                assert!(source.recv(&mut buf).is_ok());
            }
            Err(e) => assert!(matches!(e, Error::MonitorUnsupported(_))),
        }
    }
}
