//! Walks the netlink messages packed into one datagram.

use netlink_packet_core::{NetlinkBuffer, NetlinkHeader};

/// Size of the fixed netlink message header.
pub const NLMSG_HDRLEN: usize = 16;
const NLMSG_ALIGNTO: usize = 4;

/// One message header found in a datagram.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Message {
    pub header: NetlinkHeader,
    /// The datagram ended before the message did. The header is still
    /// trustworthy, the payload is not.
    pub truncated: bool,
}

/// Offset from one message to the next for a message of `length` bytes.
pub fn aligned_length(length: u32) -> usize {
    (length as usize).saturating_add(NLMSG_ALIGNTO - 1) & !(NLMSG_ALIGNTO - 1)
}

fn header_of<T: AsRef<[u8]>>(buf: &NetlinkBuffer<T>) -> NetlinkHeader {
    let mut header = NetlinkHeader::default();
    header.length = buf.length();
    header.message_type = buf.message_type();
    header.flags = buf.flags();
    header.sequence_number = buf.sequence_number();
    header.port_number = buf.port_number();
    header
}

/// Yields the messages of `datagram` in order.
///
/// A message cut short by the end of the datagram is still yielded, marked
/// truncated, and ends the walk. So does a header whose length is shorter
/// than the header itself, which is dropped.
pub fn messages(datagram: &[u8]) -> impl Iterator<Item = Message> + '_ {
    let mut offset: usize = 0;
    std::iter::from_fn(move || {
        let rest: &[u8] = datagram.get(offset..)?;
        match NetlinkBuffer::new_checked(rest) {
            Ok(buf) => {
                let header = header_of(&buf);
                offset = offset.saturating_add(aligned_length(header.length));
                Some(Message {
                    header,
                    truncated: false,
                })
            }
            Err(_) if rest.len() >= NLMSG_HDRLEN => {
                offset = datagram.len();
                let header = header_of(&NetlinkBuffer::new(rest));
                if (header.length as usize) < NLMSG_HDRLEN {
                    return None;
                }
                Some(Message {
                    header,
                    truncated: true,
                })
            }
            Err(_) => {
                offset = datagram.len();
                None
            }
        }
    })
}

/// Encodes one message of `payload_len` zero bytes, padded to alignment.
pub fn encode(message_type: u16, sequence: u32, payload_len: usize) -> Vec<u8> {
    let length = (NLMSG_HDRLEN + payload_len) as u32;
    let mut bytes = vec![0u8; aligned_length(length)];
    {
        let mut buf = NetlinkBuffer::new(&mut bytes[..]);
        buf.set_length(length);
        buf.set_message_type(message_type);
        buf.set_flags(0);
        buf.set_sequence_number(sequence);
        buf.set_port_number(0);
    }
    bytes
}
