//! # Subnet Arithmetic
//!
//! Derives the network an IPv4 address/netmask pair belongs to and tests
//! membership against it. Inputs arrive as the dotted-quad strings the OS
//! reported, so parsing failures surface as [`Error::InvalidAddress`].

use std::net::Ipv4Addr;

use pnet::ipnetwork::{Ipv4Network, ipv4_mask_to_prefix};

use crate::error::{Error, Result};

/// Computes the network containing `address` under `mask`.
///
/// The network address is the bitwise AND of the two 32-bit values; the
/// returned [`Ipv4Network`] carries the mask as its prefix length. Masks must
/// be contiguous (`255.255.0.255` is rejected).
pub fn network_of(address: &str, mask: &str) -> Result<Ipv4Network> {
    let address_v4: Ipv4Addr = parse_ipv4(address)?;
    let mask_v4: Ipv4Addr = parse_ipv4(mask)?;
    let prefix: u8 = ipv4_mask_to_prefix(mask_v4).map_err(|e| Error::invalid_address(mask, e))?;

    let network: Ipv4Addr = Ipv4Addr::from(u32::from(address_v4) & u32::from(mask_v4));
    Ipv4Network::new(network, prefix).map_err(|e| Error::invalid_address(mask, e))
}

pub fn contains(network: &Ipv4Network, address: Ipv4Addr) -> bool {
    network.contains(address)
}

/// Like [`contains`], for an address that has not been parsed yet.
pub fn contains_str(network: &Ipv4Network, address: &str) -> Result<bool> {
    Ok(contains(network, parse_ipv4(address)?))
}

pub fn parse_ipv4(value: &str) -> Result<Ipv4Addr> {
    value
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|e| Error::invalid_address(value, e))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
