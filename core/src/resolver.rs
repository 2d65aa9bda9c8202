//! # Route Resolver
//!
//! Answers "which local address should be used to reach this destination"
//! with plain subnet membership, falling back to the default gateway's
//! interface. This is not a routing table: the first matching subnet wins,
//! in OS order.

use std::net::Ipv4Addr;

use ifcib_common::error::{Error, Result};
use ifcib_common::network::environment::NetworkEnvironment;
use ifcib_common::network::interface::NetworkInterface;
use ifcib_common::network::subnet;
use tracing::{debug, warn};

use crate::enumerator;

/// Resolves `destination`, given as a dotted quad.
pub fn resolve_local_address<E: NetworkEnvironment + ?Sized>(env: &E, destination: &str) -> Result<Ipv4Addr> {
    resolve_local_ipv4(env, subnet::parse_ipv4(destination)?)
}

pub fn resolve_local_ipv4<E: NetworkEnvironment + ?Sized>(env: &E, destination: Ipv4Addr) -> Result<Ipv4Addr> {
    let interfaces: Vec<NetworkInterface> = enumerator::list_interfaces(env);

    if let Some(local) = find_containing_subnet(&interfaces, destination) {
        return Ok(local);
    }

    gateway_address(env, &interfaces, destination)
}

/// First IPv4 address whose own subnet contains `destination`.
///
/// Entries with a missing or malformed address/mask are skipped.
fn find_containing_subnet(interfaces: &[NetworkInterface], destination: Ipv4Addr) -> Option<Ipv4Addr> {
    interfaces
        .iter()
        .flat_map(|iface| iface.ipv4_addresses().map(move |addr| (iface, addr)))
        .find_map(|(iface, addr)| {
            let Some(mask) = addr.netmask.as_deref() else {
                debug!(interface = %iface.name, address = %addr.address, "IPv4 address without netmask");
                return None;
            };
            match subnet::network_of(&addr.address, mask) {
                Ok(network) if subnet::contains(&network, destination) => subnet::parse_ipv4(&addr.address).ok(),
                Ok(_) => None,
                Err(e) => {
                    debug!(interface = %iface.name, "skipping unusable address: {e}");
                    None
                }
            }
        })
}

fn gateway_address<E: NetworkEnvironment + ?Sized>(
    env: &E,
    interfaces: &[NetworkInterface],
    destination: Ipv4Addr,
) -> Result<Ipv4Addr> {
    let gateway = match env.default_gateway() {
        Ok(Some(gateway)) => gateway,
        Ok(None) => return Err(Error::NoRouteFound { destination }),
        Err(e) => {
            warn!("default gateway lookup failed: {e}");
            return Err(Error::NoRouteFound { destination });
        }
    };
    debug!(gateway = %gateway.address, interface = %gateway.interface, "falling back to default gateway");

    let from_snapshot = interfaces
        .iter()
        .find(|iface| iface.name == gateway.interface)
        .and_then(first_ipv4);
    if let Some(address) = from_snapshot {
        return Ok(address);
    }

    // The gateway interface may have appeared after the snapshot was taken.
    let addresses = env.addresses(&gateway.interface).unwrap_or_default();
    first_ipv4(&NetworkInterface::new(gateway.interface, addresses)).ok_or(Error::NoRouteFound { destination })
}

fn first_ipv4(interface: &NetworkInterface) -> Option<Ipv4Addr> {
    interface
        .ipv4_addresses()
        .find_map(|addr| subnet::parse_ipv4(&addr.address).ok())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
