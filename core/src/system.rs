use std::net::Ipv4Addr;

use ifcib_common::error::{Error, Result};
use ifcib_common::network::environment::{Gateway, NetworkEnvironment, Snapshot};
use ifcib_common::network::interface::BoundAddress;
use pnet::datalink::{self, NetworkInterface as DatalinkInterface};
use pnet::ipnetwork::IpNetwork;
use tracing::debug;

/// The live host, queried through `pnet::datalink` for interfaces and
/// `netdev` for the default route.
pub struct SystemEnvironment;

impl NetworkEnvironment for SystemEnvironment {
    fn interface_names(&self) -> Result<Vec<String>> {
        Ok(datalink::interfaces().into_iter().map(|i| i.name).collect())
    }

    fn addresses(&self, name: &str) -> Result<Vec<BoundAddress>> {
        datalink::interfaces()
            .into_iter()
            .find(|i| i.name == name)
            .map(|i| to_bound_addresses(&i))
            .ok_or_else(|| Error::DiscoveryUnavailable(format!("interface {name} disappeared")))
    }

    fn default_gateway(&self) -> Result<Option<Gateway>> {
        match netdev::get_default_interface() {
            Ok(iface) => {
                let via: &[Ipv4Addr] = iface.gateway.as_ref().map(|gw| gw.ipv4.as_slice()).unwrap_or_default();
                Ok(select_gateway(&iface.name, via))
            }
            // With no interfaces at all the OS query itself is broken; otherwise
            // there simply is no default route.
            Err(e) if datalink::interfaces().is_empty() => {
                Err(Error::DiscoveryUnavailable(format!("default route lookup: {e}")))
            }
            Err(e) => {
                debug!("no default interface: {e}");
                Ok(None)
            }
        }
    }

    /// One `datalink` query for the whole pass.
    fn snapshot(&self) -> Result<Snapshot> {
        Ok(datalink::interfaces()
            .into_iter()
            .map(|iface| {
                let addresses = to_bound_addresses(&iface);
                (iface.name, Ok(addresses))
            })
            .collect())
    }
}

/// First usable IPv4 next hop reported for the default interface.
fn select_gateway(interface: &str, via: &[Ipv4Addr]) -> Option<Gateway> {
    via.iter()
        .find(|addr| !addr.is_unspecified())
        .map(|addr| Gateway {
            address: *addr,
            interface: interface.to_string(),
        })
}

fn to_bound_addresses(interface: &DatalinkInterface) -> Vec<BoundAddress> {
    let mut addresses: Vec<BoundAddress> = interface
        .ips
        .iter()
        .map(|net| match net {
            IpNetwork::V4(v4) => BoundAddress::ipv4(v4.ip().to_string(), v4.mask().to_string()),
            IpNetwork::V6(v6) => BoundAddress::ipv6(v6.ip().to_string()),
        })
        .collect();

    if let Some(mac) = interface.mac {
        addresses.push(BoundAddress::link(mac.to_string()));
    }
    addresses
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
