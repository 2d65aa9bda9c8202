//! # Interface Enumerator
//!
//! Takes a fresh snapshot of the host's interfaces and their IPv4/IPv6
//! addresses. Nothing is cached; each call queries the environment again.

use std::collections::HashSet;

use ifcib_common::error::Result;
use ifcib_common::network::environment::{NetworkEnvironment, Snapshot};
use ifcib_common::network::interface::{BoundAddress, NetworkInterface};
use tracing::{debug, warn};

/// Lists every interface with its IP addresses, in OS order.
///
/// Fails only when the environment cannot list interfaces at all. An
/// interface whose addresses cannot be read is skipped.
pub fn try_list_interfaces<E: NetworkEnvironment + ?Sized>(env: &E) -> Result<Vec<NetworkInterface>> {
    let snapshot: Snapshot = env.snapshot()?;
    let mut seen: HashSet<String> = HashSet::with_capacity(snapshot.len());
    let mut interfaces: Vec<NetworkInterface> = Vec::with_capacity(snapshot.len());

    for (name, addresses) in snapshot {
        if !seen.insert(name.clone()) {
            debug!(interface = %name, "duplicate interface name reported, keeping the first");
            continue;
        }

        match addresses {
            Ok(addresses) => {
                let addresses: Vec<BoundAddress> = addresses
                    .into_iter()
                    .filter(|addr| addr.family.is_recognized())
                    .collect();
                interfaces.push(NetworkInterface::new(name, addresses));
            }
            Err(e) => warn!(interface = %name, "skipping interface: {e}"),
        }
    }

    Ok(interfaces)
}

/// Like [`try_list_interfaces`], but an unavailable environment yields an
/// empty snapshot instead of an error.
pub fn list_interfaces<E: NetworkEnvironment + ?Sized>(env: &E) -> Vec<NetworkInterface> {
    match try_list_interfaces(env) {
        Ok(interfaces) => interfaces,
        Err(e) => {
            warn!("{e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifcib_common::error::Error;
    use ifcib_common::network::environment::{Gateway, StaticEnvironment};

    #[test]
    fn keeps_only_ip_families_in_os_order() {
        let env = StaticEnvironment::new()
            .with_interface(
                "eth0",
                vec![
                    BoundAddress::link("01:02:03:04:05:06"),
                    BoundAddress::ipv4("192.168.1.10", "255.255.255.0"),
                    BoundAddress::ipv6("fe80::1"),
                ],
            )
            .with_interface("lo", vec![BoundAddress::link("00:00:00:00:00:00")]);

        let interfaces = list_interfaces(&env);
        assert_eq!(interfaces.len(), 2);
        assert_eq!(interfaces[0].name, "eth0");
        assert_eq!(
            interfaces[0].addresses,
            vec![
                BoundAddress::ipv4("192.168.1.10", "255.255.255.0"),
                BoundAddress::ipv6("fe80::1"),
            ]
        );
        assert!(interfaces[1].addresses.is_empty());
    }

    #[test]
    fn unavailable_environment_yields_empty_snapshot() {
        let env = StaticEnvironment::unavailable();
        assert!(matches!(try_list_interfaces(&env), Err(Error::DiscoveryUnavailable(_))));
        assert!(list_interfaces(&env).is_empty());
    }

    struct FlakyEnvironment;

    impl NetworkEnvironment for FlakyEnvironment {
        fn interface_names(&self) -> Result<Vec<String>> {
            Ok(vec!["eth0".into(), "gone0".into(), "eth0".into()])
        }

        fn addresses(&self, name: &str) -> Result<Vec<BoundAddress>> {
            match name {
                "eth0" => Ok(vec![BoundAddress::ipv4("10.0.0.5", "255.0.0.0")]),
                _ => Err(Error::DiscoveryUnavailable(format!("{name} vanished"))),
            }
        }

        fn default_gateway(&self) -> Result<Option<Gateway>> {
            Ok(None)
        }
    }

    #[test]
    fn failing_interface_is_skipped_and_duplicates_dropped() {
        let interfaces = list_interfaces(&FlakyEnvironment);
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].name, "eth0");
    }

    /// Lists everything in one query and counts per-interface lookups.
    struct BulkEnvironment {
        lookups: std::cell::Cell<usize>,
    }

    impl NetworkEnvironment for BulkEnvironment {
        fn interface_names(&self) -> Result<Vec<String>> {
            Ok(vec!["eth0".into(), "wlan0".into()])
        }

        fn addresses(&self, name: &str) -> Result<Vec<BoundAddress>> {
            self.lookups.set(self.lookups.get() + 1);
            Err(Error::DiscoveryUnavailable(format!("{name} looked up one by one")))
        }

        fn default_gateway(&self) -> Result<Option<Gateway>> {
            Ok(None)
        }

        fn snapshot(&self) -> Result<Snapshot> {
            Ok(vec![
                ("eth0".into(), Ok(vec![BoundAddress::ipv4("10.0.0.5", "255.0.0.0")])),
                ("wlan0".into(), Err(Error::DiscoveryUnavailable("wlan0 vanished".into()))),
            ])
        }
    }

    #[test]
    fn bulk_snapshot_is_one_query() {
        let env = BulkEnvironment {
            lookups: std::cell::Cell::new(0),
        };
        let interfaces = list_interfaces(&env);
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].addresses, vec![BoundAddress::ipv4("10.0.0.5", "255.0.0.0")]);
        assert_eq!(env.lookups.get(), 0);
    }

    #[test]
    fn repeated_calls_are_independent_snapshots() {
        let env = StaticEnvironment::new().with_interface("eth0", vec![BoundAddress::ipv6("::1")]);
        assert_eq!(list_interfaces(&env), list_interfaces(&env));
    }
}
