use std::fmt;

/// Address family an OS reported a bound address under.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    /// Link-layer (hardware) address.
    Link,
    /// Any other family, identified by its raw OS number.
    Other(u16),
}

impl AddressFamily {
    /// The `ip_version` a record advertises for this family, if it is one we
    /// describe at all.
    pub fn ip_version(self) -> Option<i64> {
        match self {
            AddressFamily::Ipv4 => Some(4),
            AddressFamily::Ipv6 => Some(6),
            AddressFamily::Link | AddressFamily::Other(_) => None,
        }
    }

    pub fn is_recognized(self) -> bool {
        self.ip_version().is_some()
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "IPv4"),
            AddressFamily::Ipv6 => write!(f, "IPv6"),
            AddressFamily::Link => write!(f, "Link"),
            AddressFamily::Other(n) => write!(f, "AF({n})"),
        }
    }
}

/// One address bound to an interface, as the OS reported it.
///
/// Values stay as strings until subnet arithmetic needs them; a malformed
/// entry only invalidates itself.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct BoundAddress {
    pub family: AddressFamily,
    pub address: String,
    /// Present for IPv4 only.
    pub netmask: Option<String>,
}

impl BoundAddress {
    pub fn ipv4(address: impl Into<String>, netmask: impl Into<String>) -> Self {
        Self {
            family: AddressFamily::Ipv4,
            address: address.into(),
            netmask: Some(netmask.into()),
        }
    }

    pub fn ipv6(address: impl Into<String>) -> Self {
        Self {
            family: AddressFamily::Ipv6,
            address: address.into(),
            netmask: None,
        }
    }

    pub fn link(address: impl Into<String>) -> Self {
        Self {
            family: AddressFamily::Link,
            address: address.into(),
            netmask: None,
        }
    }
}

/// Read-only snapshot of one OS interface. Re-queried on demand, never mutated.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NetworkInterface {
    pub name: String,
    pub addresses: Vec<BoundAddress>,
}

impl NetworkInterface {
    pub fn new(name: impl Into<String>, addresses: Vec<BoundAddress>) -> Self {
        Self {
            name: name.into(),
            addresses,
        }
    }

    pub fn ipv4_addresses(&self) -> impl Iterator<Item = &BoundAddress> {
        self.addresses
            .iter()
            .filter(|addr| addr.family == AddressFamily::Ipv4)
    }

    pub fn recognized_addresses(&self) -> impl Iterator<Item = &BoundAddress> {
        self.addresses.iter().filter(|addr| addr.family.is_recognized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ip_families_are_recognized() {
        assert_eq!(AddressFamily::Ipv4.ip_version(), Some(4));
        assert_eq!(AddressFamily::Ipv6.ip_version(), Some(6));
        assert!(!AddressFamily::Link.is_recognized());
        assert!(!AddressFamily::Other(17).is_recognized());
    }

    #[test]
    fn ipv4_addresses_keeps_os_order() {
        let iface = NetworkInterface::new(
            "eth0",
            vec![
                BoundAddress::ipv6("fe80::1"),
                BoundAddress::ipv4("10.0.0.5", "255.0.0.0"),
                BoundAddress::link("01:02:03:04:05:06"),
                BoundAddress::ipv4("10.0.0.6", "255.0.0.0"),
            ],
        );
        let v4: Vec<&str> = iface.ipv4_addresses().map(|a| a.address.as_str()).collect();
        assert_eq!(v4, vec!["10.0.0.5", "10.0.0.6"]);
        assert_eq!(iface.recognized_addresses().count(), 3);
    }
}
