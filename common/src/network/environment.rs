use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::network::interface::{BoundAddress, NetworkInterface};

/// Interface names paired with their addresses, or the error reading them.
pub type Snapshot = Vec<(String, Result<Vec<BoundAddress>>)>;

/// The default IPv4 route as the OS reports it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Gateway {
    pub address: Ipv4Addr,
    pub interface: String,
}

/// Capability supplying the host's interface, address and gateway state.
///
/// Implementations report [`crate::error::Error::DiscoveryUnavailable`] when
/// the underlying query mechanism is missing or failing.
pub trait NetworkEnvironment {
    /// Interface names in OS order.
    fn interface_names(&self) -> Result<Vec<String>>;

    /// Every address bound to `name`, all families, in OS order.
    fn addresses(&self, name: &str) -> Result<Vec<BoundAddress>>;

    fn default_gateway(&self) -> Result<Option<Gateway>>;

    /// Every interface with its addresses, in OS order, as one consistent
    /// query. An interface whose addresses cannot be read carries the error.
    ///
    /// The default asks [`Self::addresses`] once per name; implementations
    /// that can list everything at once should override it.
    fn snapshot(&self) -> Result<Snapshot> {
        Ok(self
            .interface_names()?
            .into_iter()
            .map(|name| {
                let addresses = self.addresses(&name);
                (name, addresses)
            })
            .collect())
    }
}

impl<T: NetworkEnvironment + ?Sized> NetworkEnvironment for &T {
    fn interface_names(&self) -> Result<Vec<String>> {
        (**self).interface_names()
    }

    fn addresses(&self, name: &str) -> Result<Vec<BoundAddress>> {
        (**self).addresses(name)
    }

    fn default_gateway(&self) -> Result<Option<Gateway>> {
        (**self).default_gateway()
    }

    fn snapshot(&self) -> Result<Snapshot> {
        (**self).snapshot()
    }
}

impl<T: NetworkEnvironment + ?Sized> NetworkEnvironment for Arc<T> {
    fn interface_names(&self) -> Result<Vec<String>> {
        (**self).interface_names()
    }

    fn addresses(&self, name: &str) -> Result<Vec<BoundAddress>> {
        (**self).addresses(name)
    }

    fn default_gateway(&self) -> Result<Option<Gateway>> {
        (**self).default_gateway()
    }

    fn snapshot(&self) -> Result<Snapshot> {
        (**self).snapshot()
    }
}

/// A fixed snapshot standing in for the host, for replaying captured state
/// or driving discovery without touching real interfaces.
#[derive(Debug, Default, Clone)]
pub struct StaticEnvironment {
    interfaces: Vec<NetworkInterface>,
    gateway: Option<Gateway>,
    unavailable: bool,
}

impl StaticEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interface(mut self, name: &str, addresses: Vec<BoundAddress>) -> Self {
        self.interfaces.push(NetworkInterface::new(name, addresses));
        self
    }

    pub fn with_gateway(mut self, address: Ipv4Addr, interface: &str) -> Self {
        self.gateway = Some(Gateway {
            address,
            interface: interface.to_string(),
        });
        self
    }

    /// Every query fails as if the OS facility were missing.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(Error::DiscoveryUnavailable("static environment marked unavailable".into()));
        }
        Ok(())
    }
}

impl NetworkEnvironment for StaticEnvironment {
    fn interface_names(&self) -> Result<Vec<String>> {
        self.check_available()?;
        Ok(self.interfaces.iter().map(|i| i.name.clone()).collect())
    }

    fn addresses(&self, name: &str) -> Result<Vec<BoundAddress>> {
        self.check_available()?;
        self.interfaces
            .iter()
            .find(|i| i.name == name)
            .map(|i| i.addresses.clone())
            .ok_or_else(|| Error::DiscoveryUnavailable(format!("no such interface: {name}")))
    }

    fn default_gateway(&self) -> Result<Option<Gateway>> {
        self.check_available()?;
        Ok(self.gateway.clone())
    }
}
