use std::io;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use thiserror::Error;

use crate::cib::property::PropertyValue;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure is scoped to the operation that produced it; none of these
/// should take the hosting process down.
#[derive(Debug, Error)]
pub enum Error {
    /// A malformed address or mask. Callers scanning many addresses skip the
    /// offending entry and carry on.
    #[error("invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    /// The OS query facility is missing or failing.
    #[error("interface discovery unavailable: {0}")]
    DiscoveryUnavailable(String),

    /// No interface subnet contains the destination and there is no usable
    /// default gateway.
    #[error("no route found to {destination}")]
    NoRouteFound { destination: Ipv4Addr },

    /// The raw kernel event socket cannot be used on this host.
    #[error("link monitoring unsupported: {0}")]
    MonitorUnsupported(String),

    #[error("immutable property '{key}' already holds {existing}, refusing {incoming}")]
    PropertyConflict {
        key: String,
        existing: PropertyValue,
        incoming: PropertyValue,
    },

    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage failure at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn invalid_address(value: impl Into<String>, reason: impl ToString) -> Self {
        Error::InvalidAddress {
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
