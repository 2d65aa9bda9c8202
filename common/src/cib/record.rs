use serde::{Deserialize, Serialize};

use crate::cib::property::{Property, PropertyAlternative};
use crate::error::Result;

/// `expire` value for records that never go stale.
pub const NEVER_EXPIRES: i64 = -1;

pub const KEY_INTERFACE: &str = "interface";
pub const KEY_LOCAL_INTERFACE: &str = "local_interface";
pub const KEY_LOCAL_IP: &str = "local_ip";
pub const KEY_IP_VERSION: &str = "ip_version";

/// Facts about the interface itself, as opposed to one of its addresses.
pub const INTERFACE_FACT_KEYS: [&str; 2] = [KEY_INTERFACE, KEY_LOCAL_INTERFACE];

/// A CIB node: everything discovered about one interface in one pass.
///
/// Records are rebuilt from scratch on every discovery pass; a newer record
/// supersedes an older one with the same `filename` rather than mutating it.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct CharacteristicsRecord {
    /// Interface name, the sole stable identifier.
    pub uid: String,
    pub description: String,
    /// Set for records sourced from local-host autodiscovery.
    pub root: bool,
    /// Persistence target, `<interface>.cib`.
    pub filename: String,
    pub expire: i64,
    /// One alternative per bound address.
    pub properties: Vec<PropertyAlternative>,
}

impl CharacteristicsRecord {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn never_expires(&self) -> bool {
        self.expire == NEVER_EXPIRES
    }

    /// True when every alternative carries `property` with the same value.
    pub fn holds_in_every_alternative(&self, property: &Property) -> bool {
        self.properties.iter().all(|alt| {
            alt.get(property.key())
                .is_some_and(|p| p.value() == property.value() && p.precedence() == property.precedence())
        })
    }

    /// True when each interface-level fact is IMMUTABLE and holds one value
    /// in every alternative. Address facts such as `local_ip` are allowed to
    /// differ between alternatives.
    pub fn immutable_facts_consistent(&self) -> bool {
        INTERFACE_FACT_KEYS.iter().all(|key| {
            let mut values = self
                .properties
                .iter()
                .map(|alt| alt.get(key).filter(|p| p.is_immutable()).map(|p| p.value()));
            match values.next() {
                None => true,
                Some(None) => false,
                Some(Some(first)) => values.all(|v| v == Some(first)),
            }
        })
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
