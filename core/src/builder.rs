//! # Characteristics Record Builder
//!
//! Encodes each local interface as a [`CharacteristicsRecord`]: the
//! interface-level facts (`interface`, `local_interface`) merged into one
//! alternative per bound address (`local_ip`, `ip_version`). Every fact is
//! emitted at [`Precedence::Immutable`](ifcib_common::cib::property::Precedence::Immutable).

use ifcib_common::cib::property::{Property, PropertyAlternative};
use ifcib_common::cib::record::{CharacteristicsRecord, NEVER_EXPIRES};
use ifcib_common::error::Result;
use ifcib_common::network::environment::NetworkEnvironment;
use ifcib_common::network::interface::{BoundAddress, NetworkInterface};
use tracing::{debug, trace, warn};

use crate::enumerator;

pub use ifcib_common::cib::record::{KEY_INTERFACE, KEY_IP_VERSION, KEY_LOCAL_INTERFACE, KEY_LOCAL_IP};

pub const CIB_EXTENSION: &str = "cib";

pub struct CibBuilder<E> {
    env: E,
}

impl<E: NetworkEnvironment> CibBuilder<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Records for the current host state.
    ///
    /// The environment is queried once when this is called; each record is
    /// then built as the iterator is advanced. Interfaces without a usable
    /// address yield nothing. Nothing carries over between calls.
    pub fn records(&self) -> impl Iterator<Item = CharacteristicsRecord> + '_ {
        enumerator::list_interfaces(&self.env)
            .into_iter()
            .filter_map(|iface| build_record(&iface))
    }

    /// [`Self::records`], each serialized to its JSON document.
    pub fn build_all(&self) -> impl Iterator<Item = Result<String>> + '_ {
        self.records().map(|record| record.to_json())
    }
}

/// Builds the record for one interface, or `None` when it has no address of
/// a recognized family.
pub fn build_record(interface: &NetworkInterface) -> Option<CharacteristicsRecord> {
    let facts: PropertyAlternative = match interface_facts(&interface.name) {
        Ok(facts) => facts,
        Err(e) => {
            warn!(interface = %interface.name, "{e}");
            return None;
        }
    };

    let alternatives: Vec<PropertyAlternative> = interface
        .addresses
        .iter()
        .filter_map(|addr| match address_alternative(&facts, addr) {
            Ok(alt) => alt,
            Err(e) => {
                warn!(interface = %interface.name, address = %addr.address, "{e}");
                None
            }
        })
        .collect();

    if alternatives.is_empty() {
        debug!(interface = %interface.name, "no usable addresses, no record");
        return None;
    }

    Some(CharacteristicsRecord {
        uid: interface.name.clone(),
        description: format!("autogenerated CIB node for local interface {}", interface.name),
        root: true,
        filename: format!("{}.{CIB_EXTENSION}", interface.name),
        expire: NEVER_EXPIRES,
        properties: alternatives,
    })
}

/// Facts shared by every alternative of one interface.
pub fn interface_facts(name: &str) -> Result<PropertyAlternative> {
    let mut facts = PropertyAlternative::new();
    facts.insert(Property::immutable(KEY_INTERFACE, name))?;
    facts.insert(Property::immutable(KEY_LOCAL_INTERFACE, true))?;
    Ok(facts)
}

fn address_alternative(facts: &PropertyAlternative, addr: &BoundAddress) -> Result<Option<PropertyAlternative>> {
    let Some(version) = addr.family.ip_version() else {
        trace!(family = %addr.family, "skipping unrecognized address family");
        return Ok(None);
    };

    let mut alt = PropertyAlternative::new();
    alt.insert(Property::immutable(KEY_LOCAL_IP, addr.address.as_str()))?;
    alt.insert(Property::immutable(KEY_IP_VERSION, version))?;
    alt.merge(facts)?;
    Ok(Some(alt))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
