//! # Property Model
//!
//! A [`Property`] is one typed fact tagged with a [`Precedence`]. Properties
//! describing one coherent configuration choice are grouped into a
//! [`PropertyAlternative`], in which keys are unique and precedence decides
//! what a later insert may override.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How strongly a fact is held. Ordered from weakest to strongest.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Precedence {
    Optional = 0,
    Recommended = 1,
    /// Must never be overridden once recorded.
    Immutable = 2,
}

impl From<Precedence> for u8 {
    fn from(precedence: Precedence) -> Self {
        precedence as u8
    }
}

impl TryFrom<u8> for Precedence {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Precedence::Optional),
            1 => Ok(Precedence::Recommended),
            2 => Ok(Precedence::Immutable),
            other => Err(format!("unknown precedence level {other}")),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Integer(i) => write!(f, "{i}"),
            PropertyValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Property {
    key: String,
    value: PropertyValue,
    precedence: Precedence,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<PropertyValue>, precedence: Precedence) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            precedence,
        }
    }

    pub fn immutable(key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self::new(key, value, Precedence::Immutable)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn is_immutable(&self) -> bool {
        self.precedence == Precedence::Immutable
    }
}

/// Wire shape of a property inside an alternative: the key is the map key.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub value: PropertyValue,
    pub precedence: Precedence,
}

/// A set of properties with unique keys describing one configuration choice.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<String, PropertyEntry>",
    from = "BTreeMap<String, PropertyEntry>"
)]
pub struct PropertyAlternative {
    properties: BTreeMap<String, Property>,
}

impl PropertyAlternative {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `property`, resolving a key collision by precedence.
    ///
    /// An immutable property is never replaced by a different value. Otherwise
    /// the incoming property wins when its precedence is at least the stored
    /// one and is dropped when it is weaker.
    pub fn insert(&mut self, property: Property) -> Result<()> {
        if let Some(existing) = self.properties.get(property.key()) {
            if existing.is_immutable() {
                if existing.value != property.value {
                    return Err(Error::PropertyConflict {
                        key: property.key,
                        existing: existing.value.clone(),
                        incoming: property.value,
                    });
                }
                return Ok(());
            }
            if property.precedence < existing.precedence {
                return Ok(());
            }
        }
        self.properties.insert(property.key.clone(), property);
        Ok(())
    }

    pub fn merge(&mut self, other: &PropertyAlternative) -> Result<()> {
        for property in other.iter() {
            self.insert(property.clone())?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    pub fn immutables(&self) -> impl Iterator<Item = &Property> {
        self.iter().filter(|p| p.is_immutable())
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl From<PropertyAlternative> for BTreeMap<String, PropertyEntry> {
    fn from(alternative: PropertyAlternative) -> Self {
        alternative
            .properties
            .into_iter()
            .map(|(key, p)| {
                let entry = PropertyEntry {
                    value: p.value,
                    precedence: p.precedence,
                };
                (key, entry)
            })
            .collect()
    }
}

impl From<BTreeMap<String, PropertyEntry>> for PropertyAlternative {
    fn from(entries: BTreeMap<String, PropertyEntry>) -> Self {
        let properties = entries
            .into_iter()
            .map(|(key, entry)| {
                let property = Property::new(key.clone(), entry.value, entry.precedence);
                (key, property)
            })
            .collect();
        Self { properties }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_is_ordered() {
        assert!(Precedence::Optional < Precedence::Recommended);
        assert!(Precedence::Recommended < Precedence::Immutable);
        assert_eq!(Precedence::try_from(2u8), Ok(Precedence::Immutable));
        assert!(Precedence::try_from(9u8).is_err());
    }

    #[test]
    fn immutable_property_is_never_overridden() {
        let mut alt = PropertyAlternative::new();
        alt.insert(Property::immutable("interface", "eth0")).unwrap();

        let err = alt.insert(Property::immutable("interface", "eth1")).unwrap_err();
        assert!(matches!(err, Error::PropertyConflict { ref key, .. } if key == "interface"));

        let err = alt
            .insert(Property::new("interface", "wlan0", Precedence::Optional))
            .unwrap_err();
        assert!(matches!(err, Error::PropertyConflict { .. }));
        assert_eq!(alt.get("interface").unwrap().value(), &PropertyValue::from("eth0"));
    }

    #[test]
    fn same_immutable_value_is_accepted() {
        let mut alt = PropertyAlternative::new();
        alt.insert(Property::immutable("local_interface", true)).unwrap();
        alt.insert(Property::immutable("local_interface", true)).unwrap();
        assert_eq!(alt.len(), 1);
    }

    #[test]
    fn weaker_precedence_is_dropped_stronger_replaces() {
        let mut alt = PropertyAlternative::new();
        alt.insert(Property::new("mtu", 1500i64, Precedence::Recommended)).unwrap();

        alt.insert(Property::new("mtu", 9000i64, Precedence::Optional)).unwrap();
        assert_eq!(alt.get("mtu").unwrap().value(), &PropertyValue::Integer(1500));

        alt.insert(Property::new("mtu", 1400i64, Precedence::Recommended)).unwrap();
        assert_eq!(alt.get("mtu").unwrap().value(), &PropertyValue::Integer(1400));

        alt.insert(Property::immutable("mtu", 1280i64)).unwrap();
        assert!(alt.get("mtu").unwrap().is_immutable());
    }

    #[test]
    fn merge_carries_every_property() {
        let mut facts = PropertyAlternative::new();
        facts.insert(Property::immutable("interface", "eth0")).unwrap();
        facts.insert(Property::immutable("local_interface", true)).unwrap();

        let mut alt = PropertyAlternative::new();
        alt.insert(Property::immutable("ip_version", 4i64)).unwrap();
        alt.merge(&facts).unwrap();

        assert_eq!(alt.len(), 3);
        assert_eq!(alt.immutables().count(), 3);
    }

    #[test]
    fn alternative_serializes_as_key_to_value_and_precedence() {
        let mut alt = PropertyAlternative::new();
        alt.insert(Property::immutable("ip_version", 6i64)).unwrap();
        alt.insert(Property::new("local_ip", "fe80::1", Precedence::Optional)).unwrap();

        let json = serde_json::to_value(&alt).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ip_version": { "value": 6, "precedence": 2 },
                "local_ip": { "value": "fe80::1", "precedence": 0 },
            })
        );

        let back: PropertyAlternative = serde_json::from_value(json).unwrap();
        assert_eq!(back, alt);
    }
}
