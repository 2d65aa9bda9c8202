//! # Characteristics Information Base
//!
//! A CIB node describes one local interface as a set of alternative
//! property sets. See [`record::CharacteristicsRecord`].

pub mod property;
pub mod record;
pub mod store;
