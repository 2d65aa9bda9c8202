//! # ifcib core
//!
//! Discovers the host's interfaces and keeps one characteristics record
//! (CIB node) per interface current.
//!
//! * [`enumerator`] snapshots interfaces and addresses.
//! * [`resolver`] picks the local address that reaches a destination.
//! * [`builder`] encodes interfaces as records.
//! * [`monitor`] turns kernel link notifications into rebuild signals.
//! * [`discovery`] ties building, storing and watching together.
//! * [`system`] and [`store`] are the host and filesystem adapters.

pub mod builder;
pub mod discovery;
pub mod enumerator;
pub mod monitor;
pub mod resolver;
pub mod store;
pub mod system;
