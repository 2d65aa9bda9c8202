//! # ifcib common
//!
//! Domain models and contracts shared by the discovery core and the CLI.
//!
//! * **[`network`]**: interface snapshots, subnet arithmetic and the
//!   [`network::environment::NetworkEnvironment`] port.
//! * **[`cib`]**: the property/precedence model and the characteristics record.
//! * **[`error`]**: the error taxonomy every operation reports through.

pub mod cib;
pub mod config;
pub mod error;
pub mod network;
