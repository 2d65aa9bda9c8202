use std::net::Ipv4Addr;

use colored::*;
use ifcib_common::config::Config;
use ifcib_core::resolver;
use ifcib_core::system::SystemEnvironment;

use crate::terminal::{colors, print};

pub fn resolve(destination: &str, cfg: &Config) -> anyhow::Result<()> {
    let local: Ipv4Addr = resolver::resolve_local_address(&SystemEnvironment, destination)?;

    if cfg.quiet {
        print::print(&local.to_string());
        return Ok(());
    }

    print::aligned_line("Destination", destination.color(colors::IPV4_ADDR));
    print::aligned_line("Local address", local.to_string().color(colors::IPV4_ADDR).bold());
    Ok(())
}
