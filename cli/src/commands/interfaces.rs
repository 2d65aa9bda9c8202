use colored::*;
use ifcib_common::network::interface::{BoundAddress, NetworkInterface};
use ifcib_core::enumerator;
use ifcib_core::system::SystemEnvironment;

use crate::terminal::{colors, print};

pub fn interfaces() -> anyhow::Result<()> {
    let interfaces: Vec<NetworkInterface> = enumerator::try_list_interfaces(&SystemEnvironment)?;

    for (idx, interface) in interfaces.iter().enumerate() {
        print::tree_head(idx, &interface.name);
        if interface.addresses.is_empty() {
            print::as_tree_one_level(vec![("None".to_string(), "no IP addresses".dimmed())]);
            continue;
        }
        let details: Vec<(String, ColoredString)> = interface.addresses.iter().map(to_detail).collect();
        print::as_tree_one_level(details);
    }
    Ok(())
}

fn to_detail(addr: &BoundAddress) -> (String, ColoredString) {
    let value: ColoredString = match &addr.netmask {
        Some(mask) => format!("{}{}{}", print::address(&addr.address), " / ".color(colors::SEPARATOR), mask).normal(),
        None => print::address(&addr.address),
    };
    (addr.family.to_string(), value)
}
