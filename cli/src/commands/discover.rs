use std::time::{Duration, Instant};

use colored::*;
use ifcib_common::cib::property::PropertyValue;
use ifcib_common::config::Config;
use ifcib_core::builder::KEY_LOCAL_IP;
use ifcib_core::discovery::{DiscoveryReport, DiscoveryService, SavedRecord};
use ifcib_core::store::JsonCibStore;
use ifcib_core::system::SystemEnvironment;
use tracing::warn;

use crate::terminal::{colors, print};

type Detail = (String, ColoredString);

pub fn discover(cfg: &Config) -> anyhow::Result<()> {
    let service = DiscoveryService::new(SystemEnvironment, JsonCibStore::new(&cfg.output_dir));

    let start_time: Instant = Instant::now();
    let report: DiscoveryReport = service.run_once();

    print_report(&report, start_time.elapsed(), cfg);

    if report.saved.is_empty() && report.failed > 0 {
        anyhow::bail!("none of the {} CIB nodes could be stored", report.failed);
    }
    Ok(())
}

pub fn print_report(report: &DiscoveryReport, total_time: Duration, cfg: &Config) {
    if !cfg.quiet {
        for (idx, saved) in report.saved.iter().enumerate() {
            print_record_tree(saved, idx);
        }
        print::fat_separator();
    }

    if report.failed > 0 {
        warn!("{} CIB node(s) could not be stored", report.failed);
    }

    let nodes: ColoredString = format!("{} CIB nodes", report.saved.len()).bold().green();
    let dir: ColoredString = cfg.output_dir.display().to_string().color(colors::ACCENT);
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    print::print_status(format!("Discovery complete: {nodes} written to {dir} in {total_time}"));
}

fn print_record_tree(saved: &SavedRecord, idx: usize) {
    print::tree_head(idx, &saved.record.uid);

    let mut details: Vec<Detail> = saved
        .record
        .properties
        .iter()
        .filter_map(|alt| match alt.get(KEY_LOCAL_IP)?.value() {
            PropertyValue::Text(ip) => Some(("Address".to_string(), print::address(ip))),
            _ => None,
        })
        .collect();

    details.push(("File".to_string(), saved.path.display().to_string().normal()));
    print::as_tree_one_level(details);
}
