use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use ifcib_common::cib::property::PropertyValue;
use ifcib_common::cib::store::CibStore;
use ifcib_common::network::environment::StaticEnvironment;
use ifcib_common::network::interface::BoundAddress;
use ifcib_core::builder::{CibBuilder, KEY_LOCAL_IP, interface_facts};
use ifcib_core::discovery::DiscoveryService;
use ifcib_core::monitor::{LinkChangeKind, LinkWatch, RTM_DELLINK, RTM_NEWLINK};
use ifcib_core::resolver;
use ifcib_core::store::JsonCibStore;
use tokio::sync::oneshot;

use crate::support::{SwappableHost, kernel_channel};

fn office() -> StaticEnvironment {
    StaticEnvironment::new()
        .with_interface("lo", vec![BoundAddress::link("00:00:00:00:00:00")])
        .with_interface(
            "eth0",
            vec![
                BoundAddress::ipv4("10.0.0.5", "255.255.255.0"),
                BoundAddress::ipv6("fe80::5"),
            ],
        )
        .with_gateway(Ipv4Addr::new(10, 0, 0, 1), "eth0")
}

async fn wait_for(path: &Path) -> bool {
    for _ in 0..200 {
        if path.exists() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[test]
fn discovery_pass_persists_and_reloads_records() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = JsonCibStore::new(dir.path());
    let service = DiscoveryService::new(office(), JsonCibStore::new(dir.path()));

    let report = service.run_once();
    assert_eq!(report.saved.len(), 1, "lo has no IP addresses and must not produce a record");
    assert!(!dir.path().join("lo.cib").exists());

    let loaded = store.load("eth0.cib")?;
    assert_eq!(loaded, report.saved[0].record);
    assert_eq!(loaded.properties.len(), 2);
    assert!(loaded.immutable_facts_consistent());
    for fact in interface_facts("eth0")?.iter() {
        assert!(loaded.holds_in_every_alternative(fact));
    }
    Ok(())
}

#[test]
fn resolver_and_builder_agree_on_local_addresses() -> anyhow::Result<()> {
    let env = office();

    let local = resolver::resolve_local_address(&env, "8.8.8.8")?;
    assert_eq!(local, Ipv4Addr::new(10, 0, 0, 5));

    let record = CibBuilder::new(&env).records().next().expect("eth0 record");
    let advertised: Vec<&PropertyValue> = record
        .properties
        .iter()
        .filter_map(|alt| alt.get(KEY_LOCAL_IP).map(|p| p.value()))
        .collect();
    assert!(advertised.contains(&&PropertyValue::from(local.to_string())));
    Ok(())
}

#[tokio::test]
async fn link_change_triggers_rediscovery() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let host = SwappableHost::new(office());
    let service = DiscoveryService::new(host.clone(), JsonCibStore::new(dir.path()))
        .with_debounce(Duration::from_millis(5));

    let (feed, source) = kernel_channel();
    let mut link_watch = LinkWatch::with_source(source)?;
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let driver = async {
        assert!(wait_for(&dir.path().join("eth0.cib")).await, "initial pass did not run");

        host.replace(office().with_interface("wlan0", vec![BoundAddress::ipv4("192.168.7.2", "255.255.255.0")]));
        feed.send(RTM_NEWLINK, 1);

        let appeared = wait_for(&dir.path().join("wlan0.cib")).await;
        let _ = stop_tx.send(());
        appeared
    };

    let shutdown = async {
        let _ = stop_rx.await;
    };

    let (passes, appeared) = tokio::join!(service.watch(&mut link_watch.events, shutdown), driver);
    link_watch.stop();

    assert!(appeared, "new interface was not rediscovered");
    assert!(passes >= 2);
    Ok(())
}

#[tokio::test]
async fn watch_delivers_link_removal_and_stops_on_cancel() -> anyhow::Result<()> {
    let (feed, source) = kernel_channel();
    let mut link_watch = LinkWatch::with_source(source)?;

    feed.send(RTM_DELLINK, 9);
    let event = tokio::time::timeout(Duration::from_secs(2), link_watch.events.recv())
        .await?
        .expect("event");
    assert_eq!(event.kind, LinkChangeKind::Disappeared);
    assert_eq!(event.sequence, 9);

    link_watch.stop();
    feed.send(RTM_NEWLINK, 10);
    assert!(link_watch.events.recv().await.is_none(), "no events after cancellation");
    Ok(())
}
