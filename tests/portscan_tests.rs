use std::time::Duration;

use sec_audit_rs::portscan;
use tokio::net::TcpListener;

const TIMEOUT: Duration = Duration::from_millis(400);

#[tokio::test]
async fn open_port_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ok");
    let port = listener.local_addr().expect("addr ok").port();

    let report = portscan::scan("127.0.0.1", vec![port], 16, TIMEOUT)
        .await
        .expect("scan ok");

    assert_eq!(report.scanned_total, 1);
    assert_eq!(report.open_count, 1);
    assert_eq!(report.findings[0].port, port);
    assert_eq!(report.findings[0].ip, "127.0.0.1");
}

#[tokio::test]
async fn reported_ports_stay_inside_the_requested_range() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ok");
    let port = listener.local_addr().expect("addr ok").port();

    let requested: Vec<u16> = vec![port - 1, port, port + 1];
    let report = portscan::scan("127.0.0.1", requested.clone(), 16, TIMEOUT)
        .await
        .expect("scan ok");

    assert!(report.findings.iter().any(|f| f.port == port));
    assert!(report
        .findings
        .iter()
        .all(|f| requested.contains(&f.port)));
}

#[tokio::test]
async fn closed_port_is_not_reported() {
    // Bind to grab a free port, then drop the listener so the port is closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ok");
    let port = listener.local_addr().expect("addr ok").port();
    drop(listener);

    let report = portscan::scan("127.0.0.1", vec![port], 16, TIMEOUT)
        .await
        .expect("scan ok");

    assert_eq!(report.open_count, 0);
    assert!(report.findings.is_empty());
    // The closed port still counts as scanned.
    assert_eq!(report.scanned_done, 1);
}

#[tokio::test]
async fn unresolvable_hostname_is_fatal() {
    let result = portscan::scan(
        "definitely-not-a-real-host.invalid",
        vec![80],
        16,
        TIMEOUT,
    )
    .await;
    assert!(result.is_err());
}
