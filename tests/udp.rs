// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::net::UdpSocket;
use std::time::Duration;
use tempo::{ClientConfig, QueuingTransport, StatsdClient, UdpTransport};

mod utils;
use utils::{run_arc_threaded_test, Recorder, NUM_ITERATIONS, NUM_THREADS};

fn new_server() -> (UdpSocket, u16) {
    let server = UdpSocket::bind("127.0.0.1:0").unwrap();
    server.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    let port = server.local_addr().unwrap().port();
    (server, port)
}

fn recv_line(server: &UdpSocket) -> String {
    let mut buf = [0u8; 512];
    let n = server.recv(&mut buf).unwrap();
    String::from_utf8(buf[..n].to_vec()).unwrap()
}

fn new_udp_client(prefix: &str, port: u16) -> StatsdClient {
    StatsdClient::builder()
        .host("127.0.0.1")
        .port(port)
        .prefix(prefix)
        .build()
        .unwrap()
}

#[test]
fn test_statsd_client_udp_delivers_lines() {
    let (server, port) = new_server();
    let client = new_udp_client("tempo.", port);
    let recorder = Recorder::new();

    client.increment("hits").send_with(recorder.callback());
    recorder.wait_for(1);

    assert_eq!("tempo.hits:1|c", recv_line(&server));
    assert_eq!(vec![14], recorder.bytes());
}

#[test]
fn test_statsd_client_udp_fan_out() {
    let (server, port) = new_server();
    let client = new_udp_client("", port);
    let recorder = Recorder::new();

    client.timing(["a", "b"], 9).with_tag("x").send_with(recorder.callback());
    recorder.wait_for(1);

    let mut lines = vec![recv_line(&server), recv_line(&server)];
    lines.sort();

    assert_eq!(vec!["a:9|ms|#x", "b:9|ms|#x"], lines);
    assert_eq!(vec![18], recorder.bytes());
}

#[test]
fn test_statsd_client_udp_positional_config() {
    let (server, port) = new_server();
    let client = StatsdClient::from_host("127.0.0.1", port).unwrap();

    client.gauge("g", 3).send();

    assert_eq!("g:3|g", recv_line(&server));
}

#[test]
fn test_statsd_client_udp_cache_dns() {
    let (server, port) = new_server();
    let client = StatsdClient::new(ClientConfig {
        host: "localhost".to_string(),
        port,
        cache_dns: true,
        ..Default::default()
    })
    .unwrap();

    for _ in 0..5_000 {
        if client.host() != "localhost" {
            break;
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    assert_eq!("127.0.0.1", client.host());
    client.increment("resolved").send();
    assert_eq!("resolved:1|c", recv_line(&server));
}

#[test]
fn test_statsd_client_udp_close() {
    let (_server, port) = new_server();
    let client = new_udp_client("", port);
    let recorder = Recorder::new();

    client.close();
    client.increment("late").send_with(recorder.callback());
    recorder.wait_for(1);

    assert_eq!(1, recorder.errors());
}

#[test]
fn test_statsd_client_udp_stats() {
    let (server, port) = new_server();
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let client = StatsdClient::builder()
        .host("127.0.0.1")
        .port(port)
        .with_transport(QueuingTransport::from(UdpTransport::from(socket)))
        .build()
        .unwrap();
    let recorder = Recorder::new();

    client.set("s", 1).send_with(recorder.callback());
    recorder.wait_for(1);
    recv_line(&server);

    let stats = client.stats();
    assert_eq!(1, stats.packets_sent);
    assert_eq!(5, stats.bytes_sent);
}

#[test]
fn test_statsd_client_udp_single_threaded() {
    let (_server, port) = new_server();
    let client = new_udp_client("tempo", port);
    run_arc_threaded_test(client, 1, 1);
}

#[ignore]
#[test]
fn test_statsd_client_udp_many_threaded() {
    let (_server, port) = new_server();
    let client = new_udp_client("tempo", port);
    run_arc_threaded_test(client, NUM_THREADS, NUM_ITERATIONS);
}
