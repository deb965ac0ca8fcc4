// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crossbeam_channel::Receiver;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempo::prelude::*;
use tempo::{ClientConfig, Datagram, ErrorKind, NopTransport, SpyTransport, StatsdClient};

mod utils;
use utils::{run_arc_threaded_test, Recorder, NUM_ITERATIONS, NUM_THREADS};

fn new_spy_client(prefix: &str) -> (Receiver<Datagram>, StatsdClient) {
    let (rx, transport) = SpyTransport::new();
    let client = StatsdClient::builder()
        .prefix(prefix)
        .with_transport(transport)
        .build()
        .unwrap();
    (rx, client)
}

fn new_mock_client(prefix: &str) -> StatsdClient {
    StatsdClient::new(ClientConfig {
        prefix: prefix.to_string(),
        mock: true,
        ..Default::default()
    })
    .unwrap()
}

fn received(rx: &Receiver<Datagram>) -> Vec<String> {
    rx.try_iter()
        .map(|d| String::from_utf8(d.payload).unwrap())
        .collect()
}

struct RefusingTransport {
    attempts: AtomicUsize,
}

impl Transport for RefusingTransport {
    fn send_to(&self, _payload: &[u8], _host: &str, _port: u16) -> io::Result<usize> {
        self.attempts.fetch_add(1, Ordering::AcqRel);
        Err(io::Error::from(io::ErrorKind::ConnectionRefused))
    }
}

#[test]
fn test_statsd_client_line_format() {
    let (rx, client) = new_spy_client("myapp.");

    client.increment("requests").send();
    client.timing("db.query", 320).with_sample_rate(1.0).send();
    client.gauge("pool.size", 12).with_tags(["pool:main", "host:a"]).send();
    client.histogram("payload", 2.25).send();
    client.set("users", -4).send();

    assert_eq!(
        vec![
            "myapp.requests:1|c",
            "myapp.db.query:320|ms",
            "myapp.pool.size:12|g|#pool:main,host:a",
            "myapp.payload:2.25|h",
            "myapp.users:-4|s",
        ],
        received(&rx)
    );
}

#[test]
fn test_statsd_client_sample_rate_and_tags_order() {
    let (rx, transport) = SpyTransport::new();
    let client = StatsdClient::builder()
        .with_transport(transport)
        .with_sample_source(|| 0.0)
        .build()
        .unwrap();

    client
        .timing("t", 5)
        .with_tag("a:b")
        .with_sample_rate(0.1)
        .send();

    assert_eq!(vec!["t:5|ms|@0.1|#a:b"], received(&rx));
}

#[test]
fn test_statsd_client_fan_out_single_callback() {
    let (rx, client) = new_spy_client("");
    let recorder = Recorder::new();

    client
        .increment(vec!["a".to_string(), "b".to_string()])
        .send_with(recorder.callback());

    assert_eq!(vec!["a:1|c", "b:1|c"], received(&rx));
    assert_eq!(vec![10], recorder.bytes());
}

#[test]
fn test_statsd_client_fan_out_first_error() {
    let transport = RefusingTransport {
        attempts: AtomicUsize::new(0),
    };
    let client = StatsdClient::builder().with_transport(transport).build().unwrap();
    let recorder = Recorder::new();

    client.gauge(["a", "b", "c"], 1).send_with(recorder.callback());

    assert_eq!(1, recorder.len());
    assert_eq!(1, recorder.errors());
}

#[test]
fn test_statsd_client_fan_out_sends_every_name_after_error() {
    let (rx, transport) = SpyTransport::with_capacity(1);
    let client = StatsdClient::builder().with_transport(transport).build().unwrap();
    let recorder = Recorder::new();

    // the second and third sends fail on a full queue
    client.gauge(["a", "b", "c"], 1).send_with(recorder.callback());

    assert_eq!(vec!["a:1|g"], received(&rx));
    assert_eq!(1, recorder.errors());
}

#[test]
fn test_statsd_client_mock_mode() {
    let client = new_mock_client("mocked.");
    let recorder = Recorder::new();

    client.timing("a", 1).send_with(recorder.callback());
    client.increment(["b", "c"]).send_with(recorder.callback());

    assert_eq!(vec![0, 0], recorder.bytes());
}

#[test]
fn test_statsd_client_mock_mode_with_sampling() {
    let client = StatsdClient::builder()
        .mock(true)
        .with_sample_source(|| 0.75)
        .build()
        .unwrap();
    let recorder = Recorder::new();

    client.timing("kept", 1).with_sample_rate(0.8).send_with(recorder.callback());
    client.timing("dropped", 1).with_sample_rate(0.5).send_with(recorder.callback());

    assert_eq!(vec![0], recorder.bytes());
}

#[test]
fn test_statsd_client_close_then_send() {
    let (_rx, client) = new_spy_client("");
    let recorder = Recorder::new();

    client.close();
    client.increment("late").send_with(recorder.callback());

    assert_eq!(1, recorder.errors());
}

#[test]
fn test_statsd_client_error_kinds() {
    let err = StatsdClient::builder().port(0).build().unwrap_err();
    assert_eq!(ErrorKind::InvalidInput, err.kind());

    let client = StatsdClient::builder()
        .with_transport(RefusingTransport {
            attempts: AtomicUsize::new(0),
        })
        .build()
        .unwrap();
    let recorder = Recorder::new();
    client.increment("x").send_with(recorder.callback());

    assert_eq!(1, recorder.errors());
}

#[test]
fn test_statsd_client_error_handler() {
    let errors = Arc::new(AtomicUsize::new(0));
    let errors_ref = errors.clone();

    let client = StatsdClient::builder()
        .with_transport(RefusingTransport {
            attempts: AtomicUsize::new(0),
        })
        .with_error_handler(move |err| {
            assert_eq!(ErrorKind::IoError, err.kind());
            errors_ref.fetch_add(1, Ordering::AcqRel);
        })
        .build()
        .unwrap();

    client.timing("x", 1).send();
    client.timing(["y", "z"], 1).send();

    assert_eq!(2, errors.load(Ordering::Acquire));
}

#[test]
fn test_statsd_client_nop_transport_single_threaded() {
    let client = StatsdClient::builder().with_transport(NopTransport).build().unwrap();
    assert_eq!(1, run_arc_threaded_test(client, 1, 1));
}

#[test]
fn test_statsd_client_mock_single_threaded() {
    let client = new_mock_client("tempo");
    assert_eq!(1, run_arc_threaded_test(client, 1, 1));
}

#[ignore]
#[test]
fn test_statsd_client_nop_transport_many_threaded() {
    let client = StatsdClient::builder().with_transport(NopTransport).build().unwrap();
    let expected = (NUM_THREADS * NUM_ITERATIONS) as usize;
    assert_eq!(expected, run_arc_threaded_test(client, NUM_THREADS, NUM_ITERATIONS));
}
