// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempo::{MetricResult, StatsdClient};

pub const NUM_THREADS: u64 = 100;
pub const NUM_ITERATIONS: u64 = 1_000;

/// Results handed to callbacks, in the order the callbacks ran
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<MetricResult<usize>>>>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback(&self) -> impl FnOnce(MetricResult<usize>) + Send + 'static {
        let calls = self.calls.clone();
        move |res| calls.lock().unwrap().push(res)
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn bytes(&self) -> Vec<usize> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|res| *res.as_ref().unwrap())
            .collect()
    }

    pub fn errors(&self) -> usize {
        self.calls.lock().unwrap().iter().filter(|res| res.is_err()).count()
    }

    /// Wait up to five seconds for at least `n` callbacks to have run
    pub fn wait_for(&self, n: usize) {
        for _ in 0..5_000 {
            if self.len() >= n {
                return;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }
}

/// Send every kind of metric from many threads, counting successful
/// callbacks
#[allow(dead_code)]
pub fn run_arc_threaded_test(client: StatsdClient, num_threads: u64, iterations: u64) -> usize {
    let shared_client = Arc::new(client);
    let successes = Arc::new(AtomicUsize::new(0));

    let threads: Vec<_> = (0..num_threads)
        .map(|_| {
            let local_client = Arc::clone(&shared_client);
            let local_successes = Arc::clone(&successes);

            thread::spawn(move || {
                for i in 0..iterations {
                    let ok = local_successes.clone();
                    local_client.increment_by("some.counter", i).send_with(move |res| {
                        if res.is_ok() {
                            ok.fetch_add(1, Ordering::AcqRel);
                        }
                    });
                    local_client.timing("some.timer", i).send();
                    local_client.gauge("some.gauge", i).send();
                    local_client.gauge("some.gauge", i as f64).send();
                    local_client.histogram("some.histogram", i).send();
                    local_client.set("some.set", i as i64).send();
                    thread::sleep(Duration::from_millis(1));
                }
            })
        })
        .collect();

    for t in threads {
        t.join().unwrap();
    }

    successes.load(Ordering::Acquire)
}
