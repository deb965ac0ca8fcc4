// Tempo - A callback-driven Statsd client for Rust!
//
// Copyright 2026 Tempo Developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::transport::Completion;
use crate::types::{MetricError, MetricResult};
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Callback for the outcome of sending a metric: the number of bytes
/// written or the error that prevented it.
pub type Callback = Box<dyn FnOnce(MetricResult<usize>) + Send + 'static>;

/// Join over the completions of the datagrams sent for one metric.
///
/// Every datagram of the batch gets a completion holding a reference to the
/// batch. The first error takes the callback out of its slot and reports
/// itself; successful completions add to the byte total and the last one
/// reports it. A completion dropped by a transport without being invoked
/// counts as an error.
///
/// The callback lives in an `Option` that is only ever emptied by `take()`,
/// so it runs at most once no matter the order completions arrive in.
pub(crate) struct PendingBatch {
    total: usize,
    completed: AtomicUsize,
    bytes: AtomicUsize,
    callback: Mutex<Option<Callback>>,
}

impl PendingBatch {
    /// Create a batch waiting on `total` completions, at least one.
    pub(crate) fn new(total: usize, callback: Callback) -> Arc<Self> {
        Arc::new(PendingBatch {
            total,
            completed: AtomicUsize::new(0),
            bytes: AtomicUsize::new(0),
            callback: Mutex::new(Some(callback)),
        })
    }

    /// Create the completion for one datagram of this batch
    pub(crate) fn completion(self: &Arc<Self>) -> Completion {
        let mut guard = CompletionGuard {
            batch: Arc::clone(self),
            ran: false,
        };
        Box::new(move |res| guard.complete(res))
    }

    fn take_callback(&self) -> Option<Callback> {
        self.callback.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    fn succeed(&self, n: usize) {
        self.bytes.fetch_add(n, Ordering::AcqRel);
        let completed = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        if completed < self.total {
            return;
        }

        // Every other completion added its bytes before counting itself
        let bytes = self.bytes.load(Ordering::Acquire);
        if let Some(cb) = self.take_callback() {
            cb(Ok(bytes));
        }
    }

    fn fail(&self, err: io::Error) {
        self.completed.fetch_add(1, Ordering::AcqRel);
        if let Some(cb) = self.take_callback() {
            cb(Err(MetricError::from(err)));
        }
    }
}

impl fmt::Debug for PendingBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PendingBatch {{ total: {}, completed: {:?}, bytes: {:?}, callback: ... }}",
            self.total, self.completed, self.bytes
        )
    }
}

/// Owned by a single completion, reports to the batch exactly once: when
/// the completion is invoked or, failing that, when it is dropped.
struct CompletionGuard {
    batch: Arc<PendingBatch>,
    ran: bool,
}

impl CompletionGuard {
    fn complete(&mut self, res: io::Result<usize>) {
        self.ran = true;
        match res {
            Ok(n) => self.batch.succeed(n),
            Err(e) => self.batch.fail(e),
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if !self.ran {
            debug!("completion dropped by the transport without being invoked");
            self.batch
                .fail(io::Error::new(io::ErrorKind::Other, "datagram dropped before being sent"));
        }
    }
}
