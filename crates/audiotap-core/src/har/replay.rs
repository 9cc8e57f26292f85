//! Offline interception: feed recorded requests through registered callbacks.

use std::sync::RwLock;

use crate::intercept::{RequestCallback, RequestFilter, RequestInterceptor};
use crate::request::{Decision, RequestRecord};

/// Counts from one replay pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub total: usize,
    /// Records no registered filter matched.
    pub out_of_scope: usize,
    pub allowed: usize,
    pub blocked: usize,
}

/// [`RequestInterceptor`] backed by a list of recorded requests.
#[derive(Default)]
pub struct HarReplay {
    handlers: RwLock<Vec<(RequestFilter, RequestCallback)>>,
}

impl HarReplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs each record through every callback whose filter matches it. A record
    /// is blocked if any callback blocks it.
    pub fn replay(&self, records: &[RequestRecord]) -> ReplayReport {
        let handlers = self.handlers.read().unwrap();
        let mut report = ReplayReport {
            total: records.len(),
            ..ReplayReport::default()
        };

        for record in records {
            let mut in_scope = false;
            let mut decision = Decision::Allow;
            for (filter, callback) in handlers.iter() {
                if !filter.matches(&record.url) {
                    continue;
                }
                in_scope = true;
                if callback(record).is_blocked() {
                    decision = Decision::Block;
                }
            }

            if !in_scope {
                report.out_of_scope += 1;
            } else if decision.is_blocked() {
                report.blocked += 1;
            } else {
                report.allowed += 1;
            }
        }
        report
    }
}

impl RequestInterceptor for HarReplay {
    fn register(&self, filter: RequestFilter, callback: RequestCallback) {
        self.handlers.write().unwrap().push((filter, callback));
    }
}
