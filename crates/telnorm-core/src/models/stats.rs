use std::fmt;

use serde::Serialize;

/// Counts that make "fewer metrics than expected" observable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    /// Nodes matched by interface paths.
    pub candidates: usize,
    /// Instances discovered.
    pub instances: usize,
    /// Candidate nodes without a usable identifier.
    pub skipped: usize,
    /// Instance ids seen more than once.
    pub duplicates: usize,
    /// Metrics emitted.
    pub metrics: usize,
    /// Metrics whose raw value was found but did not convert.
    pub dropped: usize,
    /// Metrics whose path resolved to nothing.
    pub misses: usize,
}

impl CollectionStats {
    pub fn merge(&mut self, other: &CollectionStats) {
        self.candidates += other.candidates;
        self.instances += other.instances;
        self.skipped += other.skipped;
        self.duplicates += other.duplicates;
        self.metrics += other.metrics;
        self.dropped += other.dropped;
        self.misses += other.misses;
    }
}

impl fmt::Display for CollectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} instances ({} candidates, {} skipped, {} duplicate), {} metrics ({} dropped, {} missing)",
            self.instances,
            self.candidates,
            self.skipped,
            self.duplicates,
            self.metrics,
            self.dropped,
            self.misses
        )
    }
}
