use crate::Record;

/// Bounded accumulator of records waiting to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batcher {
    records: Vec<Record>,
    threshold: usize,
}

impl Batcher {
    /// A threshold of zero is treated as one.
    pub fn new(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            records: Vec::with_capacity(threshold),
            threshold,
        }
    }

    pub fn add(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn should_flush(&self) -> bool {
        self.records.len() >= self.threshold
    }

    /// Take every buffered record in insertion order, leaving the batcher empty.
    pub fn drain(&mut self) -> Vec<Record> {
        std::mem::replace(&mut self.records, Vec::with_capacity(self.threshold))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}
