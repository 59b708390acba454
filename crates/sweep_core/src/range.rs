use thiserror::Error;

pub type ArticleId = u64;

/// Inclusive identifier interval owned by exactly one worker.
///
/// A range with `start > end` is empty and yields no identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdRange {
    pub start: ArticleId,
    pub end: ArticleId,
}

impl IdRange {
    pub fn new(start: ArticleId, end: ArticleId) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of identifiers in the range. Saturates for the full `u64` domain.
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).saturating_add(1)
        }
    }

    pub fn contains(&self, id: ArticleId) -> bool {
        self.start <= id && id <= self.end
    }

    /// Identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ArticleId> {
        self.start..=self.end
    }
}

impl std::fmt::Display for IdRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "[{}, {}] (empty)", self.start, self.end)
        } else {
            write!(f, "[{}, {}]", self.start, self.end)
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartitionError {
    #[error("worker count must be at least 1")]
    NoWorkers,
}

/// Split `[start, end]` into `worker_count` contiguous ranges.
///
/// Every worker gets a range, even when there are more workers than
/// identifiers; the surplus ranges are empty. The last non-empty range is
/// clipped to `end`, so the union is exactly `[start, end]`.
pub fn partition(
    start: ArticleId,
    end: ArticleId,
    worker_count: usize,
) -> Result<Vec<IdRange>, PartitionError> {
    if worker_count == 0 {
        return Err(PartitionError::NoWorkers);
    }
    if start > end {
        return Ok(vec![IdRange::new(start, end); worker_count]);
    }

    // u128 keeps `end - start + 1` and `i * chunk` exact for the whole u64 domain.
    let total = u128::from(end - start) + 1;
    let workers = worker_count as u128;
    let chunk = total.div_ceil(workers);
    let base = u128::from(start);
    let last = u128::from(end);

    let anchor = end.saturating_add(1);

    let ranges = (0..workers)
        .map(|i| {
            let lo = base + i * chunk;
            let hi = (base + (i + 1) * chunk - 1).min(last);
            if lo > last {
                // Surplus worker: empty range anchored just past `end`.
                IdRange::new(anchor, anchor - 1)
            } else {
                IdRange::new(lo as ArticleId, hi as ArticleId)
            }
        })
        .collect();
    Ok(ranges)
}
