use sweep_core::{partition, IdRange, PartitionError};

fn assert_exact_cover(start: u64, end: u64, workers: usize) {
    let ranges = partition(start, end, workers).unwrap();
    assert_eq!(ranges.len(), workers, "one range per worker");

    let non_empty: Vec<IdRange> = ranges.iter().copied().filter(|r| !r.is_empty()).collect();
    let mut expected_next = start;
    for range in &non_empty {
        assert_eq!(range.start, expected_next, "gap or overlap before {range}");
        assert!(range.start >= start && range.end <= end, "{range} escapes [{start}, {end}]");
        expected_next = range.end + 1;
    }
    assert_eq!(expected_next, end + 1, "union must end at {end}");

    let covered: u64 = ranges.iter().map(IdRange::len).sum();
    assert_eq!(covered, end - start + 1);
}

#[test]
fn ranges_partition_interval_exactly() {
    for (start, end) in [(0, 0), (1, 10), (100, 104), (3_879_427, 3_879_500), (7, 1_006)] {
        for workers in 1..=12 {
            assert_exact_cover(start, end, workers);
        }
    }
}

#[test]
fn single_worker_gets_whole_interval() {
    assert_eq!(partition(100, 104, 1).unwrap(), vec![IdRange::new(100, 104)]);
}

#[test]
fn last_range_absorbs_remainder() {
    let ranges = partition(100, 109, 4).unwrap();
    assert_eq!(
        ranges,
        vec![
            IdRange::new(100, 102),
            IdRange::new(103, 105),
            IdRange::new(106, 108),
            IdRange::new(109, 109),
        ]
    );
}

#[test]
fn surplus_workers_get_empty_ranges() {
    let ranges = partition(10, 12, 5).unwrap();
    assert_eq!(ranges.len(), 5);
    assert_eq!(&ranges[..3], &[IdRange::new(10, 10), IdRange::new(11, 11), IdRange::new(12, 12)]);
    for surplus in &ranges[3..] {
        assert!(surplus.is_empty());
        assert_eq!(surplus.ids().count(), 0);
    }
}

#[test]
fn reversed_interval_yields_only_empty_ranges() {
    let ranges = partition(20, 10, 3).unwrap();
    assert_eq!(ranges.len(), 3);
    assert!(ranges.iter().all(IdRange::is_empty));
}

#[test]
fn zero_workers_is_rejected() {
    assert_eq!(partition(1, 5, 0), Err(PartitionError::NoWorkers));
}

#[test]
fn top_of_id_space_does_not_overflow() {
    let ranges = partition(u64::MAX - 4, u64::MAX, 2).unwrap();
    assert_eq!(
        ranges,
        vec![
            IdRange::new(u64::MAX - 4, u64::MAX - 2),
            IdRange::new(u64::MAX - 1, u64::MAX),
        ]
    );

    let ranges = partition(u64::MAX - 1, u64::MAX, 3).unwrap();
    assert!(ranges[2].is_empty());
}
