//! Unit tests for the chunk planner

use chunked_uploader::{chunk_plan, ByteRange, RangeError};

#[test]
fn test_2500_bytes_at_1000_per_chunk() {
    let range = ByteRange::new(0, 2499).unwrap();
    let plan = chunk_plan(&range, 1000).unwrap();

    assert_eq!(plan.len(), 3);
    assert_eq!(
        plan.iter().map(|c| (c.offset, c.len, c.is_last)).collect::<Vec<_>>(),
        vec![(0, 1000, false), (1000, 1000, false), (2000, 500, true)]
    );
}

#[test]
fn test_range_matching_chunk_size_yields_one_chunk() {
    let range = ByteRange::new(0, 999).unwrap();
    let plan = chunk_plan(&range, 1000).unwrap();

    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].len, 1000);
    assert!(plan[0].is_last);
}

#[test]
fn test_single_byte_range() {
    let range = ByteRange::new(0, 0).unwrap();
    let plan = chunk_plan(&range, 5_000_000).unwrap();

    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].len, 1);
    assert!(plan[0].is_last);
}

#[test]
fn test_zero_chunk_size_rejected() {
    let range = ByteRange::new(0, 100).unwrap();
    assert_eq!(chunk_plan(&range, 0), Err(RangeError::InvalidChunkSize));
}

#[test]
fn test_inverted_range_unconstructible() {
    assert!(matches!(
        ByteRange::new(10, 9),
        Err(RangeError::InvalidRange { start: 10, end: 9 })
    ));
}

#[test]
fn test_plan_covers_range_exactly() {
    for (start, end, chunk_size) in [
        (0u64, 10_000u64, 3u64),
        (7, 7, 1),
        (123, 45_678, 1024),
        (0, 99, 100),
        (0, 100, 100),
    ] {
        let range = ByteRange::new(start, end).unwrap();
        let plan = chunk_plan(&range, chunk_size).unwrap();

        let expected_count = range.len().div_ceil(chunk_size);
        assert_eq!(plan.len() as u64, expected_count);

        // Contiguous and gapless, covering exactly the range
        assert_eq!(plan[0].offset, start);
        for pair in plan.windows(2) {
            assert_eq!(pair[0].offset + pair[0].len, pair[1].offset);
        }
        let last = plan.last().unwrap();
        assert_eq!(last.offset + last.len - 1, end);

        // Exactly one last marker, on the final descriptor
        assert_eq!(plan.iter().filter(|c| c.is_last).count(), 1);
        assert!(last.is_last);

        // Indices are the sequence positions
        for (i, chunk) in plan.iter().enumerate() {
            assert_eq!(chunk.index, i as u64);
        }
    }
}

#[test]
fn test_replanning_is_identical() {
    let range = ByteRange::new(11, 99_999).unwrap();
    assert_eq!(
        chunk_plan(&range, 4096).unwrap(),
        chunk_plan(&range, 4096).unwrap()
    );
}
