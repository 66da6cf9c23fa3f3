//! Unit tests for Content-Range header formatting

use chunked_uploader::range::{chunk_plan, ByteRange, ChunkDescriptor};
use chunked_uploader::transfer::http::format_content_range;

#[test]
fn test_header_values_across_a_plan() {
    let range = ByteRange::new(0, 2499).unwrap();
    let plan = chunk_plan(&range, 1000).unwrap();

    let headers: Vec<String> = plan
        .iter()
        .map(|c| format_content_range(c, Some(2500)))
        .collect();

    assert_eq!(
        headers,
        vec![
            "bytes 0-999/2500",
            "bytes 1000-1999/2500",
            "bytes 2000-2499/2500",
        ]
    );
}

#[test]
fn test_header_end_is_inclusive() {
    let chunk = ChunkDescriptor {
        index: 0,
        offset: 0,
        len: 1,
        is_last: true,
    };
    assert_eq!(format_content_range(&chunk, Some(1)), "bytes 0-0/1");
}

#[test]
fn test_unknown_total_uses_star() {
    let chunk = ChunkDescriptor {
        index: 2,
        offset: 2048,
        len: 512,
        is_last: false,
    };
    assert_eq!(format_content_range(&chunk, None), "bytes 2048-2559/*");
}

#[test]
fn test_subrange_keeps_file_total() {
    // Uploading 500-1499 of a 4000-byte file still declares the file total
    let range = ByteRange::new(500, 1499).unwrap();
    let plan = chunk_plan(&range, 600).unwrap();

    assert_eq!(format_content_range(&plan[0], Some(4000)), "bytes 500-1099/4000");
    assert_eq!(format_content_range(&plan[1], Some(4000)), "bytes 1100-1499/4000");
}
