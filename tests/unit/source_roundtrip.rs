//! Round-trip property: chunk reads in plan order reproduce the range bytes

use chunked_uploader::{chunk_plan, ByteRange, ChunkSource, SourceError};
use std::io::Write;

fn fixture(len: usize) -> (tempfile::NamedTempFile, Vec<u8>) {
    let content: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&content).unwrap();
    file.flush().unwrap();
    (file, content)
}

#[tokio::test]
async fn test_whole_file_roundtrip() {
    let (file, content) = fixture(2500);
    let mut source = ChunkSource::open(file.path()).await.unwrap();

    let range = ByteRange::for_file_len(source.len()).unwrap();
    let plan = chunk_plan(&range, 1000).unwrap();

    let mut reassembled = Vec::new();
    for chunk in &plan {
        let bytes = source.read_chunk(chunk).await.unwrap();
        assert_eq!(bytes.len() as u64, chunk.len);
        reassembled.extend_from_slice(&bytes);
    }

    assert_eq!(reassembled, content);
}

#[tokio::test]
async fn test_subrange_roundtrip() {
    let (file, content) = fixture(10_000);
    let mut source = ChunkSource::open(file.path()).await.unwrap();

    let range = ByteRange::new(1234, 8765).unwrap();
    let plan = chunk_plan(&range, 777).unwrap();

    let mut reassembled = Vec::new();
    for chunk in &plan {
        reassembled.extend_from_slice(&source.read_chunk(chunk).await.unwrap());
    }

    assert_eq!(reassembled, content[1234..=8765].to_vec());
}

#[tokio::test]
async fn test_plan_beyond_file_fails_on_read() {
    let (file, _) = fixture(100);
    let mut source = ChunkSource::open(file.path()).await.unwrap();

    // A plan computed against a stale length: the final chunk runs past EOF
    let range = ByteRange::new(0, 199).unwrap();
    let plan = chunk_plan(&range, 50).unwrap();

    assert!(source.read_chunk(&plan[0]).await.is_ok());
    assert!(source.read_chunk(&plan[1]).await.is_ok());
    let err = source.read_chunk(&plan[2]).await.unwrap_err();
    assert!(matches!(err, SourceError::ShortRead { chunk: 2, .. }));
}
