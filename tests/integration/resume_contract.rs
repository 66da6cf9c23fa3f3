//! Caller-driven resume: a narrowed range continues an aborted run without
//! re-sending accepted bytes

use crate::common::{Reply, ScriptedTransport};
use chunked_uploader::{ByteRange, UploadExecutor, UploadJob};
use reqwest::Method;
use std::io::Write;

fn fixture(len: usize) -> (tempfile::NamedTempFile, Vec<u8>) {
    let content: Vec<u8> = (0..len).map(|i| (i.wrapping_mul(31) % 256) as u8).collect();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&content).unwrap();
    file.flush().unwrap();
    (file, content)
}

fn job_for(file: &tempfile::NamedTempFile, range: ByteRange, chunk_size: u64) -> UploadJob {
    UploadJob::new(
        file.path().to_path_buf(),
        range,
        chunk_size,
        "http://localhost:8080/upload".to_string(),
        Method::PUT,
    )
}

#[tokio::test(start_paused = true)]
async fn test_resume_with_narrowed_range() {
    let (file, content) = fixture(2500);
    let chunk_size = 1000;

    // First run: chunk 2 (index 2) keeps failing until retries run out.
    let first_transport = ScriptedTransport::accepting()
        .with_replies(2, vec![Reply::Fail, Reply::Fail, Reply::Fail]);
    let first_range = ByteRange::new(0, 2499).unwrap();

    let first_report = UploadExecutor::new()
        .with_max_retries(2)
        .execute_with_transport(job_for(&file, first_range, chunk_size), &first_transport)
        .await
        .unwrap();

    assert!(!first_report.is_complete());
    assert_eq!(first_report.succeeded_chunks, 2);

    // The report tells the caller exactly where to restart.
    let resume_start = first_report
        .resume_start(&first_range, chunk_size)
        .expect("aborted run must yield a resume offset");
    assert_eq!(resume_start, 2000);

    // Second run: fresh pipeline over the narrowed range only.
    let second_transport = ScriptedTransport::accepting();
    let second_range = ByteRange::new(resume_start, first_range.end()).unwrap();

    let second_report = UploadExecutor::new()
        .execute_with_transport(job_for(&file, second_range, chunk_size), &second_transport)
        .await
        .unwrap();

    assert!(second_report.is_complete());
    assert_eq!(second_report.total_chunks, 1);
    assert_eq!(second_report.resume_start(&second_range, chunk_size), None);

    // Offsets picked up exactly where the first run stopped, declaring the
    // same file total.
    let resumed = second_transport.requests();
    assert_eq!(resumed[0].offset, 2000);
    assert_eq!(resumed[0].content_range, "bytes 2000-2499/2500");

    // Accepted bytes across both runs reassemble the file with no gaps and
    // no re-sent bytes.
    let mut reassembled = first_transport.accepted_bytes();
    reassembled.extend(second_transport.accepted_bytes());
    assert_eq!(reassembled, content);
}

#[tokio::test]
async fn test_resume_offset_respects_range_origin() {
    // An aborted run over a range that starts mid-file resumes relative to
    // that range's origin, not offset zero.
    let (file, _) = fixture(5000);
    let chunk_size = 500;

    let transport = ScriptedTransport::accepting().with_replies(3, vec![Reply::Reject(409)]);
    let range = ByteRange::new(1000, 3999).unwrap();

    let report = UploadExecutor::new()
        .execute_with_transport(job_for(&file, range, chunk_size), &transport)
        .await
        .unwrap();

    assert_eq!(report.succeeded_chunks, 3);
    assert_eq!(report.resume_start(&range, chunk_size), Some(2500));
}
