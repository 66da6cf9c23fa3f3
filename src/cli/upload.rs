//! Upload command implementation

use crate::range::ByteRange;
use crate::shutdown::SharedShutdown;
use crate::uploader::config::DEFAULT_CHUNK_SIZE;
use crate::uploader::{UploadError, UploadExecutor, UploadJob, UploadReport};
use clap::{Parser, Subcommand};
use reqwest::Method;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::CliError;

/// Parse and validate a chunk size argument.
fn parse_chunk_size(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number of bytes"))?;
    if value == 0 {
        return Err("chunk size must be at least 1 byte".to_string());
    }
    Ok(value)
}

/// Parse a `START-END` byte range argument.
fn parse_range(s: &str) -> Result<ByteRange, String> {
    ByteRange::from_str(s).map_err(|e| e.to_string())
}

/// Parse an HTTP method argument, case-insensitively.
fn parse_method(s: &str) -> Result<Method, String> {
    Method::from_str(&s.to_uppercase()).map_err(|_| format!("invalid HTTP method: {s}"))
}

/// Chunked file uploader CLI
#[derive(Parser, Debug)]
#[command(name = "chunked-uploader")]
#[command(about = "Upload a byte range of a file to an HTTP endpoint in Content-Range chunks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json or human)
    #[arg(long, global = true, default_value = "human")]
    pub output_format: OutputFormat,

    /// Maximum number of retries per chunk (range: 1-20)
    #[arg(long, global = true, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=20))]
    pub max_retries: u32,

    /// Per-chunk request timeout in seconds
    #[arg(long, global = true, default_value = "300", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Prometheus metrics listener address (e.g. 127.0.0.1:9090)
    #[arg(long, global = true)]
    pub metrics_addr: Option<SocketAddr>,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a file in Content-Range chunks
    Upload(UploadArgs),

    /// Print the chunk plan without uploading anything
    Plan(super::PlanArgs),
}

/// Upload command arguments
#[derive(Parser, Debug)]
pub struct UploadArgs {
    /// File to upload
    #[arg(short, long)]
    pub file: PathBuf,

    /// URL to upload to
    #[arg(short, long)]
    pub url: String,

    /// Chunk size in bytes
    #[arg(short, long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_chunk_size)]
    pub chunk_size: u64,

    /// Byte range of the file to upload, START-END inclusive
    /// (default: the whole file)
    #[arg(short, long, value_parser = parse_range)]
    pub range: Option<ByteRange>,

    /// HTTP method to use for every chunk
    #[arg(short, long, default_value = "PUT", value_parser = parse_method)]
    pub method: Method,

    /// Print the source file size before uploading
    #[arg(long, default_value_t = false)]
    pub file_bytes: bool,
}

impl UploadArgs {
    /// Execute the upload command.
    pub async fn execute(&self, cli: &Cli, shutdown: SharedShutdown) -> Result<(), CliError> {
        let file_len = tokio::fs::metadata(&self.file)
            .await
            .map_err(|e| {
                CliError::InvalidArgument(format!("cannot read file {}: {e}", self.file.display()))
            })?
            .len();

        if self.file_bytes {
            println!("File size: {file_len} bytes");
        }

        let range = match self.range {
            Some(range) => range,
            None => ByteRange::for_file_len(file_len)?,
        };
        range.check_within(file_len)?;

        info!(
            file = %self.file.display(),
            url = %self.url,
            range = %range,
            chunk_size = self.chunk_size,
            method = %self.method,
            "upload requested"
        );

        let job = UploadJob::new(
            self.file.clone(),
            range,
            self.chunk_size,
            self.url.clone(),
            self.method.clone(),
        )
        .with_total_len(file_len);
        let summary = job.clone();

        let executor = UploadExecutor::new()
            .with_max_retries(cli.max_retries)
            .with_request_timeout(Duration::from_secs(cli.timeout_secs))
            .with_shutdown(shutdown);

        let result = executor.execute(job).await;

        match cli.output_format {
            OutputFormat::Json => output_json(&summary, &result),
            OutputFormat::Human => output_human(&summary, &result),
        }

        match result {
            Ok(report) if report.is_complete() => Ok(()),
            Ok(report) => Err(CliError::UploadAborted(
                report.error.unwrap_or_else(|| "unknown failure".to_string()),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable output
    Human,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!("Invalid output format: {s}")),
        }
    }
}

/// Output result as JSON
fn output_json(job: &UploadJob, result: &Result<UploadReport, UploadError>) {
    let output = match result {
        Ok(report) => serde_json::json!({
            "success": report.is_complete(),
            "file": job.file_path.display().to_string(),
            "url": job.url,
            "method": job.method.as_str(),
            "range": job.range.to_string(),
            "chunk_size": job.chunk_size,
            "total_chunks": report.total_chunks,
            "succeeded_chunks": report.succeeded_chunks,
            "retries": report.retries,
            "first_failure": report.first_failure,
            "resume_start": report.resume_start(&job.range, job.chunk_size),
            "error": report.error,
        }),
        Err(e) => serde_json::json!({
            "success": false,
            "file": job.file_path.display().to_string(),
            "url": job.url,
            "method": job.method.as_str(),
            "range": job.range.to_string(),
            "chunk_size": job.chunk_size,
            "error": e.to_string(),
        }),
    };

    match serde_json::to_string(&output) {
        Ok(line) => println!("{line}"),
        Err(e) => eprintln!("failed to serialize result: {e}"),
    }
}

/// Output result in human-readable format
fn output_human(job: &UploadJob, result: &Result<UploadReport, UploadError>) {
    match result {
        Ok(report) if report.is_complete() => {
            println!("\nUpload completed successfully!");
            println!("File: {}", job.file_path.display());
            println!("Range: {} ({} bytes)", job.range, job.range.len());
            println!(
                "Chunks: {}/{} accepted",
                report.succeeded_chunks, report.total_chunks
            );
            if report.retries > 0 {
                println!("Retries: {}", report.retries);
            }
        }
        Ok(report) => {
            println!("\nUpload aborted!");
            if let Some(error) = &report.error {
                println!("Reason: {error}");
            }
            println!(
                "Chunks: {}/{} accepted before abort",
                report.succeeded_chunks, report.total_chunks
            );
            if let Some(resume) = report.resume_start(&job.range, job.chunk_size) {
                println!(
                    "Resume with: --range {}-{}",
                    resume,
                    job.range.end()
                );
            }
        }
        Err(e) => {
            println!("\nUpload failed: {e}");
        }
    }
}
