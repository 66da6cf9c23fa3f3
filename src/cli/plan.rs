//! Plan subcommand: print the chunk plan without touching the network

use crate::range::{chunk_plan, ByteRange};
use crate::uploader::config::DEFAULT_CHUNK_SIZE;
use clap::Parser;
use std::path::PathBuf;

use super::upload::OutputFormat;
use super::{Cli, CliError};

/// Arguments for the plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// File the plan would upload
    #[arg(short, long)]
    pub file: PathBuf,

    /// Chunk size in bytes
    #[arg(short, long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: u64,

    /// Byte range of the file, START-END inclusive (default: the whole file)
    #[arg(short, long)]
    pub range: Option<ByteRange>,
}

impl PlanArgs {
    /// Compute and print the chunk plan.
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let file_len = tokio::fs::metadata(&self.file)
            .await
            .map_err(|e| {
                CliError::InvalidArgument(format!("cannot read file {}: {e}", self.file.display()))
            })?
            .len();

        let range = match self.range {
            Some(range) => range,
            None => ByteRange::for_file_len(file_len)?,
        };
        range.check_within(file_len)?;

        let plan = chunk_plan(&range, self.chunk_size)?;

        match cli.output_format {
            OutputFormat::Json => {
                let line = serde_json::to_string(&plan)
                    .map_err(|e| CliError::InvalidArgument(format!("serialization failed: {e}")))?;
                println!("{line}");
            }
            OutputFormat::Human => {
                println!(
                    "Plan for {} (file {} bytes, range {}):",
                    self.file.display(),
                    file_len,
                    range
                );
                for chunk in &plan {
                    println!(
                        "  chunk {:>4}  offset {:>12}  len {:>10}{}",
                        chunk.index,
                        chunk.offset,
                        chunk.len,
                        if chunk.is_last { "  (last)" } else { "" }
                    );
                }
                println!("\n{} chunk(s), {} bytes total", plan.len(), range.len());
            }
        }

        Ok(())
    }
}
