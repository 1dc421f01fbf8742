use anyhow::Result;
use std::path::Path;

/// A single stream-copy request: `length` seconds of `input` starting at
/// `start`, written to `output` with the given global metadata tags.
#[derive(Debug, Clone, Copy)]
pub struct Extraction<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub start: u64,
    pub length: u64,
    pub tags: &'a [(&'static str, String)],
}

/// Captured output of a media tool invocation.
#[derive(Debug, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// The media operations the splitter depends on.
pub trait MediaTool {
    /// Duration of the first audio stream, truncated to whole seconds.
    fn probe_duration(&self, input: &Path) -> Result<u64>;

    /// Copy the requested range without re-encoding, overwriting any
    /// existing output file.
    fn extract(&self, job: &Extraction<'_>) -> Result<ToolOutput>;
}
