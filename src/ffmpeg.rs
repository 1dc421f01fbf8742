use log::{debug, warn};
use regex::Regex;
use std::{
    io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};
use thiserror::Error;

use crate::media::{Extraction, MediaTool, ToolOutput};

const MINIMUM_FFMPEG_MAJOR_VERSION: u32 = 4;

#[derive(Debug, PartialEq, Eq)]
pub struct FFmpegVersionInfo {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

#[derive(Debug, Error)]
pub enum FFmpegError {
    #[error("`{0}` command not found. Please ensure it is installed and in your PATH.")]
    CommandNotFound(String),
    #[error("Failed to run `{0}`: {1}")]
    CommandFailed(String, String),
    #[error("No audio stream found in {0}")]
    NoAudioStream(String),
    #[error("Audio stream in {0} does not report a duration")]
    DurationUnavailable(String),
    #[error("Invalid duration '{0}' reported by ffprobe")]
    InvalidDuration(String),
    #[error("Invalid path (not UTF-8): {0}")]
    NonUtf8Path(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

fn path_to_str(path: &Path) -> Result<&str, FFmpegError> {
    path.to_str()
        .ok_or_else(|| FFmpegError::NonUtf8Path(path.to_path_buf()))
}

/// Run `program` with `args`, capturing stdout and stderr.
fn run_tool(program: &str, args: &[String]) -> Result<ToolOutput, FFmpegError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                FFmpegError::CommandNotFound(program.to_string())
            } else {
                FFmpegError::Io(e)
            }
        })?;

    let captured = ToolOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !output.status.success() {
        return Err(FFmpegError::CommandFailed(
            format!("{} {}", program, args.join(" ")),
            captured.stderr.trim().to_string(),
        ));
    }
    Ok(captured)
}

pub fn check_dependency(cmd: &str) -> Result<(), FFmpegError> {
    match Command::new(cmd)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => Ok(()),
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                Err(FFmpegError::CommandNotFound(cmd.to_string()))
            } else {
                Err(FFmpegError::CommandFailed(cmd.to_string(), e.to_string()))
            }
        }
    }
}

/// Extract the version from `ffmpeg -version` output, if it has a numeric one.
pub fn parse_ffmpeg_version(version_info: &str) -> Result<Option<FFmpegVersionInfo>, FFmpegError> {
    let re = Regex::new(r"ffmpeg version n?(\d+)\.(\d+)(?:\.(\d+))?")?;

    let Some(caps) = re.captures(version_info) else {
        return Ok(None);
    };

    let part = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };

    Ok(Some(FFmpegVersionInfo {
        major: part(1),
        minor: part(2),
        patch: part(3),
    }))
}

/// Read the duration of the first audio stream from `ffprobe -print_format json` output.
pub fn parse_probe_duration(json: &[u8], input: &str) -> Result<u64, FFmpegError> {
    let parsed: serde_json::Value = serde_json::from_slice(json)?;

    let stream = parsed["streams"]
        .as_array()
        .and_then(|streams| streams.first())
        .ok_or_else(|| FFmpegError::NoAudioStream(input.to_string()))?;

    let raw = match &stream["duration"] {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return Err(FFmpegError::DurationUnavailable(input.to_string())),
    };

    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| FFmpegError::InvalidDuration(raw.clone()))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(FFmpegError::InvalidDuration(raw));
    }

    // Truncated, not rounded: the last track ends on the last whole second.
    Ok(secs as u64)
}

/// Build the ffmpeg arguments for a stream-copy extraction.
pub fn extract_args(job: &Extraction<'_>) -> Result<Vec<String>, FFmpegError> {
    let mut args: Vec<String> = vec![
        "-y".to_string(),
        "-i".to_string(),
        path_to_str(job.input)?.to_string(),
        "-ss".to_string(),
        job.start.to_string(),
        "-t".to_string(),
        job.length.to_string(),
        "-acodec".to_string(),
        "copy".to_string(),
    ];
    for (i, (key, value)) in job.tags.iter().enumerate() {
        args.push(format!("-metadata:g:{}", i));
        args.push(format!("{}={}", key, value));
    }
    args.push(path_to_str(job.output)?.to_string());
    Ok(args)
}

/// [`MediaTool`] backed by the `ffmpeg` and `ffprobe` executables.
#[derive(Debug, Clone)]
pub struct FFmpeg {
    ffmpeg: String,
    ffprobe: String,
}

impl Default for FFmpeg {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

impl FFmpeg {
    /// Make sure both executables can be launched and log the ffmpeg version.
    pub fn detect() -> Result<Self, FFmpegError> {
        let tool = Self::default();
        check_dependency(&tool.ffmpeg)?;
        check_dependency(&tool.ffprobe)?;

        let output = run_tool(&tool.ffmpeg, &["-version".to_string()])?;
        match parse_ffmpeg_version(&output.stdout)? {
            Some(version) => {
                debug!(
                    "Found ffmpeg {}.{}.{}",
                    version.major, version.minor, version.patch
                );
                if version.major < MINIMUM_FFMPEG_MAJOR_VERSION {
                    warn!(
                        "ffmpeg {}.{} is older than the minimum tested version {}.0",
                        version.major, version.minor, MINIMUM_FFMPEG_MAJOR_VERSION
                    );
                }
            }
            None => debug!("Could not parse ffmpeg version from output"),
        }

        Ok(tool)
    }
}

impl MediaTool for FFmpeg {
    fn probe_duration(&self, input: &Path) -> anyhow::Result<u64> {
        let input_str = path_to_str(input)?;
        let args: Vec<String> = [
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-select_streams",
            "a",
            input_str,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let output = run_tool(&self.ffprobe, &args)?;
        Ok(parse_probe_duration(output.stdout.as_bytes(), input_str)?)
    }

    fn extract(&self, job: &Extraction<'_>) -> anyhow::Result<ToolOutput> {
        let args = extract_args(job)?;
        Ok(run_tool(&self.ffmpeg, &args)?)
    }
}
