use crate::album::Album;
use crate::cli::Args;
use crate::ffmpeg::FFmpeg;
use crate::media::{Extraction, MediaTool};
use crate::plan::{TrackJob, plan_tracks};
use crate::timecode::secs_to_timecode;
use anyhow::{Context, Result};
use comfy_table::{Table, presets::UTF8_FULL};
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub fn run(args: Args) -> Result<()> {
    // Parse the listing first so a broken config never touches the disk.
    let album = Album::load(&args.config_file)?;
    let tool = FFmpeg::detect()?;

    let written = split_album(&tool, &args.input_file, &album, Path::new("."))?;
    info!(
        "✅ Wrote {} tracks to {}",
        written.len(),
        album.output_dir(Path::new(".")).display()
    );
    Ok(())
}

/// Split `input` into one file per track of `album`, below `base`.
///
/// Tracks are extracted in order and the first failure stops the run; files
/// already written are left in place. Returns the paths written.
pub fn split_album(
    tool: &impl MediaTool,
    input: &Path,
    album: &Album,
    base: &Path,
) -> Result<Vec<PathBuf>> {
    let duration = tool
        .probe_duration(input)
        .with_context(|| format!("Failed to determine the duration of {}", input.display()))?;
    // Inexact for VBR files, but close enough to bound the last track.
    let end = secs_to_timecode(duration);
    debug!("Audio ends at {}", end);

    let album = album.with_end(end);
    let output_dir = album.output_dir(base);
    let jobs = plan_tracks(&album, &output_dir)?;

    info!("▶️ Splitting {} into {} tracks:", input.display(), jobs.len());
    info!("\n{}", plan_table(&jobs));

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let mut written = Vec::with_capacity(jobs.len());

    for job in &jobs {
        info!("ℹ️ {} {}", job.track_number(), job.title);
        let output = tool
            .extract(&Extraction {
                input,
                output: &job.output,
                start: job.start,
                length: job.length,
                tags: &job.tags,
            })
            .with_context(|| {
                format!(
                    "Failed to extract track {} ('{}')",
                    job.track_number(),
                    job.title
                )
            })?;
        debug!("{}", output.stderr);
        written.push(job.output.clone());
    }

    Ok(written)
}

fn plan_table(jobs: &[TrackJob]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Title", "Start", "Length", "Output"]);

    for job in jobs {
        table.add_row(vec![
            job.track_number(),
            job.title.clone(),
            secs_to_timecode(job.start),
            secs_to_timecode(job.length),
            job.output.display().to_string(),
        ]);
    }
    table
}
