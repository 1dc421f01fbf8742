use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::album::Album;
use crate::timecode::{TimecodeError, timecode_to_secs};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("The track listing is empty")]
    NoTracks,
    #[error("Bad offset for track {} ('{name}')", .index + 1)]
    Offset {
        index: usize,
        name: String,
        #[source]
        source: TimecodeError,
    },
    #[error(
        "Track {number} ('{name}') has no length: it starts at {start} but the next track starts at {end}"
    )]
    NonPositiveLength {
        number: usize,
        name: String,
        start: String,
        end: String,
    },
}

/// One output file, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackJob {
    pub number: usize,
    pub title: String,
    pub start: u64,
    pub length: u64,
    pub output: PathBuf,
    pub tags: Vec<(&'static str, String)>,
}

impl TrackJob {
    pub fn track_number(&self) -> String {
        format!("{:02}", self.number)
    }
}

/// Resolve every adjacent pair of tracks into a [`TrackJob`].
///
/// `album` must already carry the terminal pseudo-track. Every interval is
/// checked before anything is returned, so a bad listing is rejected before
/// a single file is written.
pub fn plan_tracks(album: &Album, output_dir: &Path) -> Result<Vec<TrackJob>, PlanError> {
    if album.tracks.len() < 2 {
        return Err(PlanError::NoTracks);
    }

    let offsets = album
        .tracks
        .iter()
        .enumerate()
        .map(|(index, track)| {
            timecode_to_secs(&track.offset).map_err(|source| PlanError::Offset {
                index,
                name: track.name.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut jobs = Vec::with_capacity(album.tracks.len() - 1);

    for (i, pair) in album.tracks.windows(2).enumerate() {
        let (current, next) = (&pair[0], &pair[1]);
        let (start, end) = (offsets[i], offsets[i + 1]);
        let number = i + 1;

        if end <= start {
            return Err(PlanError::NonPositiveLength {
                number,
                name: current.name.clone(),
                start: current.offset.clone(),
                end: next.offset.clone(),
            });
        }

        let track_number = format!("{:02}", number);
        let title = current.name.clone();
        let output = output_dir.join(format!("{} {}.mp3", track_number, title));

        jobs.push(TrackJob {
            number,
            start,
            length: end - start,
            output,
            tags: vec![
                ("artist", album.artist.clone()),
                ("album", album.album.clone()),
                ("track_num", track_number),
                ("title", title.clone()),
            ],
            title,
        });
    }

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::album::TrackSpec;

    fn album(offsets: &[(&str, &str)]) -> Album {
        Album {
            artist: "X".to_string(),
            album: "Y".to_string(),
            tracks: offsets
                .iter()
                .map(|(name, offset)| TrackSpec {
                    name: name.to_string(),
                    offset: offset.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn computes_lengths_from_consecutive_offsets() {
        let album = album(&[("One", "0:00"), ("Two", "1:30"), ("Three", "3:00")])
            .with_end("0:04:15".to_string());
        let jobs = plan_tracks(&album, Path::new("X/Y")).unwrap();

        let lengths: Vec<_> = jobs.iter().map(|j| (j.start, j.length)).collect();
        assert_eq!(lengths, [(0, 90), (90, 90), (180, 75)]);
    }

    #[test]
    fn names_outputs_by_padded_number_and_title() {
        let album = album(&[("One", "0"), ("Two Words", "10")]).with_end("20".to_string());
        let jobs = plan_tracks(&album, Path::new("X/Y")).unwrap();

        assert_eq!(jobs[0].output, Path::new("X/Y/01 One.mp3"));
        assert_eq!(jobs[1].output, Path::new("X/Y/02 Two Words.mp3"));
        assert_eq!(jobs[1].track_number(), "02");
        assert_eq!(
            jobs[1].tags,
            [
                ("artist", "X".to_string()),
                ("album", "Y".to_string()),
                ("track_num", "02".to_string()),
                ("title", "Two Words".to_string()),
            ]
        );
    }

    #[test]
    fn numbers_past_ninety_nine_are_not_truncated() {
        let tracks: Vec<(String, String)> = (0..100)
            .map(|i| (format!("T{}", i), i.to_string()))
            .collect();
        let refs: Vec<(&str, &str)> = tracks
            .iter()
            .map(|(n, o)| (n.as_str(), o.as_str()))
            .collect();
        let album = album(&refs).with_end("100".to_string());
        let jobs = plan_tracks(&album, Path::new("out")).unwrap();

        assert_eq!(jobs.len(), 100);
        assert_eq!(jobs[99].output, Path::new("out/100 T99.mp3"));
    }

    #[test]
    fn rejects_zero_and_negative_lengths() {
        let dup = album(&[("One", "0:00"), ("Two", "0:00")]).with_end("1:00".to_string());
        assert!(matches!(
            plan_tracks(&dup, Path::new(".")),
            Err(PlanError::NonPositiveLength { number: 1, .. })
        ));

        let reversed = album(&[("One", "2:00"), ("Two", "1:00")]).with_end("3:00".to_string());
        assert!(matches!(
            plan_tracks(&reversed, Path::new(".")),
            Err(PlanError::NonPositiveLength { number: 1, .. })
        ));

        let past_end = album(&[("One", "0:00"), ("Two", "5:00")]).with_end("0:04:15".to_string());
        assert!(matches!(
            plan_tracks(&past_end, Path::new(".")),
            Err(PlanError::NonPositiveLength { number: 2, .. })
        ));
    }

    #[test]
    fn reports_track_with_bad_offset() {
        let bad = album(&[("One", "0:00"), ("Two", "1:xx")]).with_end("3:00".to_string());
        match plan_tracks(&bad, Path::new(".")) {
            Err(PlanError::Offset { index, name, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(name, "Two");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_empty_listing() {
        let empty = album(&[]).with_end("3:00".to_string());
        assert!(matches!(
            plan_tracks(&empty, Path::new(".")),
            Err(PlanError::NoTracks)
        ));
    }
}
