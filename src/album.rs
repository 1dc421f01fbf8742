use anyhow::Context;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Name given to the pseudo-track that marks the end of the audio.
pub const END_TRACK_NAME: &str = "end";

/// Track listing loaded from the YAML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Album {
    pub artist: String,
    pub album: String,
    pub tracks: Vec<TrackSpec>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TrackSpec {
    pub name: String,
    /// Start of the track as a timecode, e.g. `"1:30"`.
    #[serde(deserialize_with = "offset_string")]
    pub offset: String,
}

impl Album {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Returns a copy of the album with the terminal pseudo-track appended,
    /// closing the interval of the last real track.
    pub fn with_end(&self, end_offset: String) -> Self {
        let mut tracks = self.tracks.clone();
        tracks.push(TrackSpec {
            name: END_TRACK_NAME.to_string(),
            offset: end_offset,
        });
        Self {
            artist: self.artist.clone(),
            album: self.album.clone(),
            tracks,
        }
    }

    /// `<base>/<artist>/<album>`
    pub fn output_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.artist).join(&self.album)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOffset {
    Text(String),
    Seconds(u64),
}

/// Accept both `offset: "1:30"` and a bare integer such as `offset: 90`.
fn offset_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawOffset::deserialize(deserializer)? {
        RawOffset::Text(text) => text,
        RawOffset::Seconds(secs) => secs.to_string(),
    })
}
