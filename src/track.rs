use lofty::file::TaggedFileExt;
use lofty::prelude::*;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::audio::decode::{self, AudioData, DecodeError};

/// Descriptive tags. Everything is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<u32>,
}

/// A decoded audio file and its tags.
#[derive(Clone, Debug)]
pub struct Track {
    pub path: PathBuf,
    pub metadata: TrackMetadata,
    pub audio: AudioData,
}

impl Track {
    /// Decode `path` and read whatever tags it carries.
    pub fn load(path: &Path) -> Result<Self, DecodeError> {
        let audio = decode::decode_audio(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            metadata: read_tags(path),
            audio,
        })
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fallback = || {
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string())
        };
        match (&self.metadata.title, &self.metadata.artist) {
            (Some(title), Some(artist)) => write!(f, "{} by {}", title, artist),
            (Some(title), None) => write!(f, "{}", title),
            _ => write!(f, "{}", fallback()),
        }
    }
}

/// Read tags from an audio file. Returns empty metadata on failure.
pub fn read_tags(path: &Path) -> TrackMetadata {
    let tagged_file = match lofty::read_from_path(path) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("Could not read tags from {}: {}", path.display(), e);
            return TrackMetadata::default();
        }
    };

    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        return TrackMetadata::default();
    };

    TrackMetadata {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.artist().map(|s| s.to_string()),
        album: tag.album().map(|s| s.to_string()),
        genre: tag.genre().map(|s| s.to_string()),
        year: tag.year(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(path: &str, title: Option<&str>, artist: Option<&str>) -> Track {
        Track {
            path: PathBuf::from(path),
            metadata: TrackMetadata {
                title: title.map(str::to_string),
                artist: artist.map(str::to_string),
                ..TrackMetadata::default()
            },
            audio: AudioData {
                samples: Vec::new(),
                sample_rate: 44100,
            },
        }
    }

    #[test]
    fn display_uses_title_and_artist() {
        let t = track("songs/im_good.mp3", Some("I'm Good (Blue)"), Some("David Guetta & Bebe Rexha"));
        assert_eq!(t.to_string(), "I'm Good (Blue) by David Guetta & Bebe Rexha");
    }

    #[test]
    fn display_falls_back_to_file_name() {
        assert_eq!(track("songs/dire_dire_docks.mp3", None, None).to_string(), "dire_dire_docks.mp3");
        assert_eq!(track("a.flac", None, Some("Someone")).to_string(), "a.flac");
        assert_eq!(track("a.flac", Some("Only Title"), None).to_string(), "Only Title");
    }

    #[test]
    fn unreadable_tags_are_empty() {
        assert_eq!(read_tags(Path::new("/no/such/file.mp3")), TrackMetadata::default());
    }
}
