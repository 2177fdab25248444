use std::fmt;
use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use log::debug;

use crate::errors::CaptionError;

// @module: Transcript to subtitle track conversion

// @struct: One transcript sentence as produced by the enhancement service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionEntry {
    // @field: Start in seconds
    pub start: f64,

    // @field: End in seconds
    pub end: f64,

    // @field: Spoken text
    pub text: String,
}

impl CaptionEntry {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Decomposed timestamp, as rendered in a cue line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParts {
    pub minutes: u64,
    pub seconds: u64,
    pub milliseconds: u64,
    pub formatted: String,
}

/// Split a duration in seconds into minutes, seconds and milliseconds and
/// render it as `MM:SS.mmm`.
///
/// There is no hour field: 7200 seconds renders as `120:00.000`. Fields wider
/// than their padding are kept whole. Negative and NaN inputs count as zero.
pub fn convert_time(seconds: f64) -> TimeParts {
    let seconds = if seconds.is_nan() || seconds < 0.0 { 0.0 } else { seconds };

    let minutes = (seconds / 60.0).floor() as u64;
    let remaining_seconds = (seconds % 60.0).floor() as u64;
    let milliseconds = ((seconds - seconds.trunc()) * 1000.0) as u64;

    TimeParts {
        minutes,
        seconds: remaining_seconds,
        milliseconds,
        formatted: format!("{:02}:{:02}.{:03}", minutes, remaining_seconds, milliseconds),
    }
}

// @struct: Single cue of a subtitle track
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub start_seconds: f64,
    pub end_seconds: f64,
    // @field: Formatted start (MM:SS.mmm)
    pub start: String,
    // @field: Formatted end (MM:SS.mmm)
    pub end: String,
    pub text: String,
}

impl Caption {
    pub fn new(start_seconds: f64, end_seconds: f64, text: impl Into<String>) -> Self {
        Self {
            start_seconds,
            end_seconds,
            start: convert_time(start_seconds).formatted,
            end: convert_time(end_seconds).formatted,
            text: text.into(),
        }
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} --> {}", self.start, self.end)?;
        writeln!(f, "{}", self.text)
    }
}

/// WebVTT-like subtitle track clipped to a video duration
#[derive(Debug, Clone, Default)]
pub struct SubtitleTrack {
    /// Cues in playback order
    pub captions: Vec<Caption>,
}

impl SubtitleTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    /// Write the track as a `.vtt` file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CaptionError> {
        let path = path.as_ref();
        fs::write(path, self.to_string())?;
        debug!("Wrote {} captions to {}", self.captions.len(), path.display());
        Ok(())
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "WEBVTT")?;
        for caption in &self.captions {
            writeln!(f)?;
            write!(f, "{}", caption)?;
        }
        Ok(())
    }
}

/// Build a subtitle track from ordered transcript entries.
///
/// Entries are taken in the given order. The first entry starting at or past
/// `duration_seconds` ends the track, even if later entries start earlier.
/// End times are clamped to the duration.
pub fn to_subtitle_track(entries: &[CaptionEntry], duration_seconds: f64) -> SubtitleTrack {
    let mut track = SubtitleTrack::new();

    for entry in entries {
        if entry.start >= duration_seconds {
            debug!(
                "Caption at {}s starts past the {}s duration, dropping the remaining {} entries",
                entry.start,
                duration_seconds,
                entries.len() - track.len()
            );
            break;
        }

        let end = if entry.end < duration_seconds { entry.end } else { duration_seconds };
        track.captions.push(Caption::new(entry.start, end, entry.text.clone()));
    }

    track
}

/// Read transcript entries from enhancement output.
///
/// Accepts either a bare array of `{start, end, text}` objects or an
/// enhancement version carrying them under `transcript.sentences`.
pub fn entries_from_json(value: &Value) -> Result<Vec<CaptionEntry>, CaptionError> {
    let sentences = match value {
        Value::Array(_) => value,
        Value::Object(_) => value
            .get("transcript")
            .and_then(|transcript| transcript.get("sentences"))
            .ok_or_else(|| {
                CaptionError::InvalidTranscript("missing transcript.sentences".to_string())
            })?,
        other => {
            return Err(CaptionError::InvalidTranscript(format!(
                "expected an array or an object, got {}",
                other
            )));
        }
    };

    serde_json::from_value(sentences.clone())
        .map_err(|e| CaptionError::InvalidTranscript(e.to_string()))
}
