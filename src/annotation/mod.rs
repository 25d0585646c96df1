//! Annotation bridge
//!
//! Exchange format with collaborators outside the editor (diarization
//! pipelines, RTTM files): a flat list of `(segment, track, label)` triples
//! where `label` is human-readable text rather than a label key.

mod bridge;
mod rttm;

pub use bridge::export;
pub(crate) use bridge::import_into;
pub use rttm::{load_rttm, load_rttm_file, write_rttm, DEFAULT_RTTM_TYPE};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Half-open time interval `[start, end)` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// One labeled track of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationTrack {
    pub segment: Segment,
    /// Track identifier; maps to a region id.
    pub track: String,
    /// Human-readable label text.
    pub label: String,
}

/// A complete set of labeled intervals for one audio file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Audio file identifier, if known.
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub tracks: Vec<AnnotationTrack>,
}

impl Annotation {
    pub fn new(uri: Option<String>) -> Self {
        Self {
            uri,
            tracks: Vec::new(),
        }
    }

    pub fn push(&mut self, segment: Segment, track: impl Into<String>, label: impl Into<String>) {
        self.tracks.push(AnnotationTrack {
            segment,
            track: track.into(),
            label: label.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Distinct label texts, sorted.
    pub fn labels(&self) -> BTreeSet<&str> {
        self.tracks.iter().map(|t| t.label.as_str()).collect()
    }

    /// Whether every track id appears only once.
    pub fn has_unique_tracks(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.tracks.len());
        self.tracks.iter().all(|t| seen.insert(t.track.as_str()))
    }
}
