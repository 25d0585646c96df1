//! Region Annotator
//!
//! Keyboard-driven engine for labeling time regions on an audio timeline.
//! Regions carry a short label key, overlapping regions are stacked into at
//! most four display levels, and the whole state can be exchanged with
//! diarization tools as annotations or RTTM files.

pub mod annotation;
pub mod constants;
pub mod core;
pub mod editor;
pub mod error;
pub mod hotkeys;
pub mod state;

pub use annotation::{Annotation, AnnotationTrack, Segment};
pub use editor::{Command, Direction, Editor, EditorSnapshot};
pub use error::{EditorError, Result};
pub use state::{EditorSettings, LabelKey, Region, RegionId, RegionPatch, RegionStore};
